use std::panic::{self, AssertUnwindSafe};

use log::{debug, trace, warn};

use crate::{BrokenPromise, ComputationFailure, Future, Outcome, Promise, SpawnOptions};

/// A promise that starts computing its outcome as soon as it is created.
///
/// The computation runs on its own thread and resolves the future exactly once
/// when it returns. A panic inside the computation does not escape that thread:
/// it breaks the future with [`ComputationFailure::Panicked`]. Unwinding is
/// required for this, so builds with `panic = "abort"` lose it.
///
/// # Examples
///
/// ```
/// use promise_future::{ImplicitPromise, Outcome, Promise};
///
/// let promise = ImplicitPromise::<i32>::spawn(|| Outcome::Kept(5));
/// assert_eq!(promise.future().wait(), &Outcome::Kept(5));
/// ```
#[derive(Debug)]
pub struct ImplicitPromise<T, E = BrokenPromise> {
    future: Future<T, E>,
}

impl<T, E> ImplicitPromise<T, E>
where
    T: Send + Sync + 'static,
    E: From<ComputationFailure> + Send + Sync + 'static,
{
    /// Starts `f` on a new thread.
    pub fn spawn<F>(f: F) -> Self
    where
        F: FnOnce() -> Outcome<T, E> + Send + 'static,
    {
        Self::spawn_with(SpawnOptions::default(), f)
    }

    /// Starts `f` on a new thread configured by `options`.
    ///
    /// If the thread cannot be started the future is broken with
    /// [`ComputationFailure::Spawn`].
    pub fn spawn_with<F>(options: SpawnOptions, f: F) -> Self
    where
        F: FnOnce() -> Outcome<T, E> + Send + 'static,
    {
        let future = Future::pending();
        let resolver = future.clone();
        debug!("spawning computation for implicit promise {:?}", options.name);

        let spawned = options.spawn(move || {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(f)) {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let failure = ComputationFailure::panicked(payload.as_ref());
                    warn!("implicit promise computation failed: {}", failure);
                    Outcome::Broken(E::from(failure))
                }
            };
            let settled = resolver.settle(outcome);
            debug_assert!(settled.is_ok());
            trace!("implicit promise resolved");
        });

        if let Err(err) = spawned {
            warn!("could not start implicit promise computation: {}", err);
            let failure = ComputationFailure::Spawn {
                message: err.to_string(),
            };
            let settled = future.settle(Outcome::Broken(E::from(failure)));
            debug_assert!(settled.is_ok());
        }
        Self { future }
    }
}

impl<T, E> ImplicitPromise<T, E> {
    pub fn is_resolved(&self) -> bool {
        self.future.is_resolved()
    }
}

impl<T, E> Promise for ImplicitPromise<T, E> {
    type Output = T;
    type Error = E;

    fn future(&self) -> Future<T, E> {
        self.future.clone()
    }
}
