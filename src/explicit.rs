use log::{trace, warn};

use crate::{BrokenPromise, ComputationFailure, DoubleResolutionError, Future, Outcome, Promise};

/// A promise resolved by whoever holds it, from any thread.
///
/// Resolution takes `&self`, so the promise can be shared (for example behind
/// an `Arc`) and raced by several resolvers: the first one wins and every
/// later attempt gets a [`DoubleResolutionError`].
///
/// If the promise is dropped before it is resolved, its future is broken with
/// [`ComputationFailure::Abandoned`] so no waiter hangs forever.
///
/// # Examples
///
/// ```
/// use promise_future::{ExplicitPromise, Outcome, Promise};
/// use futures::executor::block_on;
/// use std::thread;
///
/// let promise = ExplicitPromise::<u32>::new();
/// let future = promise.future();
/// let task1 = thread::spawn(move || block_on(future));
/// let task2 = thread::spawn(move || promise.resolve(45));
/// task2.join().expect("The task2 thread has panicked").unwrap();
/// assert_eq!(*task1.join().expect("The task1 thread has panicked"), Outcome::Kept(45));
/// ```
#[derive(Debug)]
pub struct ExplicitPromise<T, E = BrokenPromise>
where
    E: From<ComputationFailure>,
{
    future: Future<T, E>,
}

impl<T, E> ExplicitPromise<T, E>
where
    E: From<ComputationFailure>,
{
    pub fn new() -> Self {
        Self {
            future: Future::pending(),
        }
    }

    /// Keeps the promise with `value`.
    pub fn resolve(&self, value: T) -> Result<(), DoubleResolutionError<T, E>> {
        self.settle(Outcome::Kept(value))
    }

    /// Breaks the promise with `err`.
    pub fn reject(&self, err: E) -> Result<(), DoubleResolutionError<T, E>> {
        self.settle(Outcome::Broken(err))
    }

    pub fn settle(&self, outcome: Outcome<T, E>) -> Result<(), DoubleResolutionError<T, E>> {
        match self.future.settle(outcome) {
            Ok(()) => {
                trace!("explicit promise resolved");
                Ok(())
            }
            Err(rejected) => {
                warn!("explicit promise resolved more than once, keeping the first outcome");
                Err(DoubleResolutionError::new(rejected))
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.future.is_resolved()
    }
}

impl<T, E> Default for ExplicitPromise<T, E>
where
    E: From<ComputationFailure>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Promise for ExplicitPromise<T, E>
where
    E: From<ComputationFailure>,
{
    type Output = T;
    type Error = E;

    fn future(&self) -> Future<T, E> {
        self.future.clone()
    }
}

impl<T, E> Drop for ExplicitPromise<T, E>
where
    E: From<ComputationFailure>,
{
    /// If this is an unresolved promise, break it so waiters wake up.
    fn drop(&mut self) {
        if self.future.is_resolved() {
            return;
        }
        let abandoned = Outcome::Broken(E::from(ComputationFailure::Abandoned));
        if self.future.settle(abandoned).is_ok() {
            warn!("explicit promise dropped without being resolved");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use futures::executor::block_on;

    use super::ExplicitPromise;
    use crate::{BrokenPromise, ComputationFailure, Outcome, Promise};

    #[test]
    fn test_promise_resolve() {
        let op = ExplicitPromise::<String>::new();
        let op_a = op.future();
        let task1 = thread::spawn(move || block_on(op_a));
        let task2 = thread::spawn(move || op.resolve(String::from("🍓")));
        task2
            .join()
            .expect("The task2 thread has panicked")
            .unwrap();
        assert_eq!(
            *task1.join().expect("The task1 thread has panicked"),
            Outcome::Kept("🍓".to_string())
        );
    }

    #[test]
    fn test_promise_reject() {
        let a = ExplicitPromise::<String>::new();
        let b = a.future();
        let task1 = thread::spawn(move || b.wait().clone());
        a.reject(BrokenPromise::reason("reject!!")).unwrap();
        assert_eq!(
            task1.join().expect("The task1 thread has panicked"),
            Outcome::Broken(BrokenPromise::reason("reject!!"))
        );
    }

    #[test]
    fn test_promise_resolve_twice() {
        let a = ExplicitPromise::<String>::new();
        a.resolve("hi".into()).unwrap();
        assert!(a.is_resolved());

        let err = a.resolve("again".into()).unwrap_err();
        assert_eq!(err.into_rejected(), Outcome::Kept("again".to_string()));
        let err = a.reject(BrokenPromise::reason("late")).unwrap_err();
        assert!(err.rejected().is_broken());

        assert_eq!(a.future().wait(), &Outcome::Kept("hi".to_string()));
    }

    #[test]
    fn test_promise_unresolved_drop_breaks_future() {
        let op = ExplicitPromise::<String>::new();
        let op_a = op.future();
        let task1 = thread::spawn(move || op_a.wait().clone());
        let task2 = thread::spawn(move || drop(op));
        task2.join().expect("The task2 thread has panicked");
        assert_eq!(
            task1.join().expect("The task1 thread has panicked"),
            Outcome::Broken(BrokenPromise::Computation(ComputationFailure::Abandoned))
        );
    }

    #[test]
    fn test_promise_no_consumer() {
        let op = ExplicitPromise::<String>::new();
        let task = thread::spawn(move || op.resolve(String::from("🍓")));
        assert!(task.join().expect("The task thread has panicked").is_ok());
    }

    #[test]
    fn test_shared_resolvers_first_wins() {
        let promise = Arc::new(ExplicitPromise::<usize>::new());
        let future = promise.future();
        let resolvers: Vec<_> = (0..8)
            .map(|i| {
                let promise = promise.clone();
                thread::spawn(move || promise.resolve(i).is_ok())
            })
            .collect();
        let winners = resolvers
            .into_iter()
            .map(|task| task.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert!(future.wait().is_kept());
    }
}
