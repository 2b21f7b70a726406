//! A write-once future/promise pair.
//!
//! A [`Promise`] resolves its paired [`Future`] exactly once, to an
//! [`Outcome`] that is either [`Kept`](Outcome::Kept) or
//! [`Broken`](Outcome::Broken). Any number of readers may hold the future and
//! retrieve that outcome by blocking, blocking with a timeout, or `.await`.
//!
//! Two kinds of promise exist:
//!
//! - [`ImplicitPromise`] starts its computation on a new thread when created.
//! - [`ExplicitPromise`] waits for its holder to call
//!   [`resolve`](ExplicitPromise::resolve) or [`reject`](ExplicitPromise::reject).
//!
//! ```
//! use promise_future::{spawn, BrokenPromise, Outcome, Promise};
//! use std::time::Duration;
//!
//! let promise = spawn(|| -> Outcome<u32, BrokenPromise> { Outcome::Kept((0..10).sum()) });
//! let future = promise.future();
//! future.on_resolved_with_timeout(
//!     |err| panic!("no value: {:?}", err),
//!     |value| assert_eq!(*value, 45),
//!     Duration::from_secs(5),
//! );
//! ```

mod error;
mod explicit;
mod future;
mod implicit;
mod options;
mod outcome;

pub use error::{BrokenPromise, ComputationFailure, DoubleResolutionError, TimeoutError};
pub use explicit::ExplicitPromise;
pub use future::Future;
pub use implicit::ImplicitPromise;
pub use options::SpawnOptions;
pub use outcome::Outcome;

/// The write side of a [`Future`].
///
/// Each promise is bound to one future when it is created and resolves it at
/// most once. How the resolution is triggered depends on the implementation.
pub trait Promise {
    type Output;
    type Error;

    /// Returns a handle to the future bound to this promise.
    ///
    /// Every call returns a handle to the same future.
    fn future(&self) -> Future<Self::Output, Self::Error>;
}

/// Creates an [`ExplicitPromise`] together with its future.
///
/// # Examples
///
/// ```
/// use promise_future::{promise, BrokenPromise, Outcome};
/// use std::thread;
///
/// let (promise, future) = promise::<i32, BrokenPromise>();
/// let task = thread::spawn(move || future.wait().clone());
/// promise.resolve(10).unwrap();
/// assert_eq!(task.join().unwrap(), Outcome::Kept(10));
/// ```
pub fn promise<T, E>() -> (ExplicitPromise<T, E>, Future<T, E>)
where
    E: From<ComputationFailure>,
{
    let promise = ExplicitPromise::new();
    let future = promise.future();
    (promise, future)
}

/// Starts `f` on a new thread and returns the [`ImplicitPromise`] for it.
pub fn spawn<T, E, F>(f: F) -> ImplicitPromise<T, E>
where
    T: Send + Sync + 'static,
    E: From<ComputationFailure> + Send + Sync + 'static,
    F: FnOnce() -> Outcome<T, E> + Send + 'static,
{
    ImplicitPromise::spawn(f)
}
