use std::any::Any;

use thiserror::Error;

use crate::Outcome;

/// A timed wait ran out before the future was resolved.
///
/// Only the wait is affected: the future stays pending and a later wait may
/// still observe its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("timed out waiting for the future to resolve")]
pub struct TimeoutError;

/// A promise was resolved a second time.
///
/// The first outcome stays in place. The outcome that was refused is handed
/// back so it is not lost.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("the promise was already resolved")]
pub struct DoubleResolutionError<T, E> {
    rejected: Outcome<T, E>,
}

impl<T, E> DoubleResolutionError<T, E> {
    pub(crate) fn new(rejected: Outcome<T, E>) -> Self {
        Self { rejected }
    }

    pub fn rejected(&self) -> &Outcome<T, E> {
        &self.rejected
    }

    pub fn into_rejected(self) -> Outcome<T, E> {
        self.rejected
    }
}

/// Why a promise broke without its resolver choosing to break it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputationFailure {
    /// The computation of an implicit promise panicked.
    #[error("the computation panicked: {message}")]
    Panicked { message: String },
    /// The background thread for an implicit promise could not be started.
    #[error("failed to spawn the computation thread: {message}")]
    Spawn { message: String },
    /// An explicit promise was dropped before it was resolved.
    #[error("the promise was dropped without being resolved")]
    Abandoned,
}

impl ComputationFailure {
    pub(crate) fn panicked(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_owned()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "unknown panic payload".to_owned()
        };
        ComputationFailure::Panicked { message }
    }
}

/// The default error carried by a broken promise.
///
/// # Examples
///
/// ```
/// use promise_future::{BrokenPromise, ComputationFailure};
///
/// let err = BrokenPromise::reason("host unreachable");
/// assert_eq!(err.to_string(), "the promise was broken: host unreachable");
///
/// let err = BrokenPromise::from(ComputationFailure::Abandoned);
/// assert!(err.computation().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokenPromise {
    /// A reason supplied by whoever broke the promise.
    #[error("the promise was broken: {0}")]
    Reason(String),
    #[error(transparent)]
    Computation(#[from] ComputationFailure),
}

impl BrokenPromise {
    pub fn reason(reason: impl Into<String>) -> Self {
        BrokenPromise::Reason(reason.into())
    }

    pub fn computation(&self) -> Option<&ComputationFailure> {
        match self {
            BrokenPromise::Computation(failure) => Some(failure),
            BrokenPromise::Reason(_) => None,
        }
    }
}
