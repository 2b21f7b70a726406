use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

use log::trace;
use parking_lot::{Condvar, Mutex};
use slab::Slab;

use crate::{Outcome, TimeoutError};

/// A read-only handle to an outcome that may not exist yet.
///
/// A `Future` can have many readers. Clones share the same state, and every
/// reader observes the same [`Outcome`] once the paired promise resolves it.
/// Readers that arrive after resolution get the outcome straight away, without
/// taking any lock.
///
/// The outcome can be retrieved by blocking ([`wait`](Future::wait),
/// [`wait_timeout`](Future::wait_timeout)) or by `.await`ing the handle, which
/// yields an `Arc<Outcome<T, E>>`.
///
/// # Examples
///
/// ```
/// use promise_future::{promise, BrokenPromise, Outcome};
/// use futures::executor::block_on;
/// use std::thread;
///
/// let (promise, future) = promise::<String, BrokenPromise>();
/// let future2 = future.clone();
/// let task1 = thread::spawn(move || future.wait().clone());
/// let task2 = thread::spawn(move || block_on(future2));
/// promise.resolve("Hi".into()).unwrap();
/// assert_eq!(task1.join().unwrap(), Outcome::Kept("Hi".to_string()));
/// assert_eq!(*task2.join().unwrap(), Outcome::Kept("Hi".to_string()));
/// ```
pub struct Future<T, E> {
    shared: Arc<Shared<T, E>>,
    // Slot in `Shared::wakers` held by this handle while it is polled.
    waker_key: Option<usize>,
}

struct Shared<T, E> {
    outcome: OnceLock<Arc<Outcome<T, E>>>,
    // Writers hold this lock while settling; readers only take it to park.
    wakers: Mutex<Slab<Waker>>,
    condvar: Condvar,
}

impl<T, E> Clone for Future<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            waker_key: None,
        }
    }
}

impl<T, E> Drop for Future<T, E> {
    fn drop(&mut self) {
        if let Some(key) = self.waker_key.take() {
            self.shared.wakers.lock().try_remove(key);
        }
    }
}

impl<T, E> Future<T, E> {
    pub(crate) fn pending() -> Self {
        Self {
            shared: Arc::new(Shared {
                outcome: OnceLock::new(),
                wakers: Mutex::new(Slab::new()),
                condvar: Condvar::new(),
            }),
            waker_key: None,
        }
    }

    /// A future that is already resolved with `outcome`.
    pub fn resolved(outcome: Outcome<T, E>) -> Self {
        Self {
            shared: Arc::new(Shared {
                outcome: OnceLock::from(Arc::new(outcome)),
                wakers: Mutex::new(Slab::new()),
                condvar: Condvar::new(),
            }),
            waker_key: None,
        }
    }

    pub fn kept(value: T) -> Self {
        Self::resolved(Outcome::Kept(value))
    }

    pub fn broken(err: E) -> Self {
        Self::resolved(Outcome::Broken(err))
    }

    /// Stores `outcome` and releases every waiter, unless an outcome is
    /// already stored, in which case `outcome` is handed back untouched.
    pub(crate) fn settle(&self, outcome: Outcome<T, E>) -> Result<(), Outcome<T, E>> {
        let mut wakers = self.shared.wakers.lock();
        if self.shared.outcome.get().is_some() {
            return Err(outcome);
        }
        let stored = self.shared.outcome.set(Arc::new(outcome));
        debug_assert!(stored.is_ok());
        let woken = std::mem::take(&mut *wakers);
        self.shared.condvar.notify_all();
        drop(wakers);

        trace!("future resolved, waking {} task(s)", woken.len());
        for (_, waker) in woken {
            waker.wake();
        }
        Ok(())
    }

    pub fn is_resolved(&self) -> bool {
        self.shared.outcome.get().is_some()
    }

    /// Returns the outcome if it is already available, without blocking.
    pub fn try_get(&self) -> Option<&Outcome<T, E>> {
        self.shared.outcome.get().map(|outcome| &**outcome)
    }

    /// Blocks the current thread until the future is resolved.
    ///
    /// Any number of threads may wait at once; all of them are released by the
    /// same resolution and see the same outcome.
    pub fn wait(&self) -> &Outcome<T, E> {
        if let Some(outcome) = self.try_get() {
            return outcome;
        }
        let mut wakers = self.shared.wakers.lock();
        loop {
            if let Some(outcome) = self.try_get() {
                return outcome;
            }
            self.shared.condvar.wait(&mut wakers);
            trace!("waiter woken");
        }
    }

    /// Blocks for at most `timeout`.
    ///
    /// A zero `timeout` never blocks: it reports what is available right now.
    /// Timing out leaves the future untouched.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<&Outcome<T, E>, TimeoutError> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait_deadline(deadline),
            None => Ok(self.wait()),
        }
    }

    /// Blocks until the future is resolved or `deadline` passes.
    pub fn wait_deadline(&self, deadline: Instant) -> Result<&Outcome<T, E>, TimeoutError> {
        if let Some(outcome) = self.try_get() {
            return Ok(outcome);
        }
        let mut wakers = self.shared.wakers.lock();
        loop {
            if let Some(outcome) = self.try_get() {
                return Ok(outcome);
            }
            if self
                .shared
                .condvar
                .wait_until(&mut wakers, deadline)
                .timed_out()
            {
                return self.try_get().ok_or(TimeoutError);
            }
        }
    }

    /// Waits for the outcome and calls `f` with the value if the promise was kept.
    pub fn on_kept<F>(&self, f: F)
    where
        F: FnOnce(&T),
    {
        if let Outcome::Kept(value) = self.wait() {
            f(value)
        }
    }

    /// Waits for the outcome and calls `f` with the error if the promise was broken.
    pub fn on_broken<F>(&self, f: F)
    where
        F: FnOnce(&E),
    {
        if let Outcome::Broken(err) = self.wait() {
            f(err)
        }
    }

    /// Waits for at most `timeout`, then calls exactly one of the callbacks.
    ///
    /// `on_error` gets `Some(err)` for a broken promise and `None` when the wait
    /// timed out. `on_success` gets the value of a kept promise.
    pub fn on_resolved_with_timeout<FE, FS>(&self, on_error: FE, on_success: FS, timeout: Duration)
    where
        FE: FnOnce(Option<&E>),
        FS: FnOnce(&T),
    {
        match self.wait_timeout(timeout) {
            Ok(Outcome::Kept(value)) => on_success(value),
            Ok(Outcome::Broken(err)) => on_error(Some(err)),
            Err(TimeoutError) => on_error(None),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Future<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        Self::resolved(outcome)
    }
}

impl<T, E> std::future::Future for Future<T, E> {
    type Output = Arc<Outcome<T, E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(outcome) = this.shared.outcome.get() {
            return Poll::Ready(outcome.clone());
        }
        let mut wakers = this.shared.wakers.lock();
        if let Some(outcome) = this.shared.outcome.get() {
            return Poll::Ready(outcome.clone());
        }
        match this.waker_key {
            Some(key) if wakers.contains(key) => {
                let waker = &mut wakers[key];
                if !waker.will_wake(cx.waker()) {
                    *waker = cx.waker().clone();
                }
            }
            _ => this.waker_key = Some(wakers.insert(cx.waker().clone())),
        }
        Poll::Pending
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Future<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_get() {
            Some(outcome) => f.debug_tuple("Future").field(outcome).finish(),
            None => f.write_str("Future(<pending>)"),
        }
    }
}
