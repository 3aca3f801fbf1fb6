//! Yield-point style producers written as `async` bodies.
//!
//! The body receives a [`Co`] handle and calls `co.yield_(value).await` at
//! each yield point. [`Coroutine`] polls the body once per resume with a
//! no-op waker, so it always runs synchronously on the caller's thread and
//! never needs an executor.
//!
//! ```
//! use lazyseq::LazySequence;
//!
//! let mut seq: LazySequence<u32> = LazySequence::coroutine(|co| async move {
//!     co.yield_(1).await;
//!     co.yield_(2).await;
//!     Ok(())
//! });
//!
//! assert_eq!(seq.get_next().unwrap(), 1);
//! assert_eq!(seq.get_next().unwrap(), 2);
//! assert!(!seq.has_next().unwrap());
//! ```

use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::task::noop_waker_ref;

use crate::step::{Resume, Step};

type Slot<T> = Rc<Cell<Option<T>>>;

/// Yield handle handed to a coroutine body.
pub struct Co<T> {
    slot: Slot<T>,
}

impl<T> Co<T> {
    /// Suspends the body after publishing `value`.
    pub fn yield_(&self, value: T) -> YieldNow<T> {
        YieldNow {
            slot: Rc::clone(&self.slot),
            value: Some(value),
        }
    }

    /// Yields every item of `items` in order.
    pub async fn yield_all<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.yield_(item).await;
        }
    }
}

impl<T> fmt::Debug for Co<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Co").finish_non_exhaustive()
    }
}

/// Future returned by [`Co::yield_`].
///
/// The first poll that finds the slot empty stores the value and returns
/// `Pending`; the next poll completes. While another yield's value still
/// occupies the slot, the value stays here and the poll returns `Pending`.
#[must_use = "a yield does nothing unless awaited"]
pub struct YieldNow<T> {
    slot: Slot<T>,
    value: Option<T>,
}

// Never pin-projected.
impl<T> Unpin for YieldNow<T> {}

impl<T> Future for YieldNow<T> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        if this.value.is_none() {
            return Poll::Ready(());
        }
        let occupant = this.slot.take();
        if occupant.is_some() {
            this.slot.set(occupant);
        } else {
            this.slot.set(this.value.take());
        }
        Poll::Pending
    }
}

/// Computation backed by a pinned `async` body.
///
/// Dropping it drops the body and everything the body captured, wherever
/// the body was suspended.
pub struct Coroutine<T, E> {
    slot: Slot<T>,
    body: Pin<Box<dyn Future<Output = Result<(), E>>>>,
}

impl<T, E> Coroutine<T, E> {
    /// Creates the body without running any of it.
    pub fn new<F, Fut>(producer: F) -> Self
    where
        F: FnOnce(Co<T>) -> Fut,
        Fut: Future<Output = Result<(), E>> + 'static,
    {
        let slot: Slot<T> = Rc::new(Cell::new(None));
        let body = Box::pin(producer(Co {
            slot: Rc::clone(&slot),
        }));
        Self { slot, body }
    }
}

impl<T, E> Resume for Coroutine<T, E> {
    type Yield = T;
    type Error = E;

    fn resume(&mut self) -> Step<T, E> {
        let mut cx = Context::from_waker(noop_waker_ref());
        match self.body.as_mut().poll(&mut cx) {
            Poll::Ready(Ok(())) => Step::Complete,
            Poll::Ready(Err(e)) => Step::Failed(e),
            Poll::Pending => match self.slot.take() {
                Some(value) => Step::Yielded(value),
                None => Step::Stalled,
            },
        }
    }
}

impl<T, E> fmt::Debug for Coroutine<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coroutine").finish_non_exhaustive()
    }
}
