//! One advance of a producing computation.
//!
//! A computation is anything that can be resumed to run up to its next
//! yield point. Each resume reports what happened as a [`Step`], so
//! failures travel as values and never cross the suspension boundary
//! out-of-band.

use std::fmt;
use std::marker::PhantomData;

/// Outcome of resuming a computation once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T, E> {
    /// Produced one value and suspended.
    Yielded(T),
    /// Ran to the end normally.
    Complete,
    /// Aborted with a failure. The computation must not be resumed again.
    Failed(E),
    /// Suspended without producing a value.
    Stalled,
}

impl<T, E> Step<T, E> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Step::Yielded(_))
    }
}

impl<T, E> From<Option<T>> for Step<T, E> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Step::Yielded(value),
            None => Step::Complete,
        }
    }
}

impl<T, E> From<Result<Option<T>, E>> for Step<T, E> {
    fn from(value: Result<Option<T>, E>) -> Self {
        match value {
            Ok(value) => value.into(),
            Err(e) => Step::Failed(e),
        }
    }
}

/// A computation that can be driven forward one yield point at a time.
///
/// Implementations run synchronously on the caller's thread. After
/// returning a terminal step, `resume` is never called again.
pub trait Resume {
    type Yield;
    type Error;

    fn resume(&mut self) -> Step<Self::Yield, Self::Error>;
}

impl<R: Resume + ?Sized> Resume for Box<R> {
    type Yield = R::Yield;
    type Error = R::Error;

    fn resume(&mut self) -> Step<Self::Yield, Self::Error> {
        (**self).resume()
    }
}

//==============================================================================
// FromFn: explicit state machine driven by a closure
//==============================================================================

/// Computation backed by a step closure.
///
/// The closure keeps its own state between calls and returns the next
/// [`Step`] each time it is invoked.
pub struct FromFn<F> {
    step: F,
}

impl<F> FromFn<F> {
    pub fn new(step: F) -> Self {
        Self { step }
    }
}

impl<F, T, E> Resume for FromFn<F>
where
    F: FnMut() -> Step<T, E>,
{
    type Yield = T;
    type Error = E;

    fn resume(&mut self) -> Step<T, E> {
        (self.step)()
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

//==============================================================================
// FromIter / FromResults: adapters over ordinary iterators
//==============================================================================

/// Infallible computation over an iterator.
#[derive(Debug)]
pub struct FromIter<I, E> {
    iter: I,
    _error: PhantomData<fn() -> E>,
}

impl<I, E> FromIter<I, E> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            _error: PhantomData,
        }
    }
}

impl<I: Iterator, E> Resume for FromIter<I, E> {
    type Yield = I::Item;
    type Error = E;

    fn resume(&mut self) -> Step<I::Item, E> {
        self.iter.next().into()
    }
}

/// Computation over an iterator of results; the first `Err` ends it.
#[derive(Debug)]
pub struct FromResults<I> {
    iter: I,
}

impl<I> FromResults<I> {
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I, T, E> Resume for FromResults<I>
where
    I: Iterator<Item = Result<T, E>>,
{
    type Yield = T;
    type Error = E;

    fn resume(&mut self) -> Step<T, E> {
        self.iter.next().transpose().into()
    }
}
