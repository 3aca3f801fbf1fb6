//! The caller-facing handle over a producing computation.
//!
//! A [`LazySequence`] caches at most one produced value. `has_next` fills the
//! cache when it is empty, and `get_next` empties it. Each produced value is
//! therefore delivered exactly once, and asking "is there more?" never
//! advances past a value nobody has read.

use std::fmt;
use std::future::Future;

use crate::coroutine::{Co, Coroutine};
use crate::error::{Failure, SequenceError};
use crate::step::{FromFn, FromIter, FromResults, Resume, Step};

/// Progress of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Created; the computation has not run yet.
    NotStarted,
    /// The computation is parked at a yield point.
    Suspended,
    /// Ran to the end normally.
    Completed,
    /// Aborted with a failure.
    Failed,
}

impl State {
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Completed | State::Failed)
    }
}

type Source<T, E> = Box<dyn Resume<Yield = T, Error = E>>;

/// Pull-based lazy sequence with a single-slot cache.
///
/// ```
/// use lazyseq::LazySequence;
///
/// let mut seq: LazySequence<i32> = LazySequence::from_iter(1..=3);
/// let mut seen = Vec::new();
/// while seq.has_next()? {
///     seen.push(seq.get_next()?);
/// }
/// assert_eq!(seen, vec![1, 2, 3]);
/// # Ok::<(), lazyseq::SequenceError>(())
/// ```
pub struct LazySequence<T, E = Failure> {
    state: State,
    pending: Option<T>,
    produced: usize,
    /// Dropped as soon as the sequence turns terminal.
    source: Option<Source<T, E>>,
}

impl<T, E> LazySequence<T, E> {
    /// Wraps a computation. Nothing runs until the first query.
    pub fn new<R>(computation: R) -> Self
    where
        R: Resume<Yield = T, Error = E> + 'static,
    {
        Self {
            state: State::NotStarted,
            pending: None,
            produced: 0,
            source: Some(Box::new(computation)),
        }
    }

    /// Sequence driven by a step closure.
    pub fn from_fn<F>(step: F) -> Self
    where
        F: FnMut() -> Step<T, E> + 'static,
    {
        Self::new(FromFn::new(step))
    }

    /// Sequence over the items of an iterator; never fails.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
        E: 'static,
    {
        Self::new(FromIter::new(items.into_iter()))
    }

    /// Sequence over an iterator of results, failing at the first `Err`.
    pub fn from_results<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Result<T, E>>,
        I::IntoIter: 'static,
    {
        Self::new(FromResults::new(items.into_iter()))
    }

    /// Sequence driven by an `async` body that yields through [`Co`].
    pub fn coroutine<F, Fut>(producer: F) -> Self
    where
        F: FnOnce(Co<T>) -> Fut,
        Fut: Future<Output = Result<(), E>> + 'static,
        T: 'static,
        E: 'static,
    {
        Self::new(Coroutine::new(producer))
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_terminal()
    }

    /// Whether a produced value is cached and not yet extracted.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of values the computation has produced so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Returns `true` iff a value is available.
    ///
    /// Advances the computation one step only when the cache is empty;
    /// repeated calls without `get_next` in between are no-ops. A failure
    /// from that step is returned here, once, and the sequence becomes
    /// terminal. Afterwards this returns `Ok(false)`.
    pub fn has_next(&mut self) -> Result<bool, SequenceError<E>> {
        self.fill()
    }

    /// Removes and returns the cached value, advancing first if none is
    /// cached.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::Computation`] if the advance made here failed.
    /// - [`SequenceError::Exhausted`] after normal completion.
    /// - [`SequenceError::Failed`] after a failure was already surfaced.
    /// - [`SequenceError::Stalled`] if the computation suspended without a
    ///   value.
    pub fn get_next(&mut self) -> Result<T, SequenceError<E>> {
        self.fill()?;
        match self.pending.take() {
            Some(value) => Ok(value),
            None if self.state == State::Failed => Err(SequenceError::Failed),
            None => Err(SequenceError::Exhausted),
        }
    }

    fn fill(&mut self) -> Result<bool, SequenceError<E>> {
        if self.pending.is_some() {
            return Ok(true);
        }
        let Some(source) = self.source.as_mut() else {
            return Ok(false);
        };

        match source.resume() {
            Step::Yielded(value) => {
                self.produced += 1;
                tracing::trace!(produced = self.produced, "sequence yielded");
                self.state = State::Suspended;
                self.pending = Some(value);
                Ok(true)
            }
            Step::Complete => {
                tracing::debug!(produced = self.produced, "sequence completed");
                self.finish(State::Completed);
                Ok(false)
            }
            Step::Failed(cause) => {
                tracing::warn!(produced = self.produced, "sequence failed");
                self.finish(State::Failed);
                Err(SequenceError::Computation(cause))
            }
            Step::Stalled => {
                tracing::warn!(produced = self.produced, "sequence stalled");
                self.finish(State::Failed);
                Err(SequenceError::Stalled)
            }
        }
    }

    fn finish(&mut self, state: State) {
        self.state = state;
        self.source = None;
    }
}

impl<T, E> Iterator for LazySequence<T, E> {
    type Item = Result<T, SequenceError<E>>;

    /// Yields each value as `Ok`, a failure once as `Err`, then `None`.
    fn next(&mut self) -> Option<Self::Item> {
        match self.fill() {
            Ok(true) => self.pending.take().map(Ok),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let cached = usize::from(self.pending.is_some());
        if self.source.is_none() {
            (cached, Some(cached))
        } else {
            (cached, None)
        }
    }
}

impl<T, E> std::iter::FusedIterator for LazySequence<T, E> {}

impl<T: fmt::Debug, E> fmt::Debug for LazySequence<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySequence")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("produced", &self.produced)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_steps(calls: Rc<Cell<u32>>, limit: u32) -> LazySequence<u32, &'static str> {
        LazySequence::from_fn(move || {
            let n = calls.get();
            calls.set(n + 1);
            if n < limit {
                Step::Yielded(n)
            } else {
                Step::Complete
            }
        })
    }

    #[test]
    fn test_nothing_runs_until_queried() {
        let calls = Rc::new(Cell::new(0));
        let seq = counting_steps(Rc::clone(&calls), 3);
        assert_eq!(seq.state(), State::NotStarted);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_has_next_is_idempotent() {
        let calls = Rc::new(Cell::new(0));
        let mut seq = counting_steps(Rc::clone(&calls), 3);

        assert!(seq.has_next().unwrap());
        assert!(seq.has_next().unwrap());
        assert!(seq.has_next().unwrap());
        assert_eq!(calls.get(), 1);
        assert!(seq.has_pending());
        assert_eq!(seq.get_next().unwrap(), 0);
        assert!(!seq.has_pending());
    }

    #[test]
    fn test_get_next_without_has_next_advances() {
        let calls = Rc::new(Cell::new(0));
        let mut seq = counting_steps(Rc::clone(&calls), 3);

        assert_eq!(seq.get_next().unwrap(), 0);
        assert_eq!(seq.get_next().unwrap(), 1);
        assert_eq!(calls.get(), 2);
        assert_eq!(seq.state(), State::Suspended);
    }

    #[test]
    fn test_drains_in_order_then_false() {
        let mut seq = counting_steps(Rc::new(Cell::new(0)), 4);
        let mut seen = Vec::new();
        while seq.has_next().unwrap() {
            seen.push(seq.get_next().unwrap());
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(seq.state(), State::Completed);
        assert_eq!(seq.produced(), 4);
        assert!(!seq.has_next().unwrap());
    }

    #[test]
    fn test_empty_sequence() {
        let mut seq: LazySequence<u8, ()> = LazySequence::from_iter(Vec::new());
        assert!(!seq.has_next().unwrap());
        assert!(seq.is_completed());
    }

    #[test]
    fn test_get_next_after_completion_is_exhausted() {
        let mut seq: LazySequence<u8, ()> = LazySequence::from_iter(vec![1]);
        assert_eq!(seq.get_next().unwrap(), 1);
        assert!(matches!(seq.get_next(), Err(SequenceError::Exhausted)));
        assert!(matches!(seq.get_next(), Err(SequenceError::Exhausted)));
    }

    #[test]
    fn test_failure_surfaces_once_on_has_next() {
        let mut seq = LazySequence::from_results(vec![Ok(1), Err("bad"), Ok(3)]);

        assert!(seq.has_next().unwrap());
        assert_eq!(seq.get_next().unwrap(), 1);
        match seq.has_next() {
            Err(SequenceError::Computation(cause)) => assert_eq!(cause, "bad"),
            other => panic!("expected computation failure, got {:?}", other),
        }
        assert_eq!(seq.state(), State::Failed);
        assert!(!seq.has_next().unwrap());
        assert!(matches!(seq.get_next(), Err(SequenceError::Failed)));
        assert_eq!(seq.produced(), 1);
    }

    #[test]
    fn test_failure_surfaces_on_get_next() {
        let mut seq: LazySequence<u8, &str> = LazySequence::from_results(vec![Err("early")]);
        assert!(matches!(
            seq.get_next(),
            Err(SequenceError::Computation("early"))
        ));
        assert!(matches!(seq.get_next(), Err(SequenceError::Failed)));
    }

    #[test]
    fn test_source_released_on_terminal_state() {
        struct Guard(Rc<Cell<bool>>);
        impl Drop for Guard {
            fn drop(&mut self) {
                self.0.set(true);
            }
        }

        let released = Rc::new(Cell::new(false));
        let guard = Guard(Rc::clone(&released));
        let mut seq: LazySequence<u8, ()> = LazySequence::from_fn(move || {
            let _held = &guard;
            Step::Complete
        });

        assert!(!released.get());
        assert!(!seq.has_next().unwrap());
        assert!(released.get());
    }

    #[test]
    fn test_iterator_is_fused_after_failure() {
        let seq = LazySequence::from_results(vec![Ok(1), Ok(2), Err("stop"), Ok(4)]);
        let items: Vec<_> = seq.collect();
        assert_eq!(items.len(), 3);
        assert_eq!(*items[0].as_ref().unwrap(), 1);
        assert_eq!(*items[1].as_ref().unwrap(), 2);
        assert!(matches!(items[2], Err(SequenceError::Computation("stop"))));
    }

    #[test]
    fn test_iterator_mixes_with_has_next() {
        let mut seq: LazySequence<u8, ()> = LazySequence::from_iter(vec![5, 6]);
        assert!(seq.has_next().unwrap());
        assert_eq!(seq.next().map(Result::unwrap), Some(5));
        assert_eq!(seq.size_hint(), (0, None));
        assert_eq!(seq.next().map(Result::unwrap), Some(6));
        assert!(seq.next().is_none());
        assert_eq!(seq.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_stalled_coroutine_is_terminal() {
        let mut seq: LazySequence<u8, ()> = LazySequence::coroutine(|_co| async move {
            futures::future::pending::<()>().await;
            Ok(())
        });
        assert!(matches!(seq.has_next(), Err(SequenceError::Stalled)));
        assert_eq!(seq.state(), State::Failed);
        assert!(matches!(seq.get_next(), Err(SequenceError::Failed)));
    }
}
