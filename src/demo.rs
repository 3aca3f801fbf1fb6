//! The overflow demo: a producer that counts up and fails once the next
//! value would pass a limit.

use thiserror::Error;

use crate::error::SequenceError;
use crate::sequence::LazySequence;

pub const DEFAULT_UPPER_BOUND: u64 = 15;
pub const DEFAULT_OVERFLOW_LIMIT: u64 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Elements would overflow.")]
pub struct Overflow {
    pub value: u64,
    pub limit: u64,
}

/// Yields `0..=upper_bound`, failing with [`Overflow`] instead of yielding
/// any value greater than `limit`.
pub fn counting_with_limit(upper_bound: u64, limit: u64) -> LazySequence<u64> {
    LazySequence::coroutine(move |co| async move {
        for value in 0..=upper_bound {
            if value > limit {
                return Err(anyhow::Error::new(Overflow { value, limit }));
            }
            co.yield_(value).await;
        }
        Ok(())
    })
}

/// Result of draining a sequence to its end.
#[derive(Debug)]
pub struct DrainReport<T, E> {
    pub values: Vec<T>,
    pub failure: Option<SequenceError<E>>,
}

impl<T, E> DrainReport<T, E> {
    pub fn is_clean(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs the `while has_next { get_next }` loop, handing each value to `sink`
/// with its index, and stops at completion or at the first failure.
pub fn drain<T, E, F>(seq: &mut LazySequence<T, E>, mut sink: F) -> DrainReport<T, E>
where
    F: FnMut(usize, &T),
{
    let mut values = Vec::new();
    let failure = loop {
        match seq.has_next() {
            Ok(true) => {}
            Ok(false) => break None,
            Err(e) => break Some(e),
        }
        match seq.get_next() {
            Ok(value) => {
                sink(values.len(), &value);
                values.push(value);
            }
            Err(e) => break Some(e),
        }
    };
    DrainReport { values, failure }
}
