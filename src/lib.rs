//! Lazy, pull-based sequence generator.
//!
//! A [`LazySequence`] wraps a computation that produces values one yield
//! point at a time. Callers drive it with `has_next` / `get_next` (or as an
//! [`Iterator`]); the computation only runs while a caller is asking for the
//! next value, and a single-slot cache makes sure each produced value is
//! delivered exactly once.
//!
//! Computations come in three shapes:
//!
//! - a step closure returning [`Step`] ([`LazySequence::from_fn`]),
//! - an ordinary iterator ([`LazySequence::from_iter`], [`LazySequence::from_results`]),
//! - an `async` body yielding through [`Co`] ([`LazySequence::coroutine`]).
//!
//! Failures are values: a failing step surfaces as
//! [`SequenceError::Computation`] on the query that ran it, and the sequence is
//! terminal afterwards. Dropping a sequence at any point drops the computation
//! with it.

pub mod config;
pub mod coroutine;
pub mod demo;
pub mod error;
pub mod sequence;
pub mod step;

pub use coroutine::{Co, Coroutine, YieldNow};
pub use error::{Failure, SequenceError};
pub use sequence::{LazySequence, State};
pub use step::{FromFn, FromIter, FromResults, Resume, Step};

/// Crate version, shown in the demo banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
