use thiserror::Error;

/// Default failure type raised by a producing computation.
pub type Failure = anyhow::Error;

/// Errors surfaced by [`LazySequence`](crate::LazySequence) queries.
///
/// The cause is displayed rather than chained as `source()`, so the default
/// `anyhow::Error` cause still yields a `std::error::Error`.
///
/// `Computation` is the only variant that originates inside the producer.
/// The others describe a caller querying a sequence that can no longer
/// produce anything.
#[derive(Error, Debug)]
pub enum SequenceError<E = Failure> {
    #[error("computation failed: {0}")]
    Computation(E),

    #[error("sequence is exhausted")]
    Exhausted,

    #[error("sequence already failed and cannot be resumed")]
    Failed,

    #[error("computation suspended without yielding a value")]
    Stalled,
}

impl<E> SequenceError<E> {
    pub fn is_computation(&self) -> bool {
        matches!(self, SequenceError::Computation(_))
    }

    /// Returns the producer's own failure, if this is one.
    pub fn into_cause(self) -> Option<E> {
        match self {
            SequenceError::Computation(cause) => Some(cause),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&E> {
        match self {
            SequenceError::Computation(cause) => Some(cause),
            _ => None,
        }
    }

    /// Converts the cause type, leaving usage errors untouched.
    pub fn map_cause<F, O>(self, f: F) -> SequenceError<O>
    where
        F: FnOnce(E) -> O,
    {
        match self {
            SequenceError::Computation(cause) => SequenceError::Computation(f(cause)),
            SequenceError::Exhausted => SequenceError::Exhausted,
            SequenceError::Failed => SequenceError::Failed,
            SequenceError::Stalled => SequenceError::Stalled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Error, Debug, PartialEq)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_computation_carries_cause() {
        let err: SequenceError<Boom> = SequenceError::Computation(Boom);
        assert!(err.is_computation());
        assert_eq!(err.to_string(), "computation failed: boom");
        assert_eq!(err.cause(), Some(&Boom));
        assert_eq!(err.into_cause(), Some(Boom));
    }

    #[test]
    fn test_usage_errors_have_no_cause() {
        let err: SequenceError<Boom> = SequenceError::Exhausted;
        assert!(!err.is_computation());
        assert_eq!(err.to_string(), "sequence is exhausted");
        assert!(err.cause().is_none());
        assert_eq!(err.into_cause(), None);
    }

    #[test]
    fn test_map_cause() {
        let err: SequenceError<Boom> = SequenceError::Computation(Boom);
        let mapped = err.map_cause(|b| b.to_string());
        assert_eq!(mapped.cause().map(String::as_str), Some("boom"));

        let stalled: SequenceError<Boom> = SequenceError::Stalled;
        assert!(matches!(
            stalled.map_cause(|b| b.to_string()),
            SequenceError::Stalled
        ));
    }
}
