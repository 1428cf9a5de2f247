//! Rejection and façade error types.

use thiserror::Error;

/// Refusal by the gate itself. The guarded operation was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BreakerError {
    /// Breaker is open; fail fast until the timeout elapses.
    #[error("circuit breaker is open")]
    Open,

    /// Half-open probe quota is exhausted.
    #[error("too many requests")]
    TooManyRequests,
}

impl BreakerError {
    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            BreakerError::Open => "open",
            BreakerError::TooManyRequests => "too_many_requests",
        }
    }
}

/// Error returned by the guarded-call façade.
#[derive(Debug, Error)]
pub enum ExecuteError<E> {
    /// The breaker refused the call.
    #[error(transparent)]
    Rejected(BreakerError),

    /// The operation ran and returned this error, unchanged.
    #[error("{0}")]
    Inner(E),
}

impl<E> ExecuteError<E> {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ExecuteError::Rejected(_))
    }

    /// The rejection, if the breaker refused the call.
    pub fn rejection(&self) -> Option<BreakerError> {
        match self {
            ExecuteError::Rejected(e) => Some(*e),
            ExecuteError::Inner(_) => None,
        }
    }

    /// The operation's own error, if it ran.
    pub fn into_inner(self) -> Option<E> {
        match self {
            ExecuteError::Rejected(_) => None,
            ExecuteError::Inner(e) => Some(e),
        }
    }
}

impl<E> From<BreakerError> for ExecuteError<E> {
    fn from(err: BreakerError) -> Self {
        ExecuteError::Rejected(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(BreakerError::Open.to_string(), "circuit breaker is open");
        assert_eq!(BreakerError::TooManyRequests.to_string(), "too many requests");
    }

    #[test]
    fn test_execute_error_helpers() {
        let rejected: ExecuteError<std::io::Error> = BreakerError::Open.into();
        assert!(rejected.is_rejected());
        assert_eq!(rejected.rejection(), Some(BreakerError::Open));
        assert!(rejected.into_inner().is_none());

        let inner: ExecuteError<&str> = ExecuteError::Inner("boom");
        assert!(!inner.is_rejected());
        assert_eq!(inner.to_string(), "boom");
        assert_eq!(inner.into_inner(), Some("boom"));
    }
}
