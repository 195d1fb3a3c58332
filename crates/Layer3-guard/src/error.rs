//! Guard-specific error types
//!
//! `GuardError` is the set of primary failures an instrumented invocation can
//! surface. Exactly one primary failure reaches the caller per invocation;
//! failures of the audit-delivery path alone stay secondary (see
//! [`AuditOutcome`](crate::guard::AuditOutcome)).

use sealtrace_foundation::Error as FoundationError;
use sealtrace_provider::BackendError;
use thiserror::Error;

/// Primary failures of an instrumented invocation
#[derive(Error, Debug)]
pub enum GuardError {
    /// The local policy gate denied the call; the backend was never invoked
    /// and nothing was audited. The reason carries the
    /// `SOVEREIGN_LOCK_VIOLATION` marker.
    #[error("{0}")]
    Policy(String),

    /// The wrapped backend call failed; propagated verbatim
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The remote ledger authority denied the audit submission after an
    /// otherwise-successful backend call (awaited delivery only). The backend
    /// effect stands; this is a post-hoc compliance failure.
    #[error("SOVEREIGN_LOCK_VIOLATION: {0}")]
    SovereigntyRejected(String),
}

impl GuardError {
    /// Whether the backend was never called
    pub fn is_pre_backend(&self) -> bool {
        matches!(self, GuardError::Policy(_))
    }
}

// ============================================================================
// sealtrace_foundation::Error conversion
// ============================================================================

impl From<GuardError> for FoundationError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Policy(reason) => FoundationError::SovereignLockViolation(reason),
            GuardError::Backend(e) => e.into(),
            GuardError::SovereigntyRejected(reason) => {
                FoundationError::SovereigntyRejected(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_passes_through_display() {
        let err = GuardError::Backend(BackendError::Network("connection reset".into()));
        assert_eq!(err.to_string(), "Network error: connection reset");
        assert!(!err.is_pre_backend());
    }

    #[test]
    fn test_foundation_conversion() {
        let err: FoundationError =
            GuardError::Policy("SOVEREIGN_LOCK_VIOLATION: nope".to_string()).into();
        assert!(err.is_sovereignty());

        let err: FoundationError = GuardError::SovereigntyRejected("revoked".to_string()).into();
        assert!(err.is_sovereignty());
    }
}
