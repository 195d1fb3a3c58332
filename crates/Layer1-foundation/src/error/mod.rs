//! Error types for SealTrace
//!
//! Central error type shared across the workspace. Crate-local errors
//! (`LedgerError`, `BackendError`, `GuardError`) convert into this type at
//! layer boundaries.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// SealTrace error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Sovereignty / policy
    // ========================================================================
    /// The local policy gate denied the call before any backend interaction.
    #[error("{0}")]
    SovereignLockViolation(String),

    /// The remote ledger authority denied the audit submission itself.
    #[error("Sovereignty rejected by ledger: {0}")]
    SovereigntyRejected(String),

    // ========================================================================
    // Ledger delivery
    // ========================================================================
    #[error("Ledger transport error: {0}")]
    Transport(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    // ========================================================================
    // Backend
    // ========================================================================
    #[error("Backend error: {0}")]
    Backend(String),

    // ========================================================================
    // General
    // ========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // External error conversions
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Misc
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error is a sovereignty failure, local or remote
    pub fn is_sovereignty(&self) -> bool {
        matches!(
            self,
            Error::SovereignLockViolation(_) | Error::SovereigntyRejected(_)
        )
    }

    /// Whether this error comes from the audit-delivery path alone
    /// (the wrapped backend call may still have succeeded)
    pub fn is_delivery(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Ledger(_) | Error::SovereigntyRejected(_)
        )
    }
}

// ============================================================================
// From implementations (extra conversions)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sovereignty_classification() {
        let local = Error::SovereignLockViolation("blocked".to_string());
        let remote = Error::SovereigntyRejected("blocked".to_string());
        let transport = Error::Transport("connection refused".to_string());

        assert!(local.is_sovereignty());
        assert!(remote.is_sovereignty());
        assert!(!transport.is_sovereignty());

        assert!(!local.is_delivery());
        assert!(remote.is_delivery());
        assert!(transport.is_delivery());
    }
}
