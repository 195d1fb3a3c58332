//! Ledger-specific error types
//!
//! `LedgerError` covers the delivery contract of the remote compliance
//! ledger. It converts into `sealtrace_foundation::Error` at the layer
//! boundary.

use sealtrace_foundation::Error as FoundationError;
use thiserror::Error;

/// Default rejection text when the ledger returns 403 with an empty body
const SOVEREIGNTY_REJECTED_DEFAULT: &str =
    "action blocked due to data sovereignty requirements";

/// Errors that can occur while delivering an audit event
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Connection or timeout failure; the event never reached the ledger
    #[error("Ledger transport error: {0}")]
    Transport(String),

    /// The remote authority denied the submission (HTTP 403). Distinct from
    /// the local policy gate - the remote side is the final authority and may
    /// reject events the local gate allowed.
    #[error("SOVEREIGN_LOCK_VIOLATION: {0}")]
    SovereigntyRejected(String),

    /// Any other non-2xx response; the raw body is retained for diagnostics
    #[error("Ledger rejected event: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// 2xx response whose body could not be parsed as a receipt
    #[error("Invalid ledger response: {0}")]
    InvalidResponse(String),
}

impl LedgerError {
    /// Map a non-2xx HTTP response to a ledger error
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            403 => {
                let reason = if body.trim().is_empty() {
                    SOVEREIGNTY_REJECTED_DEFAULT.to_string()
                } else {
                    body.to_string()
                };
                LedgerError::SovereigntyRejected(reason)
            }
            _ => LedgerError::Rejected {
                status,
                body: body.to_string(),
            },
        }
    }

    /// Whether the event definitely never reached the ledger
    pub fn is_transport(&self) -> bool {
        matches!(self, LedgerError::Transport(_))
    }
}

// ============================================================================
// sealtrace_foundation::Error conversion
// ============================================================================

impl From<LedgerError> for FoundationError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Transport(msg) => FoundationError::Transport(msg),
            LedgerError::SovereigntyRejected(msg) => FoundationError::SovereigntyRejected(msg),
            LedgerError::Rejected { status, body } => {
                FoundationError::Ledger(format!("HTTP {}: {}", status, body))
            }
            LedgerError::InvalidResponse(msg) => FoundationError::Ledger(msg),
        }
    }
}
