//! Audit Event Model
//!
//! The structured record describing one backend invocation attempt, success
//! or failure, in the exact shape the remote ledger accepts. Events are
//! constructed, submitted once, and discarded - there is no local store.

pub mod types;

// Re-exports
pub use types::{
    error_action, truncate_payload, AuditEvent, HardwareClass, ERROR_ACTION_SUFFIX,
    MAX_PAYLOAD_CHARS, TRUNCATION_MARKER,
};
