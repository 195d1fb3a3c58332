//! # sealtrace-foundation
//!
//! Foundation layer for SealTrace:
//! - Error: central error type shared across the workspace
//! - Policy: sovereignty gate (region prefix allow-list, pure)
//! - Audit: the wire model for ledger audit events
//! - Config: explicit ledger configuration (code / env / TOML)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  caller ──► ComplianceGuard (Layer3)                    │
//! │               │ check                                   │
//! │               ▼                                         │
//! │        RegionPolicy ──► PolicyDecision                  │
//! │               │ allow                                   │
//! │               ▼                                         │
//! │        Backend (Layer2-provider)                        │
//! │               │ outcome                                 │
//! │               ▼                                         │
//! │        AuditEvent ──► LedgerClient (Layer2-ledger)      │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod policy;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Policy (sovereignty gate)
// ============================================================================
pub use policy::{PolicyDecision, RegionPolicy, EU_REGION_PREFIXES, SOVEREIGN_LOCK_MARKER};

// ============================================================================
// Audit (event model)
// ============================================================================
pub use audit::{
    error_action, truncate_payload, AuditEvent, HardwareClass, ERROR_ACTION_SUFFIX,
    MAX_PAYLOAD_CHARS, TRUNCATION_MARKER,
};

// ============================================================================
// Config
// ============================================================================
pub use config::{
    LedgerConfig, DEFAULT_AGENT_ID, DEFAULT_LEDGER_URL, DEFAULT_TIMEOUT_SECS, ENV_AGENT_ID,
    ENV_API_KEY, ENV_LEDGER_URL,
};
