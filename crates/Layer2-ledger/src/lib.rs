//! # sealtrace-ledger
//!
//! Ledger client layer for SealTrace.
//! Delivers audit events to the remote compliance ledger and maps transport
//! and HTTP outcomes to domain errors.
//!
//! ## Features
//! - One long-lived pooled HTTP client per `LedgerClient`
//! - Fixed request timeout, bearer-token authorization when configured
//! - Exactly one submission attempt per event (no retry, no dedup)
//! - Bounded background dispatcher for detached delivery

pub mod client;
pub mod dispatch;
pub mod error;
pub mod sink;

// Client and receipt
pub use client::{LedgerClient, LedgerReceipt, LOG_ACTION_PATH};

// Error
pub use error::LedgerError;

// Sink seam and detached delivery
pub use dispatch::{AuditDispatcher, DEFAULT_QUEUE_CAPACITY};
pub use sink::AuditSink;
