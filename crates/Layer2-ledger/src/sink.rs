//! Audit sink trait
//!
//! The seam between event producers (the instrumented invoker, the detached
//! dispatcher) and the transport that records events. `LedgerClient` is the
//! production implementation; tests substitute in-memory fakes.

use crate::client::{LedgerClient, LedgerReceipt};
use crate::error::LedgerError;
use async_trait::async_trait;
use sealtrace_foundation::AuditEvent;

/// Destination for audit events
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record one event, returning the ledger's receipt on success
    async fn submit(&self, event: &AuditEvent) -> Result<LedgerReceipt, LedgerError>;
}

#[async_trait]
impl AuditSink for LedgerClient {
    async fn submit(&self, event: &AuditEvent) -> Result<LedgerReceipt, LedgerError> {
        LedgerClient::submit(self, event).await
    }
}
