//! Detached audit delivery
//!
//! A bounded queue drained by a single background worker. Invocations hand
//! their events off without waiting for the ledger round-trip; delivery is
//! best-effort and at-most-once. When the queue is full the event is dropped
//! and counted - the wrapper never blocks the caller and never spawns one
//! task per event.

use crate::sink::AuditSink;
use sealtrace_foundation::AuditEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default queue capacity for detached delivery
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Delivery counters, shared with the worker task
#[derive(Debug, Default)]
struct DispatchStats {
    submitted: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

// ============================================================================
// AuditDispatcher
// ============================================================================

/// Background delivery of audit events through an [`AuditSink`].
///
/// One worker task, one bounded channel. `shutdown` closes the queue and
/// waits for everything already accepted to be submitted; dropping the
/// dispatcher without `shutdown` lets the worker drain on its own time.
pub struct AuditDispatcher {
    tx: mpsc::Sender<AuditEvent>,
    worker: JoinHandle<()>,
    stats: Arc<DispatchStats>,
}

impl AuditDispatcher {
    /// Spawn the delivery worker over `sink` with a bounded queue
    pub fn new(sink: Arc<dyn AuditSink>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<AuditEvent>(capacity.max(1));
        let stats = Arc::new(DispatchStats::default());

        let worker_stats = stats.clone();
        let worker = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match sink.submit(&event).await {
                    Ok(receipt) => {
                        worker_stats.submitted.fetch_add(1, Ordering::Relaxed);
                        debug!(
                            action = %event.action,
                            seal_id = %receipt.seal_id,
                            "detached audit event sealed"
                        );
                    }
                    Err(e) => {
                        // Best-effort: the failure is observable only here
                        worker_stats.failed.fetch_add(1, Ordering::Relaxed);
                        warn!(
                            action = %event.action,
                            target_region = %event.target_region,
                            error = %e,
                            "detached audit event delivery failed"
                        );
                    }
                }
            }
        });

        Self { tx, worker, stats }
    }

    /// Queue one event for delivery. Returns immediately; a full queue drops
    /// the event (counted and logged, never raised).
    pub fn dispatch(&self, event: AuditEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(action = %event.action, "audit queue full; event dropped");
            }
            Err(TrySendError::Closed(event)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(action = %event.action, "audit queue closed; event dropped");
            }
        }
    }

    /// Events delivered successfully so far
    pub fn submitted(&self) -> u64 {
        self.stats.submitted.load(Ordering::Relaxed)
    }

    /// Events whose delivery failed
    pub fn failed(&self) -> u64 {
        self.stats.failed.load(Ordering::Relaxed)
    }

    /// Events dropped because the queue was full or closed
    pub fn dropped(&self) -> u64 {
        self.stats.dropped.load(Ordering::Relaxed)
    }

    /// Close the queue and wait for the worker to drain what was accepted
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            warn!(error = %e, "audit dispatch worker did not shut down cleanly");
        }
    }
}
