//! Compliance guard - the instrumented invocation wrapper
//!
//! Wraps a backend call with the sovereignty gate, wall-clock timing, and an
//! unconditional audit submission. The backend's own response passes through
//! untouched; the guard only adds the compliance trail around it.

use crate::error::GuardError;
use crate::metadata::CallMetadata;
use futures::{Stream, StreamExt};
use sealtrace_foundation::{
    error_action, truncate_payload, AuditEvent, PolicyDecision, RegionPolicy, DEFAULT_AGENT_ID,
    MAX_PAYLOAD_CHARS,
};
use sealtrace_ledger::{
    AuditDispatcher, AuditSink, LedgerError, LedgerReceipt, DEFAULT_QUEUE_CAPACITY,
};
use sealtrace_provider::{Backend, BackendDescriptor, BackendError, StreamingBackend};
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Chunks forwarded to the caller, with guard errors at the failure point
pub type GuardedStream<'a, C> =
    Pin<Box<dyn Stream<Item = Result<C, GuardError>> + Send + 'a>>;

// ============================================================================
// DeliveryMode
// ============================================================================

/// How audit submissions relate to the invocation's return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// The invocation does not return until the event was submitted (or its
    /// failure observed). Adds the ledger round-trip to caller latency.
    #[default]
    Awaited,

    /// The event is queued for a background worker and the invocation returns
    /// as soon as the backend response is available. Best-effort,
    /// at-most-once: the event may be lost if the process exits first or the
    /// queue is full.
    Detached,
}

// ============================================================================
// GuardConfig
// ============================================================================

/// Guard construction options
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Caller-assigned agent identifier stamped on every event
    pub agent_id: String,

    /// Audit delivery mode
    pub delivery: DeliveryMode,

    /// Queue capacity for detached delivery
    pub queue_capacity: usize,

    /// Payload bound, in characters, applied before event construction
    pub max_payload_chars: usize,

    /// Region attributed to error-variant events. `None` uses the per-call
    /// requested region.
    pub error_region: Option<String>,

    /// Default region validated once at construction. Per-call regions are
    /// always re-validated regardless.
    pub bound_region: Option<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            agent_id: DEFAULT_AGENT_ID.to_string(),
            delivery: DeliveryMode::Awaited,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_payload_chars: MAX_PAYLOAD_CHARS,
            error_region: None,
            bound_region: None,
        }
    }
}

impl GuardConfig {
    /// Create a config for an agent identifier
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            ..Default::default()
        }
    }

    /// Set the delivery mode
    pub fn with_delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }

    /// Set the detached-delivery queue capacity
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the payload bound in characters
    pub fn with_max_payload_chars(mut self, max_chars: usize) -> Self {
        self.max_payload_chars = max_chars;
        self
    }

    /// Attribute error-variant events to a fixed region
    pub fn with_error_region(mut self, region: impl Into<String>) -> Self {
        self.error_region = Some(region.into());
        self
    }

    /// Validate a default region once at construction
    pub fn with_bound_region(mut self, region: impl Into<String>) -> Self {
        self.bound_region = Some(region.into());
        self
    }
}

// ============================================================================
// Invocation results
// ============================================================================

/// What happened to the audit submission for a successful invocation
#[derive(Debug)]
pub enum AuditOutcome {
    /// The ledger sealed the event
    Recorded(LedgerReceipt),

    /// Delivery failed (transport or unexpected status); secondary - the
    /// backend response was still returned
    Failed(LedgerError),

    /// Queued for detached delivery; no delivery guarantee
    Queued,
}

impl AuditOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, AuditOutcome::Recorded(_))
    }

    /// Ledger receipt, when the event was sealed synchronously
    pub fn receipt(&self) -> Option<&LedgerReceipt> {
        match self {
            AuditOutcome::Recorded(receipt) => Some(receipt),
            _ => None,
        }
    }
}

/// A successful invocation: the backend's unmodified response plus the fate
/// of its audit submission
#[derive(Debug)]
pub struct Invoked<R> {
    pub response: R,
    pub audit: AuditOutcome,
}

// ============================================================================
// ComplianceGuard
// ============================================================================

/// Instrumented invoker.
///
/// For every call: gate the target region, execute the backend call, measure
/// the wall-clock span of the call alone, and submit exactly one audit event
/// describing the outcome. Safe to share across concurrent invocations.
pub struct ComplianceGuard {
    policy: RegionPolicy,
    sink: Arc<dyn AuditSink>,
    dispatcher: Option<AuditDispatcher>,
    config: GuardConfig,
}

impl ComplianceGuard {
    /// Create a guard over a policy and an audit sink.
    ///
    /// Fails when `config.bound_region` is set and the policy denies it.
    /// Detached delivery spawns the background worker here, so construction
    /// must happen inside a tokio runtime in that mode.
    pub fn new(
        policy: RegionPolicy,
        sink: Arc<dyn AuditSink>,
        config: GuardConfig,
    ) -> Result<Self, GuardError> {
        if let Some(region) = &config.bound_region {
            if let PolicyDecision::Deny(reason) = policy.check(region) {
                return Err(GuardError::Policy(reason));
            }
        }

        let dispatcher = match config.delivery {
            DeliveryMode::Detached => {
                Some(AuditDispatcher::new(sink.clone(), config.queue_capacity))
            }
            DeliveryMode::Awaited => None,
        };

        Ok(Self {
            policy,
            sink,
            dispatcher,
            config,
        })
    }

    /// Policy this guard enforces
    pub fn policy(&self) -> &RegionPolicy {
        &self.policy
    }

    /// Construction options
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Detached-delivery dispatcher, when running in that mode
    pub fn dispatcher(&self) -> Option<&AuditDispatcher> {
        self.dispatcher.as_ref()
    }

    /// Drain detached delivery and release the worker. A no-op under awaited
    /// delivery.
    pub async fn shutdown(self) {
        if let Some(dispatcher) = self.dispatcher {
            dispatcher.shutdown().await;
        }
    }

    /// Execute one single-shot backend call under compliance instrumentation.
    ///
    /// The backend response is returned unmodified. Exactly one primary
    /// failure can surface: the gate denial, the backend error, or - only
    /// after a successful call under awaited delivery - a remote sovereignty
    /// rejection.
    pub async fn invoke<B: Backend>(
        &self,
        backend: &B,
        request: &B::Request,
        meta: CallMetadata,
    ) -> Result<Invoked<B::Response>, GuardError> {
        if let PolicyDecision::Deny(reason) = self.policy.check(&meta.target_region) {
            debug!(
                action = %meta.action,
                target_region = %meta.target_region,
                "invocation blocked by sovereignty gate"
            );
            return Err(GuardError::Policy(reason));
        }

        let payload = self.render_payload(request);
        let started = Instant::now();

        match backend.invoke(request).await {
            Ok(response) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let event =
                    self.success_event(&meta, payload, elapsed_ms, backend.descriptor());
                let audit = self.deliver(event).await?;
                Ok(Invoked { response, audit })
            }
            Err(backend_err) => {
                let event = self.error_event(&meta, &backend_err);
                self.deliver_best_effort(event).await;
                Err(GuardError::Backend(backend_err))
            }
        }
    }

    /// Open one streamed backend call under compliance instrumentation.
    ///
    /// Chunks are forwarded to the caller as received - never reordered,
    /// dropped, or withheld for batching. A single summary event covering the
    /// whole stream is submitted after the backend signals completion; a
    /// mid-stream backend error produces one error-variant event and ends the
    /// stream at the failure point, keeping the chunks already yielded.
    pub fn stream<'a, B>(
        &'a self,
        backend: &'a B,
        request: &'a B::Request,
        meta: CallMetadata,
    ) -> Result<GuardedStream<'a, B::Chunk>, GuardError>
    where
        B: StreamingBackend,
        B::Chunk: 'a,
    {
        if let PolicyDecision::Deny(reason) = self.policy.check(&meta.target_region) {
            debug!(
                action = %meta.action,
                target_region = %meta.target_region,
                "stream blocked by sovereignty gate"
            );
            return Err(GuardError::Policy(reason));
        }

        let payload = self.render_payload(request);
        let descriptor = backend.descriptor().clone();
        let started = Instant::now();
        let mut inner = backend.stream(request);

        Ok(Box::pin(async_stream::stream! {
            while let Some(item) = inner.next().await {
                match item {
                    Ok(chunk) => yield Ok(chunk),
                    Err(backend_err) => {
                        let event = self.error_event(&meta, &backend_err);
                        self.deliver_best_effort(event).await;
                        yield Err(GuardError::Backend(backend_err));
                        return;
                    }
                }
            }

            let elapsed_ms = started.elapsed().as_millis() as u64;
            let event = self.success_event(&meta, payload, elapsed_ms, &descriptor);
            match self.deliver(event).await {
                Ok(outcome) => {
                    debug!(action = %meta.action, recorded = outcome.is_recorded(), "stream audit delivered");
                }
                Err(err) => yield Err(err),
            }
        }))
    }

    // ------------------------------------------------------------------
    // Event construction
    // ------------------------------------------------------------------

    fn render_payload<T: Serialize>(&self, request: &T) -> String {
        let raw = serde_json::to_string(request)
            .unwrap_or_else(|e| format!("<unserializable request: {}>", e));
        truncate_payload(&raw, self.config.max_payload_chars)
    }

    fn success_event(
        &self,
        meta: &CallMetadata,
        payload: String,
        elapsed_ms: u64,
        descriptor: &BackendDescriptor,
    ) -> AuditEvent {
        let mut event = AuditEvent::new(
            &self.config.agent_id,
            &meta.action,
            payload,
            &meta.target_region,
        )
        .with_duration(elapsed_ms)
        .with_system(&descriptor.system_id)
        .with_model(&descriptor.model_name)
        .with_hardware(descriptor.hardware);

        if let Some(version) = &descriptor.model_version {
            event = event.with_model_version(version);
        }
        if let Some(watts) = descriptor.gpu_power_watts {
            event = event.with_gpu_power(watts);
        }
        if let Some(watts) = descriptor.cpu_power_watts {
            event = event.with_cpu_power(watts);
        }
        if let Some(user) = &meta.user_id {
            event = event.with_user(user);
        }
        if meta.requires_human_oversight {
            event = event.with_human_oversight();
        }
        event
    }

    /// Error events omit timing and model fields - they were not known at
    /// failure time - and can attribute a configured region instead of the
    /// requested one.
    fn error_event(&self, meta: &CallMetadata, error: &BackendError) -> AuditEvent {
        let region = self
            .config
            .error_region
            .as_deref()
            .unwrap_or(&meta.target_region);
        let payload = truncate_payload(
            &format!("Error: {}", error),
            self.config.max_payload_chars,
        );

        let mut event = AuditEvent::new(
            &self.config.agent_id,
            error_action(&meta.action),
            payload,
            region,
        );
        if let Some(user) = &meta.user_id {
            event = event.with_user(user);
        }
        if meta.requires_human_oversight {
            event = event.with_human_oversight();
        }
        event
    }

    // ------------------------------------------------------------------
    // Delivery
    // ------------------------------------------------------------------

    /// Deliver a success event. Awaited delivery promotes a remote
    /// sovereignty rejection to the invocation's primary error; any other
    /// delivery failure stays secondary.
    async fn deliver(&self, event: AuditEvent) -> Result<AuditOutcome, GuardError> {
        match &self.dispatcher {
            Some(dispatcher) => {
                dispatcher.dispatch(event);
                Ok(AuditOutcome::Queued)
            }
            None => match self.sink.submit(&event).await {
                Ok(receipt) => Ok(AuditOutcome::Recorded(receipt)),
                Err(LedgerError::SovereigntyRejected(reason)) => {
                    Err(GuardError::SovereigntyRejected(reason))
                }
                Err(err) => {
                    warn!(
                        action = %event.action,
                        error = %err,
                        "audit delivery failed; backend response retained"
                    );
                    Ok(AuditOutcome::Failed(err))
                }
            },
        }
    }

    /// Deliver an error event. Best-effort on every path: a failure here is
    /// logged and discarded, never raised in place of the backend error.
    async fn deliver_best_effort(&self, event: AuditEvent) {
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.dispatch(event),
            None => {
                if let Err(err) = self.sink.submit(&event).await {
                    warn!(
                        action = %event.action,
                        error = %err,
                        "audit delivery failed while reporting a backend failure"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GuardConfig::default();
        assert_eq!(config.delivery, DeliveryMode::Awaited);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.max_payload_chars, MAX_PAYLOAD_CHARS);
        assert_eq!(config.error_region, None);
        assert_eq!(config.bound_region, None);
    }

    #[test]
    fn test_config_builder() {
        let config = GuardConfig::new("bedrock-agent")
            .with_delivery(DeliveryMode::Detached)
            .with_queue_capacity(32)
            .with_max_payload_chars(200)
            .with_error_region("eu-central-1")
            .with_bound_region("eu-west-1");

        assert_eq!(config.agent_id, "bedrock-agent");
        assert_eq!(config.delivery, DeliveryMode::Detached);
        assert_eq!(config.queue_capacity, 32);
        assert_eq!(config.max_payload_chars, 200);
        assert_eq!(config.error_region.as_deref(), Some("eu-central-1"));
        assert_eq!(config.bound_region.as_deref(), Some("eu-west-1"));
    }
}
