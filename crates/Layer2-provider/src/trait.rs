//! Backend capability traits and common types
//!
//! Adapters declare their capability explicitly: every backend implements
//! [`Backend`] (single-shot `invoke`), and those that can stream also
//! implement [`StreamingBackend`]. The interception layer dispatches on the
//! declared capability - there is no runtime probing for a `stream` method.

use crate::error::BackendError;
use async_trait::async_trait;
use futures::Stream;
use sealtrace_foundation::HardwareClass;
use serde::Serialize;
use std::pin::Pin;

/// Lazy, finite, non-restartable sequence of chunks from a streaming call
pub type ChunkStream<'a, C> = Pin<Box<dyn Stream<Item = Result<C, BackendError>> + Send + 'a>>;

// ============================================================================
// BackendDescriptor
// ============================================================================

/// Vendor metadata copied into every audit event for this backend
#[derive(Debug, Clone)]
pub struct BackendDescriptor {
    /// Backend family (e.g. "openai", "huggingface")
    pub system_id: String,

    /// Model name (e.g. "gpt-4o")
    pub model_name: String,

    /// Model version, when the vendor exposes one
    pub model_version: Option<String>,

    /// Hardware class the inference runs on
    pub hardware: HardwareClass,

    /// GPU power-draw estimate in watts
    pub gpu_power_watts: Option<f64>,

    /// CPU power-draw estimate in watts
    pub cpu_power_watts: Option<f64>,
}

impl BackendDescriptor {
    /// Create a descriptor for a backend family and model
    pub fn new(
        system_id: impl Into<String>,
        model_name: impl Into<String>,
        hardware: HardwareClass,
    ) -> Self {
        Self {
            system_id: system_id.into(),
            model_name: model_name.into(),
            model_version: None,
            hardware,
            gpu_power_watts: None,
            cpu_power_watts: None,
        }
    }

    /// Set the model version
    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.model_version = Some(version.into());
        self
    }

    /// Set the GPU power-draw estimate
    pub fn with_gpu_power(mut self, watts: f64) -> Self {
        self.gpu_power_watts = Some(watts);
        self
    }

    /// Set the CPU power-draw estimate
    pub fn with_cpu_power(mut self, watts: f64) -> Self {
        self.cpu_power_watts = Some(watts);
        self
    }
}

// ============================================================================
// Backend traits
// ============================================================================

/// A backend that supports single-shot invocation.
///
/// `Request` must serialize so the interception layer can place the request
/// (bounded) into the audit payload; the response passes through untouched.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Request type accepted by this backend
    type Request: Serialize + Send + Sync;

    /// Response type returned by this backend, passed through unmodified
    type Response: Send;

    /// Vendor metadata for audit events
    fn descriptor(&self) -> &BackendDescriptor;

    /// Execute one call against the vendor API
    async fn invoke(&self, request: &Self::Request) -> Result<Self::Response, BackendError>;
}

/// A backend that additionally supports streamed invocation
pub trait StreamingBackend: Backend {
    /// Chunk type produced by the stream
    type Chunk: Send;

    /// Open a streaming call. The stream is lazy and non-restartable;
    /// chunks arrive in vendor order.
    fn stream(&self, request: &Self::Request) -> ChunkStream<'_, Self::Chunk>;
}
