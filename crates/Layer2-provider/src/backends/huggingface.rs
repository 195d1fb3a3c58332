//! Hugging Face Inference API backend (invoke-only)

use crate::{
    error::BackendError,
    r#trait::{Backend, BackendDescriptor},
};
use async_trait::async_trait;
use reqwest::Client;
use sealtrace_foundation::HardwareClass;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Inference API root
pub const DEFAULT_API_URL: &str = "https://api-inference.huggingface.co/models";

/// Reference power-draw estimate for CPU inference, in watts
pub const CPU_POWER_WATTS: f64 = 100.0;

/// Reference power-draw estimate for GPU inference, in watts
pub const GPU_POWER_WATTS: f64 = 250.0;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Hugging Face text-generation backend.
///
/// Declares the single-shot capability only - the Inference API task
/// endpoints used here do not stream. The audit action is task-qualified
/// (`huggingface_<task>`).
pub struct HuggingFaceBackend {
    client: Client,
    api_token: String,
    base_url: String,
    task: String,
    descriptor: BackendDescriptor,
}

impl HuggingFaceBackend {
    /// Create a CPU-hosted backend for a model and task
    /// (e.g. task "text-generation")
    pub fn new(
        api_token: impl Into<String>,
        model: impl Into<String>,
        task: impl Into<String>,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| BackendError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_token: api_token.into(),
            base_url: DEFAULT_API_URL.to_string(),
            task: task.into(),
            descriptor: BackendDescriptor::new("huggingface", model, HardwareClass::Cpu)
                .with_cpu_power(CPU_POWER_WATTS),
        })
    }

    /// Mark the model as GPU-hosted, switching the hardware class and the
    /// power-draw estimate
    pub fn on_gpu(mut self) -> Self {
        self.descriptor.hardware = HardwareClass::Gpu;
        self.descriptor.gpu_power_watts = Some(GPU_POWER_WATTS);
        self.descriptor.cpu_power_watts = None;
        self
    }

    /// Use a custom Inference API root (private endpoints)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Task this backend was created for
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Task-qualified audit action name (e.g. "huggingface_text-generation")
    pub fn action(&self) -> String {
        format!("huggingface_{}", self.task)
    }

    fn model_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.descriptor.model_name
        )
    }
}

#[async_trait]
impl Backend for HuggingFaceBackend {
    type Request = GenerationRequest;
    type Response = Vec<GeneratedText>;

    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, request: &Self::Request) -> Result<Self::Response, BackendError> {
        let response = self
            .client
            .post(self.model_url())
            .bearer_auth(&self.api_token)
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // The API wraps error text as {"error": "..."}
            if let Ok(wire) = serde_json::from_str::<WireErrorResponse>(&body) {
                return Err(BackendError::from_http_status(status.as_u16(), &wire.error));
            }
            return Err(BackendError::from_http_status(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

// ============================================================================
// Request / Response types
// ============================================================================

/// Text-generation request
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub inputs: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<GenerationParameters>,
}

impl GenerationRequest {
    pub fn new(inputs: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// Generation tuning knobs
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// One generated candidate, passed through unmodified
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}

#[derive(Debug, Deserialize)]
struct WireErrorResponse {
    error: String,
}
