//! Audit event types
//!
//! Wire model for ledger submissions. Every optional field serializes as an
//! explicit `null` - the ledger's schema expects the full key set on every
//! event.

use serde::{Deserialize, Serialize};

/// Maximum payload length (in characters) placed in an audit event
pub const MAX_PAYLOAD_CHARS: usize = 1000;

/// Marker appended to payloads cut at [`MAX_PAYLOAD_CHARS`]
pub const TRUNCATION_MARKER: &str = "...";

/// Suffix marking the error variant of an action name
pub const ERROR_ACTION_SUFFIX: &str = "_error";

// ============================================================================
// HardwareClass
// ============================================================================

/// Hardware class the backend ran the inference on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HardwareClass {
    Cpu,
    Gpu,
    Cloud,
}

impl HardwareClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Gpu => "GPU",
            Self::Cloud => "CLOUD",
        }
    }
}

impl std::fmt::Display for HardwareClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// AuditEvent
// ============================================================================

/// One record per attempted backend invocation.
///
/// `action`, `payload` and `target_region` are always present;
/// `target_region` is the value the policy gate checked before the call, not
/// a value inferred afterwards. An event describing a failed attempt carries
/// an action suffixed with [`ERROR_ACTION_SUFFIX`] and omits the timing and
/// model fields that were not yet known at failure time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Caller-assigned agent identifier
    pub agent_id: String,

    /// Vendor+operation qualified action name (e.g. "openai_chat_completion")
    pub action: String,

    /// Serialized request, truncated to a bounded size before transmission
    pub payload: String,

    /// Region the call targeted - the value the policy gate checked
    pub target_region: String,

    /// End-user identifier, when known
    pub user_id: Option<String>,

    /// Whether the action requires human oversight
    pub requires_human_oversight: bool,

    /// Wall-clock span of the backend call alone, in milliseconds
    pub inference_time_ms: Option<u64>,

    /// GPU power-draw estimate in watts
    pub gpu_power_rating_watts: Option<f64>,

    /// CPU power-draw estimate in watts
    pub cpu_power_rating_watts: Option<f64>,

    /// Backend family (e.g. "openai", "huggingface")
    pub system_id: Option<String>,

    /// Model name
    pub model_name: Option<String>,

    /// Model version
    pub model_version: Option<String>,

    /// Hardware class
    pub hardware_type: Option<HardwareClass>,
}

impl AuditEvent {
    /// Create an event with the always-present fields.
    ///
    /// The payload is stored as given; callers bound it with
    /// [`truncate_payload`] before construction.
    pub fn new(
        agent_id: impl Into<String>,
        action: impl Into<String>,
        payload: impl Into<String>,
        target_region: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            action: action.into(),
            payload: payload.into(),
            target_region: target_region.into(),
            user_id: None,
            requires_human_oversight: false,
            inference_time_ms: None,
            gpu_power_rating_watts: None,
            cpu_power_rating_watts: None,
            system_id: None,
            model_name: None,
            model_version: None,
            hardware_type: None,
        }
    }

    /// Set the end-user identifier
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Flag the action as requiring human oversight
    pub fn with_human_oversight(mut self) -> Self {
        self.requires_human_oversight = true;
        self
    }

    /// Set the measured inference duration
    pub fn with_duration(mut self, inference_time_ms: u64) -> Self {
        self.inference_time_ms = Some(inference_time_ms);
        self
    }

    /// Set the backend family
    pub fn with_system(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = Some(system_id.into());
        self
    }

    /// Set the model name
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Set the model version
    pub fn with_model_version(mut self, model_version: impl Into<String>) -> Self {
        self.model_version = Some(model_version.into());
        self
    }

    /// Set the hardware class
    pub fn with_hardware(mut self, hardware: HardwareClass) -> Self {
        self.hardware_type = Some(hardware);
        self
    }

    /// Set the GPU power-draw estimate
    pub fn with_gpu_power(mut self, watts: f64) -> Self {
        self.gpu_power_rating_watts = Some(watts);
        self
    }

    /// Set the CPU power-draw estimate
    pub fn with_cpu_power(mut self, watts: f64) -> Self {
        self.cpu_power_rating_watts = Some(watts);
        self
    }

    /// Whether this event describes a failed attempt
    pub fn is_error(&self) -> bool {
        self.action.ends_with(ERROR_ACTION_SUFFIX)
    }
}

/// Error-variant action name for a base action
pub fn error_action(action: &str) -> String {
    format!("{}{}", action, ERROR_ACTION_SUFFIX)
}

/// Bound a payload to `max_chars` characters, appending [`TRUNCATION_MARKER`]
/// when anything was cut. Cuts on a character boundary, never mid-codepoint.
pub fn truncate_payload(payload: &str, max_chars: usize) -> String {
    match payload.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut truncated = payload[..byte_idx].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = AuditEvent::new("bedrock-agent", "aws_bedrock_invoke", "{}", "eu-west-1")
            .with_duration(120)
            .with_system("aws-bedrock")
            .with_model("anthropic.claude-v2")
            .with_hardware(HardwareClass::Cloud);

        assert_eq!(event.agent_id, "bedrock-agent");
        assert_eq!(event.target_region, "eu-west-1");
        assert_eq!(event.inference_time_ms, Some(120));
        assert_eq!(event.hardware_type, Some(HardwareClass::Cloud));
        assert!(!event.is_error());
        assert!(!event.requires_human_oversight);
    }

    #[test]
    fn test_error_variant_action() {
        assert_eq!(error_action("openai_chat_completion"), "openai_chat_completion_error");

        let event = AuditEvent::new(
            "agent",
            error_action("vertex_ai_chat"),
            "Error: boom",
            "europe-west1",
        );
        assert!(event.is_error());
        assert_eq!(event.inference_time_ms, None);
        assert_eq!(event.model_name, None);
    }

    #[test]
    fn test_unset_optionals_serialize_as_null() {
        let event = AuditEvent::new("agent", "huggingface_text-generation", "hi", "eu-west-1");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["action"], "huggingface_text-generation");
        assert!(json["user_id"].is_null());
        assert!(json["inference_time_ms"].is_null());
        assert!(json["model_version"].is_null());
        assert!(json["hardware_type"].is_null());
        assert_eq!(json["requires_human_oversight"], false);
        // Every wire key present even when unset
        let keys = json.as_object().unwrap();
        assert_eq!(keys.len(), 13);
    }

    #[test]
    fn test_hardware_class_wire_format() {
        assert_eq!(
            serde_json::to_string(&HardwareClass::Cloud).unwrap(),
            "\"CLOUD\""
        );
        assert_eq!(serde_json::to_string(&HardwareClass::Cpu).unwrap(), "\"CPU\"");
        assert_eq!(serde_json::to_string(&HardwareClass::Gpu).unwrap(), "\"GPU\"");
    }

    #[test]
    fn test_truncate_short_payload_unchanged() {
        assert_eq!(truncate_payload("hello", MAX_PAYLOAD_CHARS), "hello");
        let exact: String = "x".repeat(MAX_PAYLOAD_CHARS);
        assert_eq!(truncate_payload(&exact, MAX_PAYLOAD_CHARS), exact);
    }

    #[test]
    fn test_truncate_long_payload() {
        let long: String = "x".repeat(MAX_PAYLOAD_CHARS + 500);
        let truncated = truncate_payload(&long, MAX_PAYLOAD_CHARS);
        assert_eq!(
            truncated.chars().count(),
            MAX_PAYLOAD_CHARS + TRUNCATION_MARKER.len()
        );
        assert!(truncated.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        // 4-byte scalar values: byte-indexed slicing would panic mid-codepoint
        let long: String = "🦀".repeat(20);
        let truncated = truncate_payload(&long, 10);
        assert_eq!(truncated, format!("{}{}", "🦀".repeat(10), TRUNCATION_MARKER));
    }
}
