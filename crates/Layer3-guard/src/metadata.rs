//! Per-call metadata
//!
//! What the caller declares about one invocation: the qualified action name,
//! the region the call targets, and the optional accountability fields.

/// Caller-declared metadata for one backend invocation
#[derive(Debug, Clone)]
pub struct CallMetadata {
    /// Vendor+operation qualified action (e.g. "openai_chat_completion")
    pub action: String,

    /// Region the call targets; checked by the policy gate before the call
    pub target_region: String,

    /// End-user identifier, when known
    pub user_id: Option<String>,

    /// Whether the action requires human oversight
    pub requires_human_oversight: bool,
}

impl CallMetadata {
    /// Create metadata for an action targeting a region
    pub fn new(action: impl Into<String>, target_region: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            target_region: target_region.into(),
            user_id: None,
            requires_human_oversight: false,
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
}
