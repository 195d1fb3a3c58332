//! Sovereignty Policy Gate
//!
//! Local pre-check restricting which geographic regions a call is permitted
//! to target. Pure string matching - no I/O, no geocoding, no normalization -
//! so it is safe to call from any task without synchronization.

/// Region prefixes accepted by the major EU deployments
/// (`eu-` for AWS-style codes, `europe-` for GCP-style codes).
pub const EU_REGION_PREFIXES: &[&str] = &["eu-", "europe-"];

/// Marker carried by every deny reason
pub const SOVEREIGN_LOCK_MARKER: &str = "SOVEREIGN_LOCK_VIOLATION";

// ============================================================================
// PolicyDecision
// ============================================================================

/// Outcome of a policy gate check. Derived per call, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// The target region is covered by the allow-list
    Allow,

    /// The target region is outside the allow-list; the reason is a
    /// human-readable constraint prefixed with [`SOVEREIGN_LOCK_MARKER`]
    Deny(String),
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyDecision::Allow)
    }

    /// Deny reason, if denied
    pub fn reason(&self) -> Option<&str> {
        match self {
            PolicyDecision::Allow => None,
            PolicyDecision::Deny(reason) => Some(reason),
        }
    }
}

// ============================================================================
// RegionPolicy
// ============================================================================

/// Allow-list of region prefixes for one backend family.
///
/// The gate is conceptually invoked twice: once when a client is constructed
/// with a bound region, and again on every call. Both checks use the same
/// rule; callers must re-validate per call because a bound region can change
/// over the life of a long-lived client.
///
/// Matching is a case-sensitive exact-prefix comparison. `"eu-west-1"`
/// matches the prefix `"eu-"`; `"EU-WEST-1"` does not.
#[derive(Debug, Clone)]
pub struct RegionPolicy {
    /// Accepted region prefixes (e.g. `["eu-"]` or `["europe-"]`)
    allowed_prefixes: Vec<String>,

    /// Human-readable constraint used in deny reasons
    constraint: String,
}

impl RegionPolicy {
    /// Create a policy from an allow-list of region prefixes
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed_prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        let constraint = format!(
            "target region must start with one of [{}]",
            allowed_prefixes.join(", ")
        );
        Self {
            allowed_prefixes,
            constraint,
        }
    }

    /// Policy accepting the standard EU region prefixes
    pub fn eu() -> Self {
        Self::new(EU_REGION_PREFIXES.iter().copied())
    }

    /// Override the human-readable constraint used in deny reasons
    /// (e.g. "AWS Bedrock must use EU regions (eu-west-1, eu-central-1, etc.)")
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = constraint.into();
        self
    }

    /// Accepted region prefixes
    pub fn allowed_prefixes(&self) -> &[String] {
        &self.allowed_prefixes
    }

    /// Check a target region against the allow-list.
    ///
    /// The input is the region the call is about to target, not the ledger's
    /// own region.
    pub fn check(&self, target_region: &str) -> PolicyDecision {
        if self
            .allowed_prefixes
            .iter()
            .any(|prefix| target_region.starts_with(prefix.as_str()))
        {
            PolicyDecision::Allow
        } else {
            PolicyDecision::Deny(format!(
                "{}: {} [requested: {}]",
                SOVEREIGN_LOCK_MARKER, self.constraint, target_region
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_region() {
        let policy = RegionPolicy::new(["eu-"]);
        assert!(policy.check("eu-west-1").is_allowed());
        assert!(policy.check("eu-central-1").is_allowed());
    }

    #[test]
    fn test_blocked_region() {
        let policy = RegionPolicy::new(["eu-"]);
        let decision = policy.check("us-east-1");
        assert!(!decision.is_allowed());

        let reason = decision.reason().unwrap();
        assert!(reason.starts_with(SOVEREIGN_LOCK_MARKER));
        assert!(reason.contains("us-east-1"));
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        let policy = RegionPolicy::new(["eu-"]);
        assert!(!policy.check("EU-WEST-1").is_allowed());
        assert!(!policy.check("Eu-west-1").is_allowed());
    }

    #[test]
    fn test_exact_prefix_no_normalization() {
        let policy = RegionPolicy::new(["europe-"]);
        assert!(policy.check("europe-west1").is_allowed());
        // No substring matching: the prefix must anchor at the start
        assert!(!policy.check("us-europe-1").is_allowed());
        assert!(!policy.check("").is_allowed());
    }

    #[test]
    fn test_multiple_prefixes() {
        let policy = RegionPolicy::eu();
        assert!(policy.check("eu-west-1").is_allowed());
        assert!(policy.check("europe-west4").is_allowed());
        assert!(!policy.check("asia-east1").is_allowed());
    }

    #[test]
    fn test_custom_constraint_in_reason() {
        let policy = RegionPolicy::new(["eu-"])
            .with_constraint("Bedrock must use EU regions (eu-west-1, eu-central-1, etc.)");
        let decision = policy.check("ap-south-1");
        let reason = decision.reason().unwrap();
        assert!(reason.contains("Bedrock must use EU regions"));
    }
}
