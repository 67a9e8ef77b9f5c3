//! Generation policy and plan tiers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

/// Plan tier enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Studio,
}

impl PlanTier {
    /// Parse from string (case-insensitive). Unknown values map to `Free`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pro" => PlanTier::Pro,
            "studio" => PlanTier::Studio,
            _ => PlanTier::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::Studio => "studio",
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller-supplied limits for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_duration_bounds"))]
pub struct GenerationPolicy {
    /// Maximum clips returned
    #[validate(range(min = 1))]
    pub max_clip_count: u32,

    /// Shortest accepted clip (inclusive)
    #[validate(range(min = 1))]
    pub min_duration_seconds: u32,

    /// Longest accepted clip (inclusive)
    pub max_duration_seconds: u32,
}

fn validate_duration_bounds(policy: &GenerationPolicy) -> Result<(), ValidationError> {
    if policy.min_duration_seconds > policy.max_duration_seconds {
        return Err(ValidationError::new("min_duration_exceeds_max"));
    }
    Ok(())
}

impl GenerationPolicy {
    pub fn new(max_clip_count: u32, min_duration_seconds: u32, max_duration_seconds: u32) -> Self {
        Self {
            max_clip_count,
            min_duration_seconds,
            max_duration_seconds,
        }
    }

    /// Default limits for a plan tier.
    pub fn for_tier(tier: PlanTier) -> Self {
        match tier {
            PlanTier::Free => Self::new(3, 15, 60),
            PlanTier::Pro => Self::new(10, 15, 90),
            PlanTier::Studio => Self::new(20, 10, 180),
        }
    }

    /// Validate the policy, returning it unchanged when consistent.
    pub fn checked(self) -> Result<Self, PolicyError> {
        self.validate()?;
        Ok(self)
    }

    /// Whether a duration lies within the inclusive bounds.
    pub fn accepts_duration(&self, duration_secs: u32) -> bool {
        duration_secs >= self.min_duration_seconds && duration_secs <= self.max_duration_seconds
    }
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self::for_tier(PlanTier::default())
    }
}

/// Policy validation error.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Invalid generation policy: {0}")]
    Invalid(#[from] ValidationErrors),
}
