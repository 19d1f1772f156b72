//! Severity classification
//!
//! Pure mapping from a critique's status to its display tiers and its
//! action-plan bucket. Centralized here so no rendering code branches on
//! raw status values.

use serde::Serialize;

use crate::models::audit::CritiqueStatus;

/// Display-neutral severity tier
///
/// The rendering surface decides color and iconography per tier; this core
/// only names the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Positive,
    Caution,
    Critical,
}

/// Action-plan urgency bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    Urgent,
    Recommended,
}

/// Result of classifying one status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Tier driving the value badge treatment
    pub color_tier: SeverityTier,
    /// Tier driving the status dot treatment
    pub dot_tier: SeverityTier,
    /// `None` excludes the item from the action plan
    pub plan_bucket: Option<Priority>,
}

/// Classify a status
///
/// Total over the closed status set (input is post-normalization), no
/// hidden state, idempotent.
pub fn classify(status: CritiqueStatus) -> Classification {
    match status {
        CritiqueStatus::Success => Classification {
            color_tier: SeverityTier::Positive,
            dot_tier: SeverityTier::Positive,
            plan_bucket: None,
        },
        CritiqueStatus::Warning => Classification {
            color_tier: SeverityTier::Caution,
            dot_tier: SeverityTier::Caution,
            plan_bucket: Some(Priority::Recommended),
        },
        CritiqueStatus::Danger => Classification {
            color_tier: SeverityTier::Critical,
            dot_tier: SeverityTier::Critical,
            plan_bucket: Some(Priority::Urgent),
        },
    }
}
