//! Action plan derivation
//!
//! Derives the prioritized remediation list from the critique sequence
//! using the severity classifier. Recomputed whenever the audit result
//! changes; never persisted independently.

use serde::Serialize;

use crate::models::audit::CritiqueItem;
use crate::models::severity::{classify, Priority};

/// One remediable issue, tagged with its urgency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlanEntry {
    pub priority: Priority,
    pub label: String,
    pub recommendation: String,
}

/// Derive the remediation list from the critique sequence
///
/// Stable filter: success items drop out, everything else keeps its
/// original relative order (no re-sort by severity, matching the metrics
/// grid order). An empty plan means "no major technical defects", not an
/// absence of data.
pub fn build_action_plan(critiques: &[CritiqueItem]) -> Vec<ActionPlanEntry> {
    critiques
        .iter()
        .filter_map(|item| {
            classify(item.status).plan_bucket.map(|priority| ActionPlanEntry {
                priority,
                label: item.label.clone(),
                recommendation: item.recommendation.clone(),
            })
        })
        .collect()
}
