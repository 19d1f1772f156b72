//! Audit result model and payload validation
//!
//! Typed shape of a completed audit as returned by the analysis engine,
//! plus the validating parse from the untyped JSON payload. Parsing is a
//! pure transformation with no I/O.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Payload validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required top-level field absent (or of the wrong JSON type)
    #[error("Audit payload missing required field `{0}`")]
    MissingField(&'static str),

    /// A critique entry lacks one of its required fields
    #[error("Critique {index} missing required field `{field}`")]
    MalformedCritique { index: usize, field: &'static str },
}

/// Severity tier of a single critique
///
/// Closed set. Anything else on the wire normalizes to `Danger` so an
/// unrecognized severity surfaces as the most urgent tier instead of being
/// dropped or shown as passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CritiqueStatus {
    Success,
    Warning,
    Danger,
}

impl CritiqueStatus {
    /// Map a raw wire value onto the closed status set
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "success" => CritiqueStatus::Success,
            "warning" => CritiqueStatus::Warning,
            _ => CritiqueStatus::Danger,
        }
    }
}

/// One scored metric within an audit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CritiqueItem {
    /// Grouping label ("SEO", "Structure", ...)
    pub category: String,
    /// Short human-readable metric name
    pub label: String,
    /// Severity tier (authoritative)
    pub status: CritiqueStatus,
    /// Displayable measured value, pre-formatted by the engine
    pub value: String,
    /// Tooltip text; may be empty
    pub explanation: String,
    /// Suggested fix; meaningful only when status != Success
    pub recommendation: String,
}

/// A completed audit: composite score, audited URL, ordered critiques,
/// optional narrative block
///
/// Constructed once per successful engine response and immutable
/// thereafter; the session replaces it wholesale on the next submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditResult {
    /// 0-100 composite score, computed upstream
    pub global_score: f64,
    /// Echo of the audited URL, for display confirmation
    pub url: String,
    /// Engine order is display order; never re-sorted or deduplicated here
    pub critiques: Vec<CritiqueItem>,
    /// Pre-rendered rich text; `None` means "analysis unavailable"
    pub narrative_analysis: Option<String>,
}

impl AuditResult {
    /// Validate an untyped engine payload into the typed model
    ///
    /// Wire fields: `score_global`, `url`, `critiques[]` (each entry with
    /// `cat`, `label`, `status`, `val` required and `expl`/`reco`
    /// optional), plus optional `ai_analysis`.
    pub fn parse(raw: &Value) -> Result<Self, ValidationError> {
        let global_score = raw
            .get("score_global")
            .and_then(Value::as_f64)
            .ok_or(ValidationError::MissingField("score_global"))?;

        let url = raw
            .get("url")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingField("url"))?
            .to_string();

        let entries = raw
            .get("critiques")
            .and_then(Value::as_array)
            .ok_or(ValidationError::MissingField("critiques"))?;

        let mut critiques = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            critiques.push(parse_critique(index, entry)?);
        }

        let narrative_analysis = raw
            .get("ai_analysis")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(AuditResult {
            global_score,
            url,
            critiques,
            narrative_analysis,
        })
    }
}

fn parse_critique(index: usize, entry: &Value) -> Result<CritiqueItem, ValidationError> {
    let required = |field: &'static str| {
        entry
            .get(field)
            .and_then(Value::as_str)
            .ok_or(ValidationError::MalformedCritique { index, field })
    };

    let category = required("cat")?.to_string();
    let label = required("label")?.to_string();
    let status = CritiqueStatus::normalize(required("status")?);
    let value = required("val")?.to_string();

    // Absent on the wire means empty, not malformed
    let optional = |field: &str| {
        entry
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(CritiqueItem {
        category,
        label,
        status,
        value,
        explanation: optional("expl"),
        recommendation: optional("reco"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_known_statuses() {
        assert_eq!(CritiqueStatus::normalize("success"), CritiqueStatus::Success);
        assert_eq!(CritiqueStatus::normalize("warning"), CritiqueStatus::Warning);
        assert_eq!(CritiqueStatus::normalize("danger"), CritiqueStatus::Danger);
    }

    #[test]
    fn test_normalize_unknown_status_is_danger() {
        assert_eq!(CritiqueStatus::normalize("severe"), CritiqueStatus::Danger);
        assert_eq!(CritiqueStatus::normalize(""), CritiqueStatus::Danger);
        assert_eq!(CritiqueStatus::normalize("SUCCESS"), CritiqueStatus::Danger);
    }

    #[test]
    fn test_parse_missing_top_level_fields() {
        let no_score = json!({ "url": "https://x.com", "critiques": [] });
        assert_eq!(
            AuditResult::parse(&no_score),
            Err(ValidationError::MissingField("score_global"))
        );

        let no_url = json!({ "score_global": 50, "critiques": [] });
        assert_eq!(
            AuditResult::parse(&no_url),
            Err(ValidationError::MissingField("url"))
        );

        let no_critiques = json!({ "score_global": 50, "url": "https://x.com" });
        assert_eq!(
            AuditResult::parse(&no_critiques),
            Err(ValidationError::MissingField("critiques"))
        );
    }

    #[test]
    fn test_parse_wrong_type_is_missing() {
        // A string score is as unusable as an absent one
        let payload = json!({ "score_global": "42", "url": "https://x.com", "critiques": [] });
        assert_eq!(
            AuditResult::parse(&payload),
            Err(ValidationError::MissingField("score_global"))
        );
    }

    #[test]
    fn test_parse_malformed_critique() {
        let payload = json!({
            "score_global": 70,
            "url": "https://x.com",
            "critiques": [
                { "cat": "SEO", "label": "Title", "status": "success", "val": "OK" },
                { "cat": "SEO", "label": "H1", "status": "danger" }
            ]
        });
        assert_eq!(
            AuditResult::parse(&payload),
            Err(ValidationError::MalformedCritique { index: 1, field: "val" })
        );
    }

    #[test]
    fn test_parse_optional_fields_default_empty() {
        let payload = json!({
            "score_global": 90,
            "url": "https://x.com",
            "critiques": [
                { "cat": "SEO", "label": "Title", "status": "success", "val": "OK" }
            ]
        });
        let result = AuditResult::parse(&payload).unwrap();
        assert_eq!(result.critiques[0].explanation, "");
        assert_eq!(result.critiques[0].recommendation, "");
        assert!(result.narrative_analysis.is_none());
    }
}
