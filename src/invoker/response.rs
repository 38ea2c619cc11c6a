//! Normalize and parse model output into an assessment
//!
//! Models are told to answer with a bare JSON object but frequently wrap it
//! in a markdown code fence anyway. The fence stripping here is deliberately
//! a single isolated normalization step, not a general-purpose extractor.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Severity of the change a library upgrade requires at a flagged reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChangeType {
    /// No change is required
    #[default]
    None,
    /// Local text-level fix
    Simple,
    /// Method-level refactor or new functionality
    Moderate,
    /// Multi-file or multi-class change
    Complex,
    /// Architecture-level change
    #[serde(rename = "System-wide")]
    SystemWide,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::None => "None",
            ChangeType::Simple => "Simple",
            ChangeType::Moderate => "Moderate",
            ChangeType::Complex => "Complex",
            ChangeType::SystemWide => "System-wide",
        }
    }

    /// Parse a label as produced by a model, case-insensitively
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "none" => Some(ChangeType::None),
            "simple" => Some(ChangeType::Simple),
            "moderate" => Some(ChangeType::Moderate),
            "complex" => Some(ChangeType::Complex),
            "system-wide" | "system wide" => Some(ChangeType::SystemWide),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured result for one flagged code reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeAssessment {
    pub change_type: ChangeType,
    pub change_description: String,
    pub explanation: String,
}

/// Strip a leading/trailing markdown code fence, language-tagged or plain
///
/// Handles "json"- and "java"-tagged fences as well as bare ones. Text
/// without fences passes through untouched.
pub fn strip_fences(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix("```") {
        // Drop the language tag (or nothing) up to the end of the fence line
        s = match rest.find('\n') {
            Some(i) => &rest[i + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }

    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }

    s.trim()
}

/// Parse a raw model response into an assessment
///
/// The response must be a single JSON object once fences are stripped.
/// Missing keys are tolerated: change_type defaults to None, the text
/// fields to empty. Only key presence is checked, not a full schema.
pub fn parse_assessment(raw: &str) -> Result<ChangeAssessment, String> {
    let cleaned = strip_fences(raw);

    let value: Value =
        serde_json::from_str(cleaned).map_err(|e| format!("invalid JSON: {}", e))?;

    let object = value
        .as_object()
        .ok_or_else(|| format!("expected a JSON object, got: {}", cleaned))?;

    let change_type = match object.get("change_type").and_then(Value::as_str) {
        Some(label) => ChangeType::from_label(label).unwrap_or_else(|| {
            warn!("unrecognized change_type {:?}, treating as None", label);
            ChangeType::None
        }),
        None => ChangeType::None,
    };

    let text_field = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(ChangeAssessment {
        change_type,
        change_description: text_field("change_description"),
        explanation: text_field("explanation"),
    })
}
