//! Validation of completion responses
//!
//! Turns the raw reply text into an [`Intent`], dropping every field that
//! falls outside the taxonomy instead of passing it on to the rule engine.

use serde::Deserialize;
use serde_json::Value;

use super::error::IntentParseError;
use crate::model::intent::{Intent, MAX_KEYWORDS};
use crate::model::taxonomy::{Category, LocationType, TimeSlot, Vibe};

/// Confidence used when the response omits it
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Intent parsed from a response plus the fields that were discarded
#[derive(Debug)]
pub struct ValidatedIntent {
    pub intent: Intent,
    /// Human-readable notes about dropped or corrected fields
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    category: Option<String>,
    subcategory: Option<String>,
    time_slot: Option<String>,
    location_query: Option<String>,
    location_type: Option<String>,
    vibe: Option<String>,
    max_cost: Option<Value>,
    keywords: Option<Vec<String>>,
    confidence: Option<f64>,
}

/// Remove a surrounding ``` / ```json fence, if any
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Parse and validate a completion response
pub fn parse_intent_response(text: &str) -> Result<ValidatedIntent, IntentParseError> {
    let body = strip_code_fence(text);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| IntentParseError::MalformedResponse(e.to_string()))?;

    if !value.is_object() {
        return Err(IntentParseError::MalformedResponse(
            "response is not a JSON object".to_string(),
        ));
    }

    let raw: RawIntent = serde_json::from_value(value)
        .map_err(|e| IntentParseError::MalformedResponse(e.to_string()))?;

    Ok(normalize(raw))
}

fn normalize(raw: RawIntent) -> ValidatedIntent {
    let mut warnings = Vec::new();

    let category = non_empty(raw.category).and_then(|label| {
        let parsed = Category::parse(&label);
        if parsed.is_none() {
            warnings.push(format!("unknown category '{label}'"));
        }
        parsed
    });

    let subcategory = non_empty(raw.subcategory).and_then(|sub| match category {
        Some(c) if c.has_subcategory(&sub) => Some(sub),
        Some(c) => {
            warnings.push(format!("subcategory '{sub}' is not part of {c}"));
            None
        }
        None => {
            warnings.push(format!("subcategory '{sub}' without a category"));
            None
        }
    });

    let time_slot = non_empty(raw.time_slot).and_then(|label| {
        let parsed = TimeSlot::parse(&label);
        if parsed.is_none() {
            warnings.push(format!("unknown time_slot '{label}'"));
        }
        parsed
    });

    let location_type = non_empty(raw.location_type).and_then(|label| {
        let parsed = LocationType::parse(&label);
        if parsed.is_none() {
            warnings.push(format!("unknown location_type '{label}'"));
        }
        parsed
    });

    let vibe = non_empty(raw.vibe).and_then(|label| {
        let parsed = Vibe::parse(&label);
        if parsed.is_none() {
            warnings.push(format!("unknown vibe '{label}'"));
        }
        parsed
    });

    let max_cost = raw.max_cost.and_then(|value| {
        let cost = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Null => return None,
            _ => None,
        };
        match cost {
            Some(c) if c.is_finite() && c >= 0.0 => Some(c),
            _ => {
                warnings.push(format!("invalid max_cost {value}"));
                None
            }
        }
    });

    let mut keywords: Vec<String> = raw
        .keywords
        .unwrap_or_default()
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.len() > MAX_KEYWORDS {
        warnings.push(format!("{} keywords truncated to {MAX_KEYWORDS}", keywords.len()));
        keywords.truncate(MAX_KEYWORDS);
    }

    let confidence = match raw.confidence {
        Some(c) if c.is_nan() => DEFAULT_CONFIDENCE,
        Some(c) => c.clamp(0.0, 1.0),
        None => DEFAULT_CONFIDENCE,
    };

    ValidatedIntent {
        intent: Intent {
            category,
            subcategory,
            time_slot,
            location_query: non_empty(raw.location_query),
            location_type,
            vibe,
            max_cost,
            keywords,
            confidence,
        },
        warnings,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
