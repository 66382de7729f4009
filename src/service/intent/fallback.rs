//! Deterministic local intent extractor
//!
//! Used whenever the completion-based parse fails. It makes no external call
//! and never fails, so the pipeline always has a well-formed intent.

use crate::model::intent::{Intent, MAX_KEYWORDS};
use crate::model::taxonomy::LocationType;

/// Confidence assigned to every fallback parse
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Lexical cues for indoor venues (checked first)
const INDOOR_KEYWORDS: &[&str] = &[
    "실내",
    "카페",
    "방탈출",
    "보드게임",
    "전시",
    "공방",
    "스터디",
    "노래방",
    "볼링",
    "indoor",
];

/// Lexical cues for outdoor venues
const OUTDOOR_KEYWORDS: &[&str] = &[
    "야외",
    "실외",
    "공원",
    "등산",
    "한강",
    "캠핑",
    "산책",
    "피크닉",
    "outdoor",
];

/// Build an intent from the raw text alone
pub fn fallback_parse(text: &str) -> Intent {
    Intent {
        location_type: detect_location_type(text),
        keywords: extract_keywords(text),
        confidence: FALLBACK_CONFIDENCE,
        ..Default::default()
    }
}

fn detect_location_type(text: &str) -> Option<LocationType> {
    let lowered = text.to_lowercase();
    if INDOOR_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Some(LocationType::Indoor)
    } else if OUTDOOR_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Some(LocationType::Outdoor)
    } else {
        None
    }
}

/// First whitespace-delimited tokens longer than one character, in order
fn extract_keywords(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|word| word.chars().count() > 1)
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}
