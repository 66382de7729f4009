use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::taxonomy::{Category, LocationType, TimeSlot, Vibe};

/// Maximum number of keywords carried by an intent
pub const MAX_KEYWORDS: usize = 5;

/// Structured interpretation of a free-text meeting request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Intent {
    pub category: Option<Category>,
    /// Only set when it belongs to `category`'s known subset
    pub subcategory: Option<String>,
    pub time_slot: Option<TimeSlot>,
    pub location_query: Option<String>,
    pub location_type: Option<LocationType>,
    pub vibe: Option<Vibe>,
    pub max_cost: Option<f64>,
    /// Up to five keywords, in the order they were produced
    pub keywords: Vec<String>,
    /// In [0, 1]
    pub confidence: f64,
}

impl Intent {
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}

/// Where an intent came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParseSource {
    /// Parsed from the completion service response
    Llm,
    /// Produced by the local keyword extractor
    Fallback,
}

/// User coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Known profile defaults of the requesting user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserContext {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Comma separated interest labels, e.g. "스포츠,카페"
    pub interests: Option<String>,
    pub time_preference: Option<String>,
    pub budget_type: Option<String>,
}

/// Intent merged with the user's profile defaults.
///
/// Profile values live in their own fields so an explicit request (for example
/// `time_slot`) is never overwritten by a default (`user_time_preference`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EnrichedIntent {
    #[serde(flatten)]
    pub intent: Intent,
    pub user_location: Option<UserLocation>,
    pub user_time_preference: Option<String>,
    pub user_budget_type: Option<String>,
    pub user_interests: Option<String>,
}

impl From<Intent> for EnrichedIntent {
    fn from(intent: Intent) -> Self {
        Self {
            intent,
            ..Default::default()
        }
    }
}

/// Coarse bucket of what the user wants to do, driving rule-based adjustments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentClass {
    #[default]
    Neutral,
    Active,
    HandsOn,
    Brain,
    Quiet,
}

impl IntentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentClass::Neutral => "NEUTRAL",
            IntentClass::Active => "ACTIVE",
            IntentClass::HandsOn => "HANDS_ON",
            IntentClass::Brain => "BRAIN",
            IntentClass::Quiet => "QUIET",
        }
    }
}

impl fmt::Display for IntentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
