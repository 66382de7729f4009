use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::taxonomy::Category;

/// Candidate meeting handed in by the caller.
///
/// Records are read-only to the ranking core; only the fields below are
/// consulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Meeting {
    pub meeting_id: Option<i64>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub location_type: Option<String>,
    /// Takes precedence over `location_type` when non-blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_location_type: Option<String>,
    /// Numeric feature vector consumed by the ranker model
    #[serde(default)]
    pub features: Vec<f64>,
}

impl Meeting {
    /// Parsed category, `None` when absent or outside the taxonomy
    pub fn category(&self) -> Option<Category> {
        self.category.as_deref().and_then(Category::parse)
    }

    pub fn subcategory(&self) -> Option<&str> {
        non_blank(&self.subcategory)
    }

    /// `meeting_location_type` when set, otherwise `location_type`
    pub fn location_type(&self) -> Option<&str> {
        non_blank(&self.meeting_location_type).or_else(|| non_blank(&self.location_type))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Meeting with the scores that placed it in the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoredMeeting {
    #[serde(flatten)]
    pub meeting: Meeting,
    /// Raw ranker model output
    pub base_score: f64,
    /// Rule-based intent adjustment
    pub adjustment: f64,
    /// `base_score + adjustment`
    pub final_score: f64,
}
