//! Intent-aware re-ranking
//!
//! Parses the request, enriches it with profile defaults, classifies it,
//! scores every candidate with the ranker model in one batch, adds the rule
//! based delta and sorts by the final score.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::model::intent::{EnrichedIntent, IntentClass, ParseSource, UserContext};
use crate::model::meeting::{Meeting, ScoredMeeting};
use crate::service::adjuster::IntentAdjuster;
use crate::service::classifier::IntentClassifier;
use crate::service::enricher::enrich;
use crate::service::intent::IntentParser;
use crate::service::ranker::{ModelError, RankerModel};

/// Error type for ranking requests
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RankingError {
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Ranked candidates plus the interpretation that produced the ranking
#[derive(Debug, Clone)]
pub struct RankingOutcome {
    pub intent: EnrichedIntent,
    pub intent_class: IntentClass,
    pub parse_source: ParseSource,
    /// Sorted by `final_score`, highest first
    pub meetings: Vec<ScoredMeeting>,
}

/// Service combining model scores with intent adjustments
pub struct RankingPipeline {
    model: Arc<RankerModel>,
    parser: IntentParser,
    classifier: Arc<dyn IntentClassifier>,
    adjuster: IntentAdjuster,
}

impl RankingPipeline {
    pub fn new(
        model: Arc<RankerModel>,
        parser: IntentParser,
        classifier: Arc<dyn IntentClassifier>,
        adjuster: IntentAdjuster,
    ) -> Self {
        Self {
            model,
            parser,
            classifier,
            adjuster,
        }
    }

    /// Rank candidates for a free-text request
    pub async fn rank(
        &self,
        user_text: &str,
        context: &UserContext,
        candidates: Vec<Meeting>,
    ) -> Result<RankingOutcome, RankingError> {
        self.rank_with_class(user_text, context, candidates, None)
            .await
    }

    /// Rank candidates, optionally with a caller-supplied intent class
    pub async fn rank_with_class(
        &self,
        user_text: &str,
        context: &UserContext,
        candidates: Vec<Meeting>,
        intent_class: Option<IntentClass>,
    ) -> Result<RankingOutcome, RankingError> {
        if !self.model.is_loaded() {
            return Err(ModelError::ModelNotLoaded.into());
        }

        let start_time = Instant::now();

        let parsed = self.parser.parse_search_query(user_text).await;
        let intent = enrich(parsed.intent, context);
        let intent_class =
            intent_class.unwrap_or_else(|| self.classifier.classify(user_text, &intent));

        let meetings = self.score(intent_class, &intent, candidates)?;

        tracing::info!(
            intent_class = %intent_class,
            parse_source = ?parsed.source,
            confidence = intent.intent.confidence,
            candidates = meetings.len(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "Ranking complete"
        );

        Ok(RankingOutcome {
            intent,
            intent_class,
            parse_source: parsed.source,
            meetings,
        })
    }

    /// Score and sort candidates for an already interpreted request
    pub fn score(
        &self,
        intent_class: IntentClass,
        intent: &EnrichedIntent,
        candidates: Vec<Meeting>,
    ) -> Result<Vec<ScoredMeeting>, RankingError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let features: Vec<Vec<f64>> = candidates.iter().map(|m| m.features.clone()).collect();
        let base_scores = self.model.predict(&features)?;

        let mut scored: Vec<ScoredMeeting> = candidates
            .into_iter()
            .zip(base_scores)
            .map(|(meeting, base_score)| {
                let adjustment = self.adjuster.adjust(intent_class, &meeting, Some(intent));
                tracing::debug!(
                    meeting_id = ?meeting.meeting_id,
                    category = ?meeting.category,
                    subcategory = ?meeting.subcategory,
                    base_score = base_score,
                    adjustment = adjustment,
                    "Scored candidate"
                );
                ScoredMeeting {
                    meeting,
                    base_score,
                    adjustment,
                    final_score: base_score + adjustment,
                }
            })
            .collect();

        // Stable: equal scores keep their input order.
        scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::model::config::IntentParserConfig;
    use crate::service::classifier::KeywordIntentClassifier;
    use crate::service::intent::test_support::ScriptedBackend;

    /// Linear model scoring `features[0]`
    fn first_feature_model() -> Arc<RankerModel> {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!({"model": {"type": "linear", "weights": [1.0, 0.0]}, "feature_names": ["a", "b"]})
        )
        .unwrap();
        let mut model = RankerModel::new(file.path(), None);
        model.load().unwrap();
        Arc::new(model)
    }

    fn pipeline(parser: IntentParser) -> RankingPipeline {
        RankingPipeline::new(
            first_feature_model(),
            parser,
            Arc::new(KeywordIntentClassifier),
            IntentAdjuster::new().unwrap(),
        )
    }

    fn candidate(id: i64, category: &str, subcategory: &str, base: f64) -> Meeting {
        Meeting {
            meeting_id: Some(id),
            category: Some(category.to_string()),
            subcategory: Some(subcategory.to_string()),
            features: vec![base, 0.0],
            ..Default::default()
        }
    }

    fn ids(meetings: &[ScoredMeeting]) -> Vec<i64> {
        meetings.iter().filter_map(|m| m.meeting.meeting_id).collect()
    }

    #[tokio::test]
    async fn test_final_score_is_base_plus_adjustment() {
        let pipeline = pipeline(IntentParser::fallback_only());
        let candidates = vec![
            candidate(1, "카페", "브런치", 5.0),
            candidate(2, "스포츠", "축구", 1.0),
            candidate(3, "소셜", "보드게임", 3.0),
        ];
        let outcome = pipeline
            .rank_with_class("아무거나", &UserContext::default(), candidates, Some(IntentClass::Active))
            .await
            .unwrap();

        for m in &outcome.meetings {
            assert_eq!(m.final_score, m.base_score + m.adjustment);
        }
        assert_eq!(ids(&outcome.meetings), vec![2, 1, 3]);
        assert_eq!(outcome.meetings[0].adjustment, 18.0);
        assert_eq!(outcome.intent_class, IntentClass::Active);
    }

    #[tokio::test]
    async fn test_ties_keep_input_order() {
        let pipeline = pipeline(IntentParser::fallback_only());
        let candidates = vec![
            candidate(10, "맛집", "한식", 1.0),
            candidate(11, "맛집", "중식", 1.0),
            candidate(12, "맛집", "일식", 2.0),
            candidate(13, "맛집", "양식", 1.0),
        ];
        let outcome = pipeline
            .rank_with_class("강남", &UserContext::default(), candidates, Some(IntentClass::Neutral))
            .await
            .unwrap();
        assert_eq!(ids(&outcome.meetings), vec![12, 10, 11, 13]);
        assert!(outcome.meetings.iter().all(|m| m.adjustment == 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_parser_still_ranks() {
        let config = IntentParserConfig {
            timeout_secs: 1,
            ..Default::default()
        };
        let parser = IntentParser::new(
            Arc::new(ScriptedBackend::Hang(Duration::from_secs(30))),
            &config,
        );
        let pipeline = pipeline(parser);
        let outcome = pipeline
            .rank(
                "가볍게 달리고 싶어",
                &UserContext::default(),
                vec![candidate(1, "카페", "브런치", 2.0), candidate(2, "스포츠", "러닝", 0.0)],
            )
            .await
            .unwrap();

        assert_eq!(outcome.parse_source, ParseSource::Fallback);
        assert_eq!(outcome.intent.intent.confidence, 0.3);
        assert_eq!(outcome.intent_class, IntentClass::Active);
        assert_eq!(ids(&outcome.meetings), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_llm_intent_drives_location_correction() {
        let parser = IntentParser::new(
            Arc::new(ScriptedBackend::Reply(
                r#"{"category": "카페", "location_type": "INDOOR", "keywords": ["조용히"], "confidence": 0.9}"#
                    .to_string(),
            )),
            &IntentParserConfig::default(),
        );
        let pipeline = pipeline(parser);
        let mut indoor = candidate(1, "카페", "브런치", 0.0);
        indoor.location_type = Some("INDOOR".to_string());
        let mut outdoor = candidate(2, "카페", "카페투어", 0.0);
        outdoor.location_type = Some("OUTDOOR".to_string());

        let context = UserContext {
            latitude: Some(37.5),
            longitude: Some(127.0),
            ..Default::default()
        };
        let outcome = pipeline
            .rank("조용히 쉬고 싶어", &context, vec![outdoor, indoor])
            .await
            .unwrap();

        assert_eq!(outcome.parse_source, ParseSource::Llm);
        assert_eq!(outcome.intent_class, IntentClass::Quiet);
        assert!(outcome.intent.user_location.is_some());
        assert_eq!(ids(&outcome.meetings), vec![1, 2]);
        assert_eq!(outcome.meetings[0].adjustment, 21.0);
        assert_eq!(outcome.meetings[1].adjustment, 5.0);
    }

    #[tokio::test]
    async fn test_wrong_feature_width_is_caller_error() {
        let pipeline = pipeline(IntentParser::fallback_only());
        let mut bad = candidate(1, "카페", "브런치", 1.0);
        bad.features = vec![1.0];
        let err = pipeline
            .rank("카페", &UserContext::default(), vec![bad])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RankingError::Model(ModelError::FeatureShapeMismatch { expected: 2, actual: 1 })
        ));
    }

    #[tokio::test]
    async fn test_unloaded_model_is_rejected() {
        let pipeline = RankingPipeline::new(
            Arc::new(RankerModel::new("ranker.json", None)),
            IntentParser::fallback_only(),
            Arc::new(KeywordIntentClassifier),
            IntentAdjuster::new().unwrap(),
        );
        let err = pipeline
            .rank("카페", &UserContext::default(), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, RankingError::Model(ModelError::ModelNotLoaded)));
    }

    #[tokio::test]
    async fn test_empty_candidate_list() {
        let pipeline = pipeline(IntentParser::fallback_only());
        let outcome = pipeline
            .rank("카페", &UserContext::default(), vec![])
            .await
            .unwrap();
        assert!(outcome.meetings.is_empty());
    }
}
