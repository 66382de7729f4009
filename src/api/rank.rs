//! REST API endpoints for ranking meetings

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::model::intent::{EnrichedIntent, IntentClass, ParseSource, UserContext};
use crate::model::meeting::{Meeting, ScoredMeeting};
use crate::service::RankingPipeline;
use crate::service::ranker::{ModelInfo, RankerModel};

/// Ranking request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RankRequest {
    /// Free-text request, e.g. "오늘 저녁 강남에서 러닝할 사람"
    pub query: String,
    #[serde(default)]
    pub user_context: UserContext,
    pub candidates: Vec<Meeting>,
    /// Skips intent classification when set
    pub intent_class: Option<IntentClass>,
}

/// Ranked candidates, highest final score first
#[derive(Debug, Serialize, ToSchema)]
pub struct RankResponse {
    pub intent: EnrichedIntent,
    pub intent_class: IntentClass,
    pub parse_source: ParseSource,
    pub meetings: Vec<ScoredMeeting>,
    pub total_count: usize,
}

/// Rank candidate meetings against a free-text request
#[utoipa::path(
    post,
    path = "/v1/rank",
    request_body = RankRequest,
    responses(
        (status = 200, description = "Candidates ranked", body = RankResponse),
        (status = 400, description = "Invalid request or feature vectors", body = crate::api::error::ErrorResponse),
        (status = 503, description = "Model not loaded", body = crate::api::error::ErrorResponse)
    ),
    tag = "ranking"
)]
#[post("/v1/rank")]
pub async fn rank_meetings(
    pipeline: web::Data<RankingPipeline>,
    body: web::Json<RankRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    // A blank request carries no intent to act on
    let intent_class = if request.query.trim().is_empty() {
        Some(request.intent_class.unwrap_or_default())
    } else {
        request.intent_class
    };

    tracing::debug!(
        query_length = request.query.len(),
        candidates = request.candidates.len(),
        intent_class = ?intent_class,
        "Ranking request received"
    );

    let outcome = pipeline
        .rank_with_class(
            &request.query,
            &request.user_context,
            request.candidates,
            intent_class,
        )
        .await?;

    Ok(HttpResponse::Ok().json(RankResponse {
        intent: outcome.intent,
        intent_class: outcome.intent_class,
        parse_source: outcome.parse_source,
        total_count: outcome.meetings.len(),
        meetings: outcome.meetings,
    }))
}

/// Ranker model diagnostics
#[utoipa::path(
    get,
    path = "/v1/model/info",
    responses(
        (status = 200, description = "Model state snapshot", body = ModelInfo)
    ),
    tag = "ranking"
)]
#[get("/v1/model/info")]
pub async fn model_info(model: web::Data<RankerModel>) -> HttpResponse {
    HttpResponse::Ok().json(model.info())
}

/// Configure ranking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(rank_meetings).service(model_info);
}
