//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::{error, health, rank};

#[derive(OpenApi)]
#[openapi(
    info(title = "Meeting Ranker", description = "Intent-aware re-ranking of meeting listings"),
    paths(
        rank::rank_meetings,
        rank::model_info,
        health::liveness,
        health::readiness
    ),
    components(schemas(
        rank::RankRequest,
        rank::RankResponse,
        error::ErrorResponse,
        crate::service::ranker::ModelInfo
    )),
    tags(
        (name = "ranking", description = "Meeting ranking"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json);
}
