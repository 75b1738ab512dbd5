use actix_web::{patch, post, web, HttpResponse};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::handlers::scorer_handler;
use crate::models::matches::EndMatchRequest;
use crate::models::scoring::StandardScoreRequest;
use crate::services::{MatchService, ScoringService};

#[post("/matches/{match_id}/start")]
async fn start_match(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    scorer_handler::start_match(service, path).await
}

#[post("/matches/{match_id}/end")]
async fn end_match(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
    body: web::Json<EndMatchRequest>,
) -> Result<HttpResponse, ApiError> {
    scorer_handler::end_match(service, path, body).await
}

#[patch("/matches/{match_id}/score")]
async fn patch_score(
    service: web::Data<ScoringService>,
    path: web::Path<Uuid>,
    body: web::Json<StandardScoreRequest>,
) -> Result<HttpResponse, ApiError> {
    scorer_handler::patch_score(service, path, body).await
}

#[patch("/matches/{match_id}/state")]
async fn update_live_state(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ApiError> {
    scorer_handler::update_live_state(service, path, body).await
}
