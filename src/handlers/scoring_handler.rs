use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::handlers::{require_scorer, success};
use crate::models::scoring::{CricketBallRequest, StandardScoreRequest};
use crate::services::ScoringService;

/// Generic event submission body, tagged by event family.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmitEventRequest {
    Delivery(CricketBallRequest),
    Score(StandardScoreRequest),
}

#[tracing::instrument(name = "Submit standard score", skip(req, service, body))]
pub async fn submit_standard_score(
    req: HttpRequest,
    service: web::Data<ScoringService>,
    path: web::Path<Uuid>,
    body: web::Json<StandardScoreRequest>,
) -> Result<HttpResponse, ApiError> {
    require_scorer(&req)?;
    let (updated, event) = service
        .submit_standard_score(path.into_inner(), body.into_inner())
        .await?;
    Ok(success(serde_json::json!({
        "match": updated,
        "event": event
    })))
}

#[tracing::instrument(name = "Submit cricket ball", skip(req, service, body))]
pub async fn submit_cricket_ball(
    req: HttpRequest,
    service: web::Data<ScoringService>,
    path: web::Path<Uuid>,
    body: web::Json<CricketBallRequest>,
) -> Result<HttpResponse, ApiError> {
    require_scorer(&req)?;
    let (updated, event) = service
        .submit_cricket_ball(path.into_inner(), body.into_inner())
        .await?;
    Ok(success(serde_json::json!({
        "match": updated,
        "event": event
    })))
}

#[tracing::instrument(name = "Submit match event", skip(req, service, body))]
pub async fn submit_event(
    req: HttpRequest,
    service: web::Data<ScoringService>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitEventRequest>,
) -> Result<HttpResponse, ApiError> {
    require_scorer(&req)?;
    let match_id = path.into_inner();
    let (updated, event) = match body.into_inner() {
        SubmitEventRequest::Delivery(request) => {
            service.submit_cricket_ball(match_id, request).await?
        }
        SubmitEventRequest::Score(request) => {
            service.submit_standard_score(match_id, request).await?
        }
    };
    Ok(success(serde_json::json!({
        "match": updated,
        "event": event
    })))
}

#[tracing::instrument(name = "Undo last event", skip(req, service))]
pub async fn undo_last_event(
    req: HttpRequest,
    service: web::Data<ScoringService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_scorer(&req)?;
    let (updated, undone) = service.undo_last_event(path.into_inner()).await?;
    Ok(success(serde_json::json!({
        "match": updated,
        "undone_event": undone
    })))
}
