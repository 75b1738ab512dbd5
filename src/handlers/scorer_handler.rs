use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::handlers::success;
use crate::models::matches::EndMatchRequest;
use crate::models::scoring::StandardScoreRequest;
use crate::services::{MatchService, ScoringService};

#[tracing::instrument(name = "Start match", skip(service))]
pub async fn start_match(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let updated = service.start_match(path.into_inner()).await?;
    Ok(success(updated))
}

#[tracing::instrument(name = "End match", skip(service, body))]
pub async fn end_match(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
    body: web::Json<EndMatchRequest>,
) -> Result<HttpResponse, ApiError> {
    let updated = service
        .end_match(path.into_inner(), body.winner_team_id)
        .await?;
    Ok(success(updated))
}

/// Merge a patch into the mirrored live document (timer ticks, innings
/// markers). Writes the mirror directly; the durable row is untouched until
/// the match completes and the state is archived.
#[tracing::instrument(name = "Update live state", skip(service, body))]
pub async fn update_live_state(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ApiError> {
    let state = service
        .update_live_match_state(path.into_inner(), body.into_inner())
        .await?;
    Ok(success(state))
}

/// Incremental score patch used by the scorer console. Standard sports only;
/// cricket goes through the ball-by-ball endpoint.
#[tracing::instrument(name = "Patch score", skip(service, body))]
pub async fn patch_score(
    service: web::Data<ScoringService>,
    path: web::Path<Uuid>,
    body: web::Json<StandardScoreRequest>,
) -> Result<HttpResponse, ApiError> {
    let (updated, event) = service
        .submit_standard_score(path.into_inner(), body.into_inner())
        .await?;
    Ok(success(serde_json::json!({
        "match": updated,
        "event": event
    })))
}
