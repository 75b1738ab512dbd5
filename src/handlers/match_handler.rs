use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::handlers::{require_scorer, success};
use crate::models::matches::{CreateMatchRequest, MatchStatus, UpdateMatchRequest};
use crate::services::MatchService;

#[derive(Debug, Deserialize)]
pub struct MatchListQuery {
    pub status: Option<MatchStatus>,
}

#[tracing::instrument(name = "Create match", skip(req, service, body))]
pub async fn create_match(
    req: HttpRequest,
    service: web::Data<MatchService>,
    body: web::Json<CreateMatchRequest>,
) -> Result<HttpResponse, ApiError> {
    require_scorer(&req)?;
    let created = service.create_match(body.into_inner()).await?;
    Ok(success(created))
}

#[tracing::instrument(name = "Get match", skip(service))]
pub async fn get_match(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let details = service.get_match(path.into_inner()).await?;
    Ok(success(details))
}

#[tracing::instrument(name = "List matches", skip(service, query))]
pub async fn list_matches(
    service: web::Data<MatchService>,
    query: web::Query<MatchListQuery>,
) -> Result<HttpResponse, ApiError> {
    let status = query.status.unwrap_or(MatchStatus::Live);
    let matches = service.list_matches(status).await?;
    Ok(success(matches))
}

#[tracing::instrument(name = "Update match details", skip(req, service, body))]
pub async fn update_match(
    req: HttpRequest,
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateMatchRequest>,
) -> Result<HttpResponse, ApiError> {
    require_scorer(&req)?;
    let updated = service
        .update_match(path.into_inner(), body.into_inner())
        .await?;
    Ok(success(updated))
}

#[tracing::instrument(name = "Delete match", skip(req, service))]
pub async fn delete_match(
    req: HttpRequest,
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_scorer(&req)?;
    service.delete_match(path.into_inner()).await?;
    Ok(success(serde_json::json!({ "deleted": true })))
}

#[tracing::instrument(name = "Get live match state", skip(service))]
pub async fn get_live_state(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let state = service.get_live_match_state(path.into_inner()).await?;
    Ok(success(state))
}
