use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::handlers::{require_scorer, success};
use crate::models::matches::UpdateLineupRequest;
use crate::services::MatchService;

#[tracing::instrument(name = "Get lineup", skip(service))]
pub async fn get_lineup(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let lineup = service.get_lineup(path.into_inner()).await?;
    Ok(success(lineup))
}

#[tracing::instrument(name = "Update lineup", skip(req, service, body))]
pub async fn update_lineup(
    req: HttpRequest,
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateLineupRequest>,
) -> Result<HttpResponse, ApiError> {
    require_scorer(&req)?;
    let lineup = service
        .update_lineup(path.into_inner(), body.into_inner())
        .await?;
    Ok(success(lineup))
}
