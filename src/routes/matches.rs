use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::handlers::{lineup_handler, match_handler, scoring_handler};
use crate::models::matches::{CreateMatchRequest, UpdateLineupRequest, UpdateMatchRequest};
use crate::models::scoring::{CricketBallRequest, StandardScoreRequest};
use crate::services::{MatchService, ScoringService};

#[get("")]
async fn list_matches(
    service: web::Data<MatchService>,
    query: web::Query<match_handler::MatchListQuery>,
) -> Result<HttpResponse, ApiError> {
    match_handler::list_matches(service, query).await
}

#[post("")]
async fn create_match(
    req: HttpRequest,
    service: web::Data<MatchService>,
    body: web::Json<CreateMatchRequest>,
) -> Result<HttpResponse, ApiError> {
    match_handler::create_match(req, service, body).await
}

#[get("/{match_id}")]
async fn get_match(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    match_handler::get_match(service, path).await
}

#[put("/{match_id}")]
async fn update_match(
    req: HttpRequest,
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateMatchRequest>,
) -> Result<HttpResponse, ApiError> {
    match_handler::update_match(req, service, path, body).await
}

#[delete("/{match_id}")]
async fn delete_match(
    req: HttpRequest,
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    match_handler::delete_match(req, service, path).await
}

#[get("/{match_id}/live")]
async fn get_live_state(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    match_handler::get_live_state(service, path).await
}

#[put("/{match_id}/score")]
async fn submit_standard_score(
    req: HttpRequest,
    service: web::Data<ScoringService>,
    path: web::Path<Uuid>,
    body: web::Json<StandardScoreRequest>,
) -> Result<HttpResponse, ApiError> {
    scoring_handler::submit_standard_score(req, service, path, body).await
}

#[put("/{match_id}/score/cricket")]
async fn submit_cricket_ball(
    req: HttpRequest,
    service: web::Data<ScoringService>,
    path: web::Path<Uuid>,
    body: web::Json<CricketBallRequest>,
) -> Result<HttpResponse, ApiError> {
    scoring_handler::submit_cricket_ball(req, service, path, body).await
}

#[post("/{match_id}/event")]
async fn submit_event(
    req: HttpRequest,
    service: web::Data<ScoringService>,
    path: web::Path<Uuid>,
    body: web::Json<scoring_handler::SubmitEventRequest>,
) -> Result<HttpResponse, ApiError> {
    scoring_handler::submit_event(req, service, path, body).await
}

#[post("/{match_id}/undo")]
async fn undo_last_event(
    req: HttpRequest,
    service: web::Data<ScoringService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    scoring_handler::undo_last_event(req, service, path).await
}

#[get("/{match_id}/lineup")]
async fn get_lineup(
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    lineup_handler::get_lineup(service, path).await
}

#[post("/{match_id}/lineup")]
async fn update_lineup(
    req: HttpRequest,
    service: web::Data<MatchService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateLineupRequest>,
) -> Result<HttpResponse, ApiError> {
    lineup_handler::update_lineup(req, service, path, body).await
}
