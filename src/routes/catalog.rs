use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::handlers::catalog_handler;

#[get("/sports")]
async fn list_sports(pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    catalog_handler::list_sports(pool).await
}

#[get("/teams")]
async fn list_teams(
    pool: web::Data<PgPool>,
    query: web::Query<catalog_handler::TeamListQuery>,
) -> Result<HttpResponse, ApiError> {
    catalog_handler::list_teams(pool, query).await
}

#[get("/teams/{team_id}/players")]
async fn list_team_players(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    catalog_handler::list_team_players(pool, path).await
}
