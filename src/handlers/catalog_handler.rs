use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::handlers::success;
use crate::models::player::Player;
use crate::models::sport::Sport;
use crate::models::team::Team;

#[derive(Debug, Deserialize)]
pub struct TeamListQuery {
    pub sport_id: Option<Uuid>,
}

pub async fn list_sports(pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let sports = sqlx::query_as::<_, Sport>(
        "SELECT id, sport_name, scoring_type, created_at FROM sports ORDER BY sport_name",
    )
    .fetch_all(pool.get_ref())
    .await?;
    Ok(success(sports))
}

pub async fn list_teams(
    pool: web::Data<PgPool>,
    query: web::Query<TeamListQuery>,
) -> Result<HttpResponse, ApiError> {
    let teams = sqlx::query_as::<_, Team>(
        "SELECT id, team_name, sport_id, created_at, updated_at FROM teams
         WHERE ($1::uuid IS NULL OR sport_id = $1)
         ORDER BY team_name",
    )
    .bind(query.sport_id)
    .fetch_all(pool.get_ref())
    .await?;
    Ok(success(teams))
}

pub async fn list_team_players(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let players = sqlx::query_as::<_, Player>(
        "SELECT id, player_name, team_id, created_at, updated_at FROM players
         WHERE team_id = $1 ORDER BY player_name",
    )
    .bind(path.into_inner())
    .fetch_all(pool.get_ref())
    .await?;
    Ok(success(players))
}
