use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::match_events::MatchEvent;
use crate::models::matches::{CreateMatchRequest, Match, MatchStatus, MatchWithNames};
use crate::models::scoring::{MatchState, ScoreDetails};

const MATCH_COLUMNS: &str = "
    id, sport_id, team_a_id, team_b_id, status, start_time, end_time,
    winner_team_id, referee, venue, score_details, match_events, match_state,
    created_at, updated_at";

/// Match persistence. Every mutating query takes the caller's transaction
/// handle; nothing here opens its own.
#[derive(Debug, Clone)]
pub struct MatchQueries {
    pool: PgPool,
}

impl MatchQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_match(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &CreateMatchRequest,
    ) -> Result<Match, sqlx::Error> {
        let query = format!(
            "INSERT INTO matches (
                id, sport_id, team_a_id, team_b_id, status, start_time,
                referee, venue, score_details, match_events, match_state,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, 'scheduled', $5, $6, $7, '{{}}', '[]', '{{}}', NOW(), NOW())
            RETURNING {}",
            MATCH_COLUMNS
        );

        sqlx::query_as::<_, Match>(&query)
            .bind(Uuid::new_v4())
            .bind(request.sport_id)
            .bind(request.team_a_id)
            .bind(request.team_b_id)
            .bind(request.start_time)
            .bind(request.referee.as_deref())
            .bind(request.venue.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, sqlx::Error> {
        let query = format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS);
        sqlx::query_as::<_, Match>(&query)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Lock the match row for the duration of the transaction. Concurrent
    /// scoring calls on the same match serialize here.
    pub async fn get_match_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
    ) -> Result<Option<Match>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM matches WHERE id = $1 FOR UPDATE",
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(match_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Persist the three scoring documents together. The ledger append and
    /// its folded effect are never visible separately.
    pub async fn update_scoring_fields(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
        score_details: &ScoreDetails,
        match_events: &[MatchEvent],
        match_state: &MatchState,
    ) -> Result<Match, sqlx::Error> {
        let query = format!(
            "UPDATE matches
             SET score_details = $2, match_events = $3, match_state = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(match_id)
            .bind(Json(score_details))
            .bind(Json(match_events))
            .bind(Json(match_state))
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
        status: MatchStatus,
        end_time: Option<DateTime<Utc>>,
        winner_team_id: Option<Uuid>,
    ) -> Result<Match, sqlx::Error> {
        let query = format!(
            "UPDATE matches
             SET status = $2,
                 end_time = COALESCE($3, end_time),
                 winner_team_id = COALESCE($4, winner_team_id),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(match_id)
            .bind(status)
            .bind(end_time)
            .bind(winner_team_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn update_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
        start_time: Option<DateTime<Utc>>,
        referee: Option<&str>,
        venue: Option<&str>,
    ) -> Result<Match, sqlx::Error> {
        let query = format!(
            "UPDATE matches
             SET start_time = COALESCE($2, start_time),
                 referee = COALESCE($3, referee),
                 venue = COALESCE($4, venue),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(match_id)
            .bind(start_time)
            .bind(referee)
            .bind(venue)
            .fetch_one(&mut **tx)
            .await
    }

    /// Write back transient state reconciled from the live mirror during
    /// archival. Best-effort caller; plain pool write, no lock needed once
    /// the match is completed.
    pub async fn update_match_state(
        &self,
        match_id: Uuid,
        match_state: &MatchState,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE matches SET match_state = $2, updated_at = NOW() WHERE id = $1")
            .bind(match_id)
            .bind(Json(match_state))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete_match(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Match plus the denormalized display names the live mirror carries.
    pub async fn get_match_with_names(
        &self,
        match_id: Uuid,
    ) -> Result<Option<MatchWithNames>, sqlx::Error> {
        sqlx::query_as::<_, MatchWithNames>(
            "SELECT
                m.id, m.sport_id, m.team_a_id, m.team_b_id, m.status, m.start_time,
                m.end_time, m.winner_team_id, m.referee, m.venue, m.score_details,
                m.match_events, m.match_state, m.created_at, m.updated_at,
                s.sport_name, s.scoring_type,
                ta.team_name AS team_a_name,
                tb.team_name AS team_b_name
             FROM matches m
             JOIN sports s ON m.sport_id = s.id
             LEFT JOIN teams ta ON m.team_a_id = ta.id
             LEFT JOIN teams tb ON m.team_b_id = tb.id
             WHERE m.id = $1",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_matches_by_status(
        &self,
        status: MatchStatus,
    ) -> Result<Vec<Match>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM matches WHERE status = $1 ORDER BY start_time",
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await
    }
}
