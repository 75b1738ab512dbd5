use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::matches::LineupEntry;
use crate::models::player::MatchPlayer;
use crate::models::scoring::PerformanceStats;

const PLAYER_COLUMNS: &str = "
    id, match_id, team_id, player_id, performance_stats, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PlayerQueries {
    pool: PgPool,
}

impl PlayerQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock a participation record for stat mutation. `None` when the player
    /// is not in the lineup; callers treat that as a no-op.
    pub async fn get_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
        player_id: Uuid,
    ) -> Result<Option<MatchPlayer>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM match_players WHERE match_id = $1 AND player_id = $2 FOR UPDATE",
            PLAYER_COLUMNS
        );
        sqlx::query_as::<_, MatchPlayer>(&query)
            .bind(match_id)
            .bind(player_id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn update_stats(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_player_id: Uuid,
        stats: &PerformanceStats,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE match_players SET performance_stats = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(match_player_id)
        .bind(Json(stats))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
        entry: &LineupEntry,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO match_players (
                id, match_id, team_id, player_id, performance_stats, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, '{}', NOW(), NOW())
            ON CONFLICT (match_id, player_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(match_id)
        .bind(entry.team_id)
        .bind(entry.player_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Populate the lineup from a team's roster when a match is created.
    pub async fn seed_from_roster(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
        team_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO match_players (
                id, match_id, team_id, player_id, performance_stats, created_at, updated_at
            )
            SELECT gen_random_uuid(), $1, p.team_id, p.id, '{}', NOW(), NOW()
            FROM players p
            WHERE p.team_id = $2
            ON CONFLICT (match_id, player_id) DO NOTHING",
        )
        .bind(match_id)
        .bind(team_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_lineup(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM match_players WHERE match_id = $1")
            .bind(match_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn list_lineup(&self, match_id: Uuid) -> Result<Vec<MatchPlayer>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM match_players WHERE match_id = $1 ORDER BY created_at",
            PLAYER_COLUMNS
        );
        sqlx::query_as::<_, MatchPlayer>(&query)
            .bind(match_id)
            .fetch_all(&self.pool)
            .await
    }
}
