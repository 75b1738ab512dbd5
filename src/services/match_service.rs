use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::match_queries::MatchQueries;
use crate::db::player_queries::PlayerQueries;
use crate::errors::ApiError;
use crate::models::live_events::LiveEvent;
use crate::models::matches::{
    CreateMatchRequest, Match, MatchStatus, MatchWithNames, UpdateLineupRequest,
    UpdateMatchRequest,
};
use crate::models::player::MatchPlayer;
use crate::models::scoring::MatchState;
use crate::models::sport::Sport;
use crate::scoring;
use crate::services::broadcast;
use crate::services::live_sync::{deep_merge, mirror_payload, LiveSyncService, SyncJob};

/// Match lifecycle and roster management. Scoring itself lives in
/// `ScoringService`; this service owns everything around it: creation,
/// detail edits, status transitions, lineups and deletion.
#[derive(Clone)]
pub struct MatchService {
    pool: PgPool,
    match_queries: MatchQueries,
    player_queries: PlayerQueries,
    live_sync: LiveSyncService,
    redis_client: Option<Arc<redis::Client>>,
}

impl MatchService {
    pub fn new(
        pool: PgPool,
        live_sync: LiveSyncService,
        redis_client: Option<Arc<redis::Client>>,
    ) -> Self {
        Self {
            match_queries: MatchQueries::new(pool.clone()),
            player_queries: PlayerQueries::new(pool.clone()),
            pool,
            live_sync,
            redis_client,
        }
    }

    /// Create a scheduled match and seed its lineup from both team rosters.
    pub async fn create_match(&self, request: CreateMatchRequest) -> Result<Match, ApiError> {
        let sport = sqlx::query_as::<_, Sport>(
            "SELECT id, sport_name, scoring_type, created_at FROM sports WHERE id = $1",
        )
        .bind(request.sport_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("sport"))?;

        let mut tx = self.pool.begin().await?;
        let created = self.match_queries.insert_match(&mut tx, &request).await?;

        for team_id in [created.team_a_id, created.team_b_id].into_iter().flatten() {
            let seeded = self
                .player_queries
                .seed_from_roster(&mut tx, created.id, team_id)
                .await?;
            tracing::debug!(
                "Seeded {} roster players for team {} into match {}",
                seeded,
                team_id,
                created.id
            );
        }

        tx.commit().await?;

        tracing::info!(
            "Created {} match {} ({:?})",
            sport.sport_name,
            created.id,
            sport.scoring_type
        );

        self.push_mirror(created.id).await;
        self.publish_overview(&created).await;

        Ok(created)
    }

    pub async fn get_match(&self, match_id: Uuid) -> Result<MatchWithNames, ApiError> {
        self.match_queries
            .get_match_with_names(match_id)
            .await?
            .ok_or(ApiError::NotFound("match"))
    }

    pub async fn list_matches(&self, status: MatchStatus) -> Result<Vec<Match>, ApiError> {
        Ok(self.match_queries.list_matches_by_status(status).await?)
    }

    /// Edit schedule metadata. Scoring documents are untouched.
    pub async fn update_match(
        &self,
        match_id: Uuid,
        request: UpdateMatchRequest,
    ) -> Result<Match, ApiError> {
        let mut tx = self.pool.begin().await?;
        self.match_queries
            .get_match_for_update(&mut tx, match_id)
            .await?
            .ok_or(ApiError::NotFound("match"))?;

        let updated = self
            .match_queries
            .update_details(
                &mut tx,
                match_id,
                request.start_time,
                request.referee.as_deref(),
                request.venue.as_deref(),
            )
            .await?;
        tx.commit().await?;

        self.push_mirror(match_id).await;
        self.publish_to_match(
            match_id,
            &LiveEvent::MatchDetailsUpdated {
                match_id,
                status: updated.status,
                timestamp: Utc::now(),
            },
        )
        .await;

        Ok(updated)
    }

    /// Move the match along its lifecycle: scheduled -> live -> completed.
    /// Completion folds the ledger as the final score and reconciles the
    /// transient state left in the live mirror back into the durable row.
    pub async fn update_status(
        &self,
        match_id: Uuid,
        next: MatchStatus,
        winner_team_id: Option<Uuid>,
    ) -> Result<Match, ApiError> {
        let mut tx = self.pool.begin().await?;
        let current = self
            .match_queries
            .get_match_for_update(&mut tx, match_id)
            .await?
            .ok_or(ApiError::NotFound("match"))?;

        if !current.status.can_transition_to(next) {
            return Err(ApiError::InvalidState(format!(
                "cannot move match from {} to {}",
                current.status.as_str(),
                next.as_str()
            )));
        }

        let updated = if next == MatchStatus::Completed {
            // The ledger is the final truth: replace the stored aggregate
            // with its fold before freezing the match.
            let final_score = scoring::fold_events(&current.match_events.0);
            self.match_queries
                .update_scoring_fields(
                    &mut tx,
                    match_id,
                    &final_score,
                    &current.match_events.0,
                    &current.match_state.0,
                )
                .await?;
            self.match_queries
                .update_status(&mut tx, match_id, next, Some(Utc::now()), winner_team_id)
                .await?
        } else {
            self.match_queries
                .update_status(&mut tx, match_id, next, None, winner_team_id)
                .await?
        };

        tx.commit().await?;

        tracing::info!("Match {} is now {}", match_id, next.as_str());

        if next == MatchStatus::Completed {
            self.archive_live_state(match_id).await;
        }

        self.live_sync.enqueue(SyncJob::Status {
            match_id,
            status: next.as_str().to_string(),
        });
        self.push_mirror(match_id).await;
        self.publish_to_match(
            match_id,
            &LiveEvent::MatchDetailsUpdated {
                match_id,
                status: next,
                timestamp: Utc::now(),
            },
        )
        .await;
        self.publish_overview(&updated).await;

        Ok(updated)
    }

    pub async fn start_match(&self, match_id: Uuid) -> Result<Match, ApiError> {
        self.update_status(match_id, MatchStatus::Live, None).await
    }

    pub async fn end_match(
        &self,
        match_id: Uuid,
        winner_team_id: Option<Uuid>,
    ) -> Result<Match, ApiError> {
        self.update_status(match_id, MatchStatus::Completed, winner_team_id)
            .await
    }

    /// Remove the match. Participation records cascade; the mirror keeps a
    /// tombstone status so late subscribers see the deletion.
    pub async fn delete_match(&self, match_id: Uuid) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;
        let deleted = self.match_queries.delete_match(&mut tx, match_id).await?;
        if !deleted {
            return Err(ApiError::NotFound("match"));
        }
        tx.commit().await?;

        tracing::info!("Deleted match {}", match_id);

        self.live_sync.enqueue(SyncJob::Status {
            match_id,
            status: "deleted".to_string(),
        });
        let event = LiveEvent::MatchDeleted {
            match_id,
            timestamp: Utc::now(),
        };
        self.publish_to_match(match_id, &event).await;
        broadcast::publish(
            self.redis_client.as_ref(),
            broadcast::OVERVIEW_CHANNEL,
            &event,
        )
        .await;

        Ok(())
    }

    pub async fn get_lineup(&self, match_id: Uuid) -> Result<Vec<MatchPlayer>, ApiError> {
        self.match_queries
            .get_match(match_id)
            .await?
            .ok_or(ApiError::NotFound("match"))?;
        Ok(self.player_queries.list_lineup(match_id).await?)
    }

    /// Replace the lineup wholesale. Only legal before the first ball: once
    /// the match is live, participation records carry accumulated stats.
    pub async fn update_lineup(
        &self,
        match_id: Uuid,
        request: UpdateLineupRequest,
    ) -> Result<Vec<MatchPlayer>, ApiError> {
        let mut tx = self.pool.begin().await?;
        let current = self
            .match_queries
            .get_match_for_update(&mut tx, match_id)
            .await?
            .ok_or(ApiError::NotFound("match"))?;

        if current.status != MatchStatus::Scheduled {
            return Err(ApiError::InvalidState(
                "lineup can only be edited while the match is scheduled".to_string(),
            ));
        }

        self.player_queries.delete_lineup(&mut tx, match_id).await?;
        for entry in &request.players {
            self.player_queries.insert(&mut tx, match_id, entry).await?;
        }
        tx.commit().await?;

        let lineup = self.player_queries.list_lineup(match_id).await?;
        let players: Vec<Value> = lineup
            .iter()
            .filter_map(|p| serde_json::to_value(p).ok())
            .collect();

        self.live_sync.enqueue(SyncJob::PartialUpdate {
            match_id,
            payload: serde_json::json!({ "lineup": players }),
        });
        self.publish_to_match(
            match_id,
            &LiveEvent::LineupUpdated {
                match_id,
                players,
                timestamp: Utc::now(),
            },
        )
        .await;

        Ok(lineup)
    }

    /// Merge a patch straight into the mirrored match document. This is the
    /// one write path that targets the mirror itself (timer ticks, innings
    /// markers); optimistic retries handle concurrent scorers.
    pub async fn update_live_match_state(
        &self,
        match_id: Uuid,
        patch: Value,
    ) -> Result<Value, ApiError> {
        self.match_queries
            .get_match(match_id)
            .await?
            .ok_or(ApiError::NotFound("match"))?;

        self.live_sync
            .update_live_state(match_id, move |mut node| {
                deep_merge(&mut node, &patch);
                node
            })
            .await
    }

    pub async fn get_live_match_state(&self, match_id: Uuid) -> Result<Option<Value>, ApiError> {
        self.live_sync.get_live_state(match_id).await
    }

    /// Pull whatever transient state accumulated in the mirror during play
    /// back into the durable row. Best-effort: a missing or unreadable
    /// mirror node leaves the relational state as-is.
    async fn archive_live_state(&self, match_id: Uuid) {
        let node = match self.live_sync.get_live_state(match_id).await {
            Ok(Some(node)) => node,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Skipping live state archival for match {}: {}", match_id, e);
                return;
            }
        };

        let Some(raw_state) = node.get("match_state") else {
            return;
        };
        let state: MatchState = match serde_json::from_value(raw_state.clone()) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    "Mirror match_state for {} does not parse, not archiving: {}",
                    match_id,
                    e
                );
                return;
            }
        };

        if let Err(e) = self.match_queries.update_match_state(match_id, &state).await {
            tracing::error!("Failed to archive live state for match {}: {}", match_id, e);
        }
    }

    async fn push_mirror(&self, match_id: Uuid) {
        match self.match_queries.get_match_with_names(match_id).await {
            Ok(Some(details)) => {
                self.live_sync.enqueue(SyncJob::FullMatch {
                    match_id,
                    payload: mirror_payload(&details),
                });
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Failed to load match {} for mirror push: {}", match_id, e);
            }
        }
    }

    async fn publish_to_match(&self, match_id: Uuid, event: &LiveEvent) {
        broadcast::publish(
            self.redis_client.as_ref(),
            &broadcast::match_channel(match_id),
            event,
        )
        .await;
    }

    async fn publish_overview(&self, m: &Match) {
        let (sport_name, team_a_name, team_b_name) =
            match self.match_queries.get_match_with_names(m.id).await {
                Ok(Some(details)) => (
                    Some(details.sport_name),
                    details.team_a_name,
                    details.team_b_name,
                ),
                _ => (None, None, None),
            };

        broadcast::publish(
            self.redis_client.as_ref(),
            broadcast::OVERVIEW_CHANNEL,
            &LiveEvent::OverviewUpdate {
                match_id: m.id,
                sport_name,
                team_a_name,
                team_b_name,
                status: m.status,
                score_details: m.score_details.0.clone(),
                timestamp: Utc::now(),
            },
        )
        .await;
    }
}
