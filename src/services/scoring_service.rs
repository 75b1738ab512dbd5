use std::sync::Arc;

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::match_queries::MatchQueries;
use crate::db::player_queries::PlayerQueries;
use crate::errors::ApiError;
use crate::models::live_events::LiveEvent;
use crate::models::match_events::{DeliveryEvent, MatchEvent, ScoreEvent};
use crate::models::matches::Match;
use crate::models::scoring::{CricketBallRequest, PerformanceStats, StandardScoreRequest};
use crate::scoring::{cricket, standard};
use crate::services::broadcast;
use crate::services::live_sync::{mirror_payload, LiveSyncService, SyncJob};

/// Transactional scoring engine shared by the HTTP and WebSocket adapters.
/// One relational transaction per operation: the ledger append, the team
/// aggregate and the player counters commit together or not at all. Mirror
/// pushes and broadcasts happen after commit and are best-effort.
#[derive(Clone)]
pub struct ScoringService {
    pool: PgPool,
    match_queries: MatchQueries,
    player_queries: PlayerQueries,
    live_sync: LiveSyncService,
    redis_client: Option<Arc<redis::Client>>,
}

impl ScoringService {
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

    /// Process one cricket delivery. The team aggregate, strike rotation,
    /// player counters and ledger append commit in a single transaction.
    pub async fn submit_cricket_ball(
        &self,
        match_id: Uuid,
        request: CricketBallRequest,
    ) -> Result<(Match, MatchEvent), ApiError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .match_queries
            .get_match_for_update(&mut tx, match_id)
            .await?
            .ok_or(ApiError::NotFound("match"))?;
        if current.is_closed() {
            return Err(ApiError::InvalidState(
                "match is completed, scoring is closed".to_string(),
            ));
        }

        let mut score_details = current.score_details.0;
        let mut match_state = current.match_state.0;
        let mut events = current.match_events.0;

        let mut delivery = DeliveryEvent {
            timestamp: Utc::now(),
            batting_team_id: request.batting_team_id,
            runs: request.runs,
            extras: request.extras,
            extra_type: request.extra_type,
            is_wicket: request.is_wicket,
            wicket_type: request.wicket_type,
            striker_id: request.striker_id,
            non_striker_id: request.non_striker_id,
            bowler_id: request.bowler_id,
            overs: String::new(),
            commentary: String::new(),
        };

        let team = score_details.cricket_entry_mut(request.batting_team_id)?;
        cricket::apply_to_team(team, &delivery);
        delivery.overs = team.overs.clone();
        let commentary = cricket::delivery_commentary(&delivery, &delivery.overs);
        delivery.commentary = commentary;

        cricket::update_match_state(&mut match_state, &delivery);

        if let Some(striker_id) = delivery.striker_id {
            self.mutate_player_stats(&mut tx, match_id, striker_id, |stats| {
                cricket::apply_to_striker(stats, &delivery)
            })
            .await?;
        }
        if let Some(bowler_id) = delivery.bowler_id {
            self.mutate_player_stats(&mut tx, match_id, bowler_id, |stats| {
                cricket::apply_to_bowler(stats, &delivery)
            })
            .await?;
        }

        let event = MatchEvent::Delivery(delivery);
        events.push(event.clone());

        let updated = self
            .match_queries
            .update_scoring_fields(&mut tx, match_id, &score_details, &events, &match_state)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Cricket ball recorded for match {}: {}",
            match_id,
            match &event {
                MatchEvent::Delivery(d) => d.commentary.as_str(),
                _ => "",
            }
        );

        let room_event = LiveEvent::CricketScoreUpdate {
            match_id,
            score_details: updated.score_details.0.clone(),
            match_state: updated.match_state.0.clone(),
            event: event.clone(),
            event_index: updated.match_events.0.len(),
            timestamp: Utc::now(),
        };
        self.fanout(&updated, room_event, Some(&event)).await;

        Ok((updated, event))
    }

    /// Process one standard-sport scoring event (goal, point, card, ...).
    pub async fn submit_standard_score(
        &self,
        match_id: Uuid,
        request: StandardScoreRequest,
    ) -> Result<(Match, MatchEvent), ApiError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .match_queries
            .get_match_for_update(&mut tx, match_id)
            .await?
            .ok_or(ApiError::NotFound("match"))?;
        if current.is_closed() {
            return Err(ApiError::InvalidState(
                "match is completed, scoring is closed".to_string(),
            ));
        }

        let mut score_details = current.score_details.0;
        let mut events = current.match_events.0;
        let match_state = current.match_state.0;

        let team = score_details.standard_entry_mut(request.team_id)?;
        let score_before = team.score;
        standard::apply_to_team(team, request.points);
        let score_after = team.score;

        let counter = standard::player_counter_key(request.event_type.as_deref()).to_string();
        if let Some(player_id) = request.player_id {
            let points = request.points;
            self.mutate_player_stats(&mut tx, match_id, player_id, |stats| {
                standard::apply_to_player(stats, &counter, points)
            })
            .await?;
        }

        let event = MatchEvent::Score(ScoreEvent {
            timestamp: Utc::now(),
            team_id: request.team_id,
            player_id: request.player_id,
            points: request.points,
            event_type: counter.clone(),
            details: request.details.clone(),
            score_before,
            score_after,
        });
        events.push(event.clone());

        let updated = self
            .match_queries
            .update_scoring_fields(&mut tx, match_id, &score_details, &events, &match_state)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Score event recorded for match {}: team {} {:+} ({})",
            match_id,
            request.team_id,
            request.points,
            counter
        );

        let room_event = LiveEvent::ScoreUpdated {
            match_id,
            score_details: updated.score_details.0.clone(),
            event: event.clone(),
            event_index: updated.match_events.0.len(),
            timestamp: Utc::now(),
        };
        self.fanout(&updated, room_event, Some(&event)).await;

        Ok((updated, event))
    }

    /// Pop the most recent ledger entry and apply its inverse. Deliveries are
    /// fully reversed (team, striker, bowler; transient state stays as-is).
    /// Standard events reverse the team score only, matching the recorded
    /// before/after snapshot.
    pub async fn undo_last_event(&self, match_id: Uuid) -> Result<(Match, MatchEvent), ApiError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .match_queries
            .get_match_for_update(&mut tx, match_id)
            .await?
            .ok_or(ApiError::NotFound("match"))?;
        if current.is_closed() {
            return Err(ApiError::InvalidState(
                "match is completed, scoring is closed".to_string(),
            ));
        }

        let mut score_details = current.score_details.0;
        let mut events = current.match_events.0;
        let match_state = current.match_state.0;

        let event = events
            .pop()
            .ok_or_else(|| ApiError::InvalidState("no events to undo".to_string()))?;

        match &event {
            MatchEvent::Delivery(delivery) => {
                let team = score_details.cricket_entry_mut(delivery.batting_team_id)?;
                cricket::revert_from_team(team, delivery);

                if let Some(striker_id) = delivery.striker_id {
                    self.mutate_player_stats(&mut tx, match_id, striker_id, |stats| {
                        cricket::revert_from_striker(stats, delivery)
                    })
                    .await?;
                }
                if let Some(bowler_id) = delivery.bowler_id {
                    self.mutate_player_stats(&mut tx, match_id, bowler_id, |stats| {
                        cricket::revert_from_bowler(stats, delivery)
                    })
                    .await?;
                }
            }
            MatchEvent::Score(score_event) => {
                let team = score_details.standard_entry_mut(score_event.team_id)?;
                standard::revert_from_team(team, score_event.points);
            }
        }

        let updated = self
            .match_queries
            .update_scoring_fields(&mut tx, match_id, &score_details, &events, &match_state)
            .await?;

        tx.commit().await?;

        tracing::info!("Undid last event for match {}", match_id);

        let room_event = LiveEvent::EventUndone {
            match_id,
            score_details: updated.score_details.0.clone(),
            undone_event: event.clone(),
            event_index: updated.match_events.0.len(),
            timestamp: Utc::now(),
        };
        // An undo mirrors the corrected aggregate but appends nothing to the
        // history stream.
        self.fanout(&updated, room_event, None).await;

        Ok((updated, event))
    }

    /// Locate the player's participation record and merge-increment its
    /// counters. No-op when the player is not in the lineup.
    async fn mutate_player_stats<F>(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
        player_id: Uuid,
        mutate: F,
    ) -> Result<(), ApiError>
    where
        F: FnOnce(&mut PerformanceStats),
    {
        if let Some(player) = self
            .player_queries
            .get_for_update(tx, match_id, player_id)
            .await?
        {
            let mut stats = player.performance_stats.0;
            mutate(&mut stats);
            self.player_queries
                .update_stats(tx, player.id, &stats)
                .await?;
        } else {
            tracing::debug!(
                "Player {} has no lineup entry in match {}, skipping stat update",
                player_id,
                match_id
            );
        }
        Ok(())
    }

    /// Post-commit fanout: mirror merge, optional history append, room and
    /// overview broadcast. Everything here is best-effort. The denormalized
    /// row is fetched once and shared by the mirror push and the overview.
    async fn fanout(
        &self,
        updated: &Match,
        room_event: LiveEvent,
        history_entry: Option<&MatchEvent>,
    ) {
        let details = match self.match_queries.get_match_with_names(updated.id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::error!("Failed to load match {} for fanout: {}", updated.id, e);
                None
            }
        };

        if let Some(details) = &details {
            self.live_sync.enqueue(SyncJob::FullMatch {
                match_id: updated.id,
                payload: mirror_payload(details),
            });
        }
        if let Some(event) = history_entry {
            if let Ok(entry) = serde_json::to_value(event) {
                self.live_sync.enqueue(SyncJob::HistoryAppend {
                    match_id: updated.id,
                    entry,
                });
            }
        }

        broadcast::publish(
            self.redis_client.as_ref(),
            &broadcast::match_channel(updated.id),
            &room_event,
        )
        .await;

        let (sport_name, team_a_name, team_b_name) = match details {
            Some(d) => (Some(d.sport_name), d.team_a_name, d.team_b_name),
            None => (None, None, None),
        };
        broadcast::publish(
            self.redis_client.as_ref(),
            broadcast::OVERVIEW_CHANNEL,
            &LiveEvent::OverviewUpdate {
                match_id: updated.id,
                sport_name,
                team_a_name,
                team_b_name,
                status: updated.status,
                score_details: updated.score_details.0.clone(),
                timestamp: Utc::now(),
            },
        )
        .await;
    }
}
