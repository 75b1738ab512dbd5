use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::match_events::MatchEvent;
use crate::models::scoring::{MatchState, ScoreDetails};
use crate::models::sport::ScoringType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
        }
    }

    /// Valid lifecycle edges: scheduled -> live -> completed.
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        matches!(
            (self, next),
            (MatchStatus::Scheduled, MatchStatus::Live)
                | (MatchStatus::Live, MatchStatus::Completed)
        )
    }
}

/// Durable match record. The JSONB columns hold the typed scoring documents;
/// the relational row stays authoritative while the live mirror lags.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Match {
    pub id: Uuid,
    pub sport_id: Uuid,
    pub team_a_id: Option<Uuid>,
    pub team_b_id: Option<Uuid>,
    pub status: MatchStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub winner_team_id: Option<Uuid>,
    pub referee: Option<String>,
    pub venue: Option<String>,
    pub score_details: Json<ScoreDetails>,
    pub match_events: Json<Vec<MatchEvent>>,
    pub match_state: Json<MatchState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn is_closed(&self) -> bool {
        self.status == MatchStatus::Completed
    }
}

/// Match joined with the display names the live mirror denormalizes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MatchWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub match_row: Match,
    pub sport_name: String,
    pub scoring_type: ScoringType,
    pub team_a_name: Option<String>,
    pub team_b_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub sport_id: Uuid,
    pub team_a_id: Option<Uuid>,
    pub team_b_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub referee: Option<String>,
    pub venue: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMatchRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub referee: Option<String>,
    pub venue: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: MatchStatus,
    pub winner_team_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct EndMatchRequest {
    pub winner_team_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupEntry {
    pub player_id: Uuid,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLineupRequest {
    pub players: Vec<LineupEntry>,
}
