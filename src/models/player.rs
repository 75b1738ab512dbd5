use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::scoring::PerformanceStats;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub id: Uuid,
    pub player_name: String,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A player's participation record in one match. Unique per (match, player);
/// mutated by every scoring event that references the player.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchPlayer {
    pub id: Uuid,
    pub match_id: Uuid,
    pub team_id: Option<Uuid>,
    pub player_id: Uuid,
    pub performance_stats: Json<PerformanceStats>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
