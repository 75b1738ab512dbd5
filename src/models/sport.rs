use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which projector family a sport uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScoringType {
    Cricket,
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sport {
    pub id: Uuid,
    pub sport_name: String,
    pub scoring_type: ScoringType,
    pub created_at: DateTime<Utc>,
}
