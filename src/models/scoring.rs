use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ApiError;

/// Cricket team aggregate. `overs` uses over notation: completed overs,
/// a dot, then balls into the current over (base-6 ball counting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CricketScore {
    pub runs: i64,
    pub wickets: i64,
    pub balls: i64,
    pub overs: String,
}

impl Default for CricketScore {
    fn default() -> Self {
        Self {
            runs: 0,
            wickets: 0,
            balls: 0,
            overs: "0.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScore {
    pub score: i64,
}

/// Per-team aggregate, shaped by sport family. Untagged so the stored JSON
/// keeps the exact field sets: `{runs, wickets, balls, overs}` or `{score}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamScore {
    Cricket(CricketScore),
    Standard(StandardScore),
}

/// The fold of all match events: team-id -> aggregate, plus an optional
/// timer sub-object that rides along untouched by the projectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<serde_json::Value>,
    #[serde(flatten)]
    pub teams: BTreeMap<Uuid, TeamScore>,
}

impl ScoreDetails {
    pub fn cricket_entry_mut(&mut self, team_id: Uuid) -> Result<&mut CricketScore, ApiError> {
        let entry = self
            .teams
            .entry(team_id)
            .or_insert_with(|| TeamScore::Cricket(CricketScore::default()));
        match entry {
            TeamScore::Cricket(score) => Ok(score),
            TeamScore::Standard(_) => Err(ApiError::InvalidState(format!(
                "team {} is scored as a standard sport, not cricket",
                team_id
            ))),
        }
    }

    pub fn standard_entry_mut(&mut self, team_id: Uuid) -> Result<&mut StandardScore, ApiError> {
        let entry = self
            .teams
            .entry(team_id)
            .or_insert_with(|| TeamScore::Standard(StandardScore::default()));
        match entry {
            TeamScore::Standard(score) => Ok(score),
            TeamScore::Cricket(_) => Err(ApiError::InvalidState(format!(
                "team {} is scored as cricket, not a standard sport",
                team_id
            ))),
        }
    }

    pub fn team(&self, team_id: &Uuid) -> Option<&TeamScore> {
        self.teams.get(team_id)
    }
}

/// Per-player counters. Counter names depend on sport family: batting
/// (`runs`, `balls_faced`, `fours`, `sixes`), bowling (`balls_bowled`,
/// `runs_conceded`, `wickets`, `wides`, `noballs`) or generic event-type
/// counters for standard sports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformanceStats(pub BTreeMap<String, i64>);

impl PerformanceStats {
    pub fn get(&self, key: &str) -> i64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Merge-increment a single counter, leaving unrelated counters alone.
    pub fn add(&mut self, key: &str, delta: i64) {
        let entry = self.0.entry(key.to_string()).or_insert(0);
        *entry += delta;
    }
}

/// Transient, non-ledger state for a live match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub striker_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_striker_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bowler_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toss_winner_team_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toss_decision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_innings: Option<i32>,
}

/// Request body for a standard-sport scoring event (goal, point, card, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScoreRequest {
    #[serde(default)]
    pub points: i64,
    pub team_id: Uuid,
    pub player_id: Option<Uuid>,
    pub event_type: Option<String>,
    pub details: Option<String>,
}

/// Request body for one cricket delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct CricketBallRequest {
    pub runs: i64,
    #[serde(default)]
    pub extras: i64,
    pub extra_type: Option<crate::models::match_events::ExtraType>,
    #[serde(default)]
    pub is_wicket: bool,
    pub wicket_type: Option<crate::models::match_events::WicketType>,
    pub batting_team_id: Uuid,
    pub striker_id: Option<Uuid>,
    pub non_striker_id: Option<Uuid>,
    pub bowler_id: Option<Uuid>,
}
