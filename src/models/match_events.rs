use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraType {
    Wide,
    #[serde(rename = "noball")]
    NoBall,
    Bye,
    LegBye,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WicketType {
    Bowled,
    Caught,
    Lbw,
    Stumped,
    #[serde(rename = "runout")]
    RunOut,
    RetiredHurt,
    HitWicket,
}

impl WicketType {
    /// Run-outs and retirements are not credited to the bowler.
    pub fn credits_bowler(&self) -> bool {
        !matches!(self, WicketType::RunOut | WicketType::RetiredHurt)
    }
}

/// One cricket delivery as recorded in the ledger. Carries every field
/// needed to reverse its effect on team score and player stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub timestamp: DateTime<Utc>,
    pub batting_team_id: Uuid,
    pub runs: i64,
    pub extras: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_type: Option<ExtraType>,
    pub is_wicket: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wicket_type: Option<WicketType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub striker_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_striker_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bowler_id: Option<Uuid>,
    /// Team overs after this ball, in over notation.
    pub overs: String,
    pub commentary: String,
}

impl DeliveryEvent {
    pub fn total_runs(&self) -> i64 {
        self.runs + self.extras
    }

    /// A delivery counts toward the over unless it is a wide or no-ball.
    pub fn is_legal(&self) -> bool {
        !matches!(
            self.extra_type,
            Some(ExtraType::Wide) | Some(ExtraType::NoBall)
        )
    }
}

/// One standard-sport scoring event (goal, point, card, ...). Before/after
/// scores are embedded so the event is reversible from the record alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub timestamp: DateTime<Utc>,
    pub team_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<Uuid>,
    pub points: i64,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub score_before: i64,
    pub score_after: i64,
}

/// Element of the append-only `match_events` ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    Delivery(DeliveryEvent),
    Score(ScoreEvent),
}

impl MatchEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            MatchEvent::Delivery(d) => d.timestamp,
            MatchEvent::Score(s) => s.timestamp,
        }
    }
}
