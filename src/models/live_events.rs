use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::match_events::MatchEvent;
use crate::models::matches::MatchStatus;
use crate::models::scoring::{MatchState, ScoreDetails};

/// Broadcast messages pushed to realtime subscribers. Match-room events carry
/// the full aggregate; overview events are summary-level only.
///
/// Scoring events carry `event_index`, the ledger length right after the
/// commit that produced them. Publishes happen after commit and can race, so
/// subscribers use the index to restore commit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum LiveEvent {
    #[serde(rename = "cricket_score_update")]
    CricketScoreUpdate {
        match_id: Uuid,
        score_details: ScoreDetails,
        match_state: MatchState,
        event: MatchEvent,
        event_index: usize,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "score_updated")]
    ScoreUpdated {
        match_id: Uuid,
        score_details: ScoreDetails,
        event: MatchEvent,
        event_index: usize,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "event_undone")]
    EventUndone {
        match_id: Uuid,
        score_details: ScoreDetails,
        undone_event: MatchEvent,
        event_index: usize,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "overview_update")]
    OverviewUpdate {
        match_id: Uuid,
        sport_name: Option<String>,
        team_a_name: Option<String>,
        team_b_name: Option<String>,
        status: MatchStatus,
        score_details: ScoreDetails,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "lineup_updated")]
    LineupUpdated {
        match_id: Uuid,
        players: Vec<serde_json::Value>,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "match_details_updated")]
    MatchDetailsUpdated {
        match_id: Uuid,
        status: MatchStatus,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "match_deleted")]
    MatchDeleted {
        match_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::match_events::ScoreEvent;

    #[test]
    fn room_events_expose_ledger_position_for_ordering() {
        let event = LiveEvent::ScoreUpdated {
            match_id: Uuid::new_v4(),
            score_details: ScoreDetails::default(),
            event: MatchEvent::Score(ScoreEvent {
                timestamp: Utc::now(),
                team_id: Uuid::new_v4(),
                player_id: None,
                points: 2,
                event_type: "goal".to_string(),
                details: None,
                score_before: 0,
                score_after: 2,
            }),
            event_index: 7,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "score_updated");
        assert_eq!(json["event_index"], 7);
    }

    #[test]
    fn undo_events_expose_post_undo_ledger_position() {
        let event = LiveEvent::EventUndone {
            match_id: Uuid::new_v4(),
            score_details: ScoreDetails::default(),
            undone_event: MatchEvent::Score(ScoreEvent {
                timestamp: Utc::now(),
                team_id: Uuid::new_v4(),
                player_id: None,
                points: 1,
                event_type: "goal".to_string(),
                details: None,
                score_before: 0,
                score_after: 1,
            }),
            event_index: 4,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "event_undone");
        assert_eq!(json["event_index"], 4);
    }
}
