pub mod cricket;
pub mod standard;

use crate::models::match_events::MatchEvent;
use crate::models::scoring::{ScoreDetails, StandardScore, TeamScore};

/// Replay the full event ledger from an empty aggregate. The stored
/// `score_details` must always equal this fold; it is also the final
/// truth used when a completed match is archived.
pub fn fold_events(events: &[MatchEvent]) -> ScoreDetails {
    let mut details = ScoreDetails::default();

    for event in events {
        match event {
            MatchEvent::Delivery(delivery) => {
                let entry = details
                    .teams
                    .entry(delivery.batting_team_id)
                    .or_insert_with(|| TeamScore::Cricket(Default::default()));
                if let TeamScore::Cricket(score) = entry {
                    cricket::apply_to_team(score, delivery);
                }
            }
            MatchEvent::Score(score_event) => {
                let entry = details
                    .teams
                    .entry(score_event.team_id)
                    .or_insert_with(|| TeamScore::Standard(StandardScore::default()));
                if let TeamScore::Standard(score) = entry {
                    standard::apply_to_team(score, score_event.points);
                }
            }
        }
    }

    details
}
