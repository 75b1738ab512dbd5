use crate::models::match_events::{DeliveryEvent, ExtraType};
use crate::models::scoring::{CricketScore, MatchState, PerformanceStats};

pub const BALLS_PER_OVER: i64 = 6;

/// Over notation: completed overs, a dot, then balls into the current over.
/// Base-6 ball counting, not a decimal fraction.
pub fn to_over_notation(balls: i64) -> String {
    format!("{}.{}", balls / BALLS_PER_OVER, balls % BALLS_PER_OVER)
}

/// Fold one delivery into the batting team's aggregate.
pub fn apply_to_team(score: &mut CricketScore, ball: &DeliveryEvent) {
    score.runs += ball.total_runs();
    if ball.is_wicket {
        score.wickets += 1;
    }
    if ball.is_legal() {
        score.balls += 1;
        score.overs = to_over_notation(score.balls);
    }
}

/// Exact inverse of [`apply_to_team`].
pub fn revert_from_team(score: &mut CricketScore, ball: &DeliveryEvent) {
    score.runs -= ball.total_runs();
    if ball.is_wicket {
        score.wickets -= 1;
    }
    if ball.is_legal() {
        score.balls -= 1;
        score.overs = to_over_notation(score.balls);
    }
}

/// Record current participants in the transient state, then swap ends on an
/// odd run count. Rotation looks at batted runs only; extras on an odd-run
/// ball do not rotate, and there is no end-of-over rotation.
pub fn update_match_state(state: &mut MatchState, ball: &DeliveryEvent) {
    if ball.striker_id.is_some() {
        state.striker_id = ball.striker_id;
    }
    if ball.non_striker_id.is_some() {
        state.non_striker_id = ball.non_striker_id;
    }
    if ball.bowler_id.is_some() {
        state.bowler_id = ball.bowler_id;
    }

    if ball.runs % 2 == 1 {
        if let (Some(striker), Some(non_striker)) = (ball.striker_id, ball.non_striker_id) {
            state.striker_id = Some(non_striker);
            state.non_striker_id = Some(striker);
        }
    }
}

/// Batting counters for the striker. A wide does not count as a ball faced.
pub fn apply_to_striker(stats: &mut PerformanceStats, ball: &DeliveryEvent) {
    if ball.extra_type != Some(ExtraType::Wide) {
        stats.add("balls_faced", 1);
    }
    stats.add("runs", ball.runs);
    if ball.runs == 4 {
        stats.add("fours", 1);
    }
    if ball.runs == 6 {
        stats.add("sixes", 1);
    }
}

pub fn revert_from_striker(stats: &mut PerformanceStats, ball: &DeliveryEvent) {
    if ball.extra_type != Some(ExtraType::Wide) {
        stats.add("balls_faced", -1);
    }
    stats.add("runs", -ball.runs);
    if ball.runs == 4 {
        stats.add("fours", -1);
    }
    if ball.runs == 6 {
        stats.add("sixes", -1);
    }
}

/// Bowling counters. Wides and no-balls are charged to the bowler but do not
/// count as balls bowled; run-outs and retirements earn no wicket credit.
pub fn apply_to_bowler(stats: &mut PerformanceStats, ball: &DeliveryEvent) {
    let mut conceded = ball.runs;
    match ball.extra_type {
        Some(ExtraType::Wide) => {
            conceded += ball.extras;
            stats.add("wides", 1);
        }
        Some(ExtraType::NoBall) => {
            conceded += ball.extras;
            stats.add("noballs", 1);
        }
        _ => {}
    }
    stats.add("runs_conceded", conceded);

    if ball.is_legal() {
        stats.add("balls_bowled", 1);
    }

    if ball.is_wicket {
        let credited = ball.wicket_type.map(|w| w.credits_bowler()).unwrap_or(true);
        if credited {
            stats.add("wickets", 1);
        }
    }
}

pub fn revert_from_bowler(stats: &mut PerformanceStats, ball: &DeliveryEvent) {
    let mut conceded = ball.runs;
    match ball.extra_type {
        Some(ExtraType::Wide) => {
            conceded += ball.extras;
            stats.add("wides", -1);
        }
        Some(ExtraType::NoBall) => {
            conceded += ball.extras;
            stats.add("noballs", -1);
        }
        _ => {}
    }
    stats.add("runs_conceded", -conceded);

    if ball.is_legal() {
        stats.add("balls_bowled", -1);
    }

    if ball.is_wicket {
        let credited = ball.wicket_type.map(|w| w.credits_bowler()).unwrap_or(true);
        if credited {
            stats.add("wickets", -1);
        }
    }
}

/// Ball-by-ball commentary line embedded in the ledger entry.
pub fn delivery_commentary(ball: &DeliveryEvent, overs: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    match ball.runs {
        0 => {}
        4 => parts.push("FOUR".to_string()),
        6 => parts.push("SIX".to_string()),
        n => parts.push(format!("{} run{}", n, if n == 1 { "" } else { "s" })),
    }

    match ball.extra_type {
        Some(ExtraType::Wide) => parts.push(format!("wide +{}", ball.extras)),
        Some(ExtraType::NoBall) => parts.push(format!("no-ball +{}", ball.extras)),
        Some(ExtraType::Bye) => parts.push(format!("{} bye", ball.extras)),
        Some(ExtraType::LegBye) => parts.push(format!("{} leg bye", ball.extras)),
        None => {}
    }

    if ball.is_wicket {
        match ball.wicket_type {
            Some(w) => parts.push(format!("WICKET ({:?})", w).to_lowercase()),
            None => parts.push("wicket".to_string()),
        }
    }

    if parts.is_empty() {
        parts.push("dot ball".to_string());
    }

    format!("Over {}: {}", overs, parts.join(", "))
}
