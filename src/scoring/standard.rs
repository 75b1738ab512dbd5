use crate::models::scoring::{PerformanceStats, StandardScore};

pub fn apply_to_team(score: &mut StandardScore, points: i64) {
    score.score += points;
}

pub fn revert_from_team(score: &mut StandardScore, points: i64) {
    score.score -= points;
}

/// Player counter for a standard event. The team aggregate adds `points`
/// exactly, but a zero-point event still bumps the player's counter by one:
/// the event occurred, so it counts at least once.
pub fn apply_to_player(stats: &mut PerformanceStats, counter: &str, points: i64) {
    let delta = if points != 0 { points } else { 1 };
    stats.add(counter, delta);
}

/// Counter key for a standard event: its event type, or `points` when absent.
pub fn player_counter_key(event_type: Option<&str>) -> &str {
    match event_type {
        Some(key) if !key.is_empty() => key,
        _ => "points",
    }
}
