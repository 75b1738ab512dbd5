pub mod live_events;
pub mod match_events;
pub mod matches;
pub mod player;
pub mod scoring;
pub mod sport;
pub mod team;
pub mod user;
