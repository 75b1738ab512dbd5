pub mod broadcast;
pub mod live_sync;
pub mod match_service;
pub mod scoring_service;
pub mod telemetry;

pub use live_sync::{LiveSyncService, SyncJob};
pub use match_service::MatchService;
pub use scoring_service::ScoringService;
