pub mod match_queries;
pub mod player_queries;
pub mod user_queries;
