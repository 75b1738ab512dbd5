pub mod auth;
pub mod scorer;

pub use auth::{decode_token, generate_token, validate_jwt_from_request, AuthMiddleware, Claims};
pub use scorer::ScorerMiddleware;
