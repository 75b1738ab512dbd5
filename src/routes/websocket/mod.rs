mod connection;
mod messages;

use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::middleware::auth::decode_token;

pub use connection::ScoringConnection;
pub use messages::TokenQuery;

/// WebSocket entry point. Token comes from the `token` query parameter or a
/// Bearer header; browsers cannot set headers on WebSocket upgrades, so the
/// query parameter is the common path.
pub async fn scoring_ws_route(
    req: HttpRequest,
    stream: web::Payload,
    query: Option<web::Query<TokenQuery>>,
    jwt_settings: web::Data<JwtSettings>,
    redis: Option<web::Data<std::sync::Arc<redis::Client>>>,
    scoring: web::Data<crate::services::ScoringService>,
    matches: web::Data<crate::services::MatchService>,
) -> Result<HttpResponse, Error> {
    tracing::info!("New scoring WebSocket connection request");

    let token = if let Some(query) = &query {
        Some(query.token.clone())
    } else {
        req.headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string)
    };

    let Some(token) = token else {
        tracing::warn!("No authentication provided for scoring WebSocket");
        return Err(actix_web::error::ErrorUnauthorized("No authentication"));
    };

    let claims = decode_token(&token, jwt_settings.get_ref())?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| actix_web::error::ErrorBadRequest("Invalid user ID"))?;

    let resp = ws::start(
        ScoringConnection::new(user_id, claims.username.clone(), claims.role, redis, scoring, matches),
        &req,
        stream,
    )?;

    tracing::info!("Scoring WebSocket connection established for user {}", user_id);
    Ok(resp)
}
