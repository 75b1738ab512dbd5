pub mod auth_handler;
pub mod catalog_handler;
pub mod lineup_handler;
pub mod match_handler;
pub mod scorer_handler;
pub mod scoring_handler;

use actix_web::{HttpMessage, HttpRequest};
use serde::Serialize;

use crate::errors::ApiError;
use crate::middleware::Claims;

/// Standard success envelope: `{"success": true, "data": ...}`.
pub(crate) fn success<T: Serialize>(data: T) -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": data
    }))
}

/// Scorer gate for resources that mix read and write methods in one path.
/// The auth middleware has already validated the token and stashed the
/// claims; this only checks the role.
pub(crate) fn require_scorer(req: &HttpRequest) -> Result<Claims, ApiError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(ApiError::Forbidden("authentication required"))?;
    if !claims.role.can_score() {
        return Err(ApiError::Forbidden(
            "scoring requires a scorer or admin role",
        ));
    }
    Ok(claims)
}
