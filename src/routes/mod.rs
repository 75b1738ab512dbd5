use actix_web::web;

pub mod auth;
pub mod backend_health;
pub mod catalog;
pub mod matches;
pub mod scorer;
pub mod websocket;

use crate::middleware::auth::AuthMiddleware;
use crate::middleware::scorer::ScorerMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login),
    );

    // Reference data, read-only.
    cfg.service(catalog::list_sports)
        .service(catalog::list_teams)
        .service(catalog::list_team_players);

    // Match routes require authentication; write methods additionally check
    // the scorer role inside the handlers.
    cfg.service(
        web::scope("/matches")
            .wrap(AuthMiddleware)
            .service(matches::list_matches)
            .service(matches::create_match)
            .service(matches::get_match)
            .service(matches::update_match)
            .service(matches::delete_match)
            .service(matches::get_live_state)
            .service(matches::submit_standard_score)
            .service(matches::submit_cricket_ball)
            .service(matches::submit_event)
            .service(matches::undo_last_event)
            .service(matches::get_lineup)
            .service(matches::update_lineup),
    );

    // Scorer console routes: role enforced at the scope boundary.
    cfg.service(
        web::scope("/scorer")
            .wrap(ScorerMiddleware)
            .service(scorer::start_match)
            .service(scorer::end_match)
            .service(scorer::patch_score)
            .service(scorer::update_live_state),
    );

    // WebSocket route; authentication happens during the handshake.
    cfg.service(web::resource("/scoring-ws").route(web::get().to(websocket::scoring_ws_route)));
}
