use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{http, web, App, HttpServer};
use sqlx::PgPool;
use tracing_actix_web::TracingLogger;

pub mod config;
pub mod db;
pub mod errors;
mod handlers;
pub mod middleware;
pub mod models;
mod routes;
pub mod scoring;
pub mod services;

use crate::config::jwt::JwtSettings;
use crate::routes::init_routes;
use crate::services::{LiveSyncService, MatchService, ScoringService};

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    jwt_settings: JwtSettings,
    redis_client: Option<Arc<redis::Client>>,
    live_sync: LiveSyncService,
) -> Result<Server, std::io::Error> {
    let scoring_service = ScoringService::new(db_pool.clone(), live_sync.clone(), redis_client.clone());
    let match_service = MatchService::new(db_pool.clone(), live_sync, redis_client.clone());

    let db_pool_data = web::Data::new(db_pool);
    let jwt_settings = web::Data::new(jwt_settings);
    let scoring_service = web::Data::new(scoring_service);
    let match_service = web::Data::new(match_service);
    let redis_client_data = redis_client.map(web::Data::new);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
                http::header::UPGRADE,
                http::header::CONNECTION,
            ])
            .supports_credentials()
            .max_age(3600);

        let mut app = App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(db_pool_data.clone())
            .app_data(jwt_settings.clone())
            .app_data(scoring_service.clone())
            .app_data(match_service.clone());
        if let Some(redis) = &redis_client_data {
            app = app.app_data(redis.clone());
        }

        app.configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
