use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use meet_scoring_backend::config::settings::{get_config, get_jwt_settings, get_redis_url};
use meet_scoring_backend::run;
use meet_scoring_backend::services::telemetry::{get_subscriber, init_subscriber};
use meet_scoring_backend::services::LiveSyncService;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "meet-scoring-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let jwt_settings = get_jwt_settings(&config);

    // The live mirror is best-effort; the server still runs without it.
    let redis_client = match redis::Client::open(get_redis_url(&config).expose_secret()) {
        Ok(client) => {
            tracing::info!("Redis client created successfully");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(
                "Failed to create Redis client: {}. Live mirror and broadcasts disabled.",
                e
            );
            None
        }
    };

    // Only try to establish connections when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(32)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(config.database.connection_string().expose_secret())
        .expect("Failed to create Postgres connection pool");

    let live_sync = LiveSyncService::new(redis_client.clone());

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    run(listener, connection_pool, jwt_settings, redis_client, live_sync)?.await
}
