use std::net::TcpListener;
use std::sync::Arc;

use once_cell::sync::Lazy;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use meet_scoring_backend::config::settings::{
    get_config, get_jwt_settings, get_redis_url, DatabaseSettings,
};
use meet_scoring_backend::run;
use meet_scoring_backend::services::telemetry::{get_subscriber, init_subscriber};
use meet_scoring_backend::services::LiveSyncService;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    let connection_pool = configure_db(&configuration.database).await;
    let jwt_settings = get_jwt_settings(&configuration);

    let redis_client = redis::Client::open(get_redis_url(&configuration).expose_secret())
        .ok()
        .map(Arc::new);
    let live_sync = LiveSyncService::new(redis_client.clone());

    let server = run(
        listener,
        connection_pool.clone(),
        jwt_settings,
        redis_client,
        live_sync,
    )
    .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Insert a user with the given role directly (registration only grants
/// viewer) and log in through the API, returning a bearer token.
pub async fn create_user_and_login(app: &TestApp, role: &str) -> String {
    let username = format!("user{}", Uuid::new_v4().simple());
    let email = format!("{}@example.com", username);
    let password = "password123";
    let password_hash = bcrypt::hash(password, 4).expect("Failed to hash password");

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, NOW(), NOW())",
    )
    .bind(Uuid::new_v4())
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .bind(role)
    .execute(&app.db_pool)
    .await
    .expect("Failed to insert user");

    let response = Client::new()
        .post(format!("{}/auth/login", app.address))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Invalid login response");
    body["token"].as_str().expect("No token in response").to_string()
}

pub async fn seed_sport(pool: &PgPool, name: &str, scoring_type: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO sports (id, sport_name, scoring_type, created_at) VALUES ($1, $2, $3, NOW())")
        .bind(id)
        .bind(name)
        .bind(scoring_type)
        .execute(pool)
        .await
        .expect("Failed to insert sport");
    id
}

pub async fn seed_team(pool: &PgPool, sport_id: Uuid, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO teams (id, team_name, sport_id, created_at, updated_at)
         VALUES ($1, $2, $3, NOW(), NOW())",
    )
    .bind(id)
    .bind(name)
    .bind(sport_id)
    .execute(pool)
    .await
    .expect("Failed to insert team");
    id
}

pub async fn seed_player(pool: &PgPool, team_id: Uuid, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO players (id, player_name, team_id, created_at, updated_at)
         VALUES ($1, $2, $3, NOW(), NOW())",
    )
    .bind(id)
    .bind(name)
    .bind(team_id)
    .execute(pool)
    .await
    .expect("Failed to insert player");
    id
}

/// Create a match through the API and return its id.
pub async fn create_match(
    app: &TestApp,
    token: &str,
    sport_id: Uuid,
    team_a_id: Uuid,
    team_b_id: Uuid,
) -> Uuid {
    let response = Client::new()
        .post(format!("{}/matches", app.address))
        .bearer_auth(token)
        .json(&json!({
            "sport_id": sport_id,
            "team_a_id": team_a_id,
            "team_b_id": team_b_id,
            "start_time": chrono::Utc::now(),
            "venue": "Main Ground"
        }))
        .send()
        .await
        .expect("Failed to create match");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Invalid create response");
    body["data"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("No match id in response")
}

pub async fn start_match(app: &TestApp, token: &str, match_id: Uuid) {
    let response = Client::new()
        .post(format!("{}/scorer/matches/{}/start", app.address, match_id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to start match");
    assert!(response.status().is_success());
}
