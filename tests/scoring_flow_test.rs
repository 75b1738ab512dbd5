mod common;

use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use common::utils::{
    create_match, create_user_and_login, seed_player, seed_sport, seed_team, spawn_app,
    start_match, TestApp,
};

async fn player_stats(app: &TestApp, match_id: Uuid, player_id: Uuid) -> serde_json::Value {
    sqlx::query_scalar::<_, serde_json::Value>(
        "SELECT performance_stats FROM match_players WHERE match_id = $1 AND player_id = $2",
    )
    .bind(match_id)
    .bind(player_id)
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to load player stats")
}

async fn get_match_data(app: &TestApp, token: &str, match_id: Uuid) -> serde_json::Value {
    let response = Client::new()
        .get(format!("{}/matches/{}", app.address, match_id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to fetch match");
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    body["data"].clone()
}

#[tokio::test]
async fn cricket_over_accumulates_and_undoes() {
    let app = spawn_app().await;
    let token = create_user_and_login(&app, "scorer").await;
    let client = Client::new();

    let sport_id = seed_sport(&app.db_pool, "Cricket", "cricket").await;
    let team_a = seed_team(&app.db_pool, sport_id, "Team A").await;
    let team_b = seed_team(&app.db_pool, sport_id, "Team B").await;
    let striker = seed_player(&app.db_pool, team_a, "Striker").await;
    let non_striker = seed_player(&app.db_pool, team_a, "Non-striker").await;
    let bowler = seed_player(&app.db_pool, team_b, "Bowler").await;

    let match_id = create_match(&app, &token, sport_id, team_a, team_b).await;
    start_match(&app, &token, match_id).await;

    let submit = |runs: i64, extras: i64, extra_type: Option<&str>, wicket: Option<&str>| {
        let mut body = json!({
            "runs": runs,
            "extras": extras,
            "is_wicket": wicket.is_some(),
            "batting_team_id": team_a,
            "striker_id": striker,
            "non_striker_id": non_striker,
            "bowler_id": bowler
        });
        if let Some(extra_type) = extra_type {
            body["extra_type"] = json!(extra_type);
        }
        if let Some(wicket_type) = wicket {
            body["wicket_type"] = json!(wicket_type);
        }
        body
    };

    // Boundary, wide, two, bowled, boundary.
    let balls = [
        submit(4, 0, None, None),
        submit(0, 1, Some("wide"), None),
        submit(2, 0, None, None),
        submit(0, 0, None, Some("bowled")),
        submit(4, 0, None, None),
    ];
    for ball in &balls {
        let response = client
            .put(format!("{}/matches/{}/score/cricket", app.address, match_id))
            .bearer_auth(&token)
            .json(ball)
            .send()
            .await
            .expect("Failed to submit ball");
        assert!(response.status().is_success());
    }

    let data = get_match_data(&app, &token, match_id).await;
    let team_score = &data["score_details"][team_a.to_string()];
    assert_eq!(team_score["runs"], 11);
    assert_eq!(team_score["wickets"], 1);
    assert_eq!(team_score["balls"], 4);
    assert_eq!(team_score["overs"], "0.4");
    assert_eq!(data["match_events"].as_array().unwrap().len(), 5);

    let batting = player_stats(&app, match_id, striker).await;
    assert_eq!(batting["runs"], 10);
    assert_eq!(batting["balls_faced"], 4);
    assert_eq!(batting["fours"], 2);

    let bowling = player_stats(&app, match_id, bowler).await;
    assert_eq!(bowling["balls_bowled"], 4);
    assert_eq!(bowling["runs_conceded"], 11);
    assert_eq!(bowling["wides"], 1);
    assert_eq!(bowling["wickets"], 1);

    // Undo the last boundary.
    let response = client
        .post(format!("{}/matches/{}/undo", app.address, match_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to undo");
    assert!(response.status().is_success());

    let data = get_match_data(&app, &token, match_id).await;
    let team_score = &data["score_details"][team_a.to_string()];
    assert_eq!(team_score["runs"], 7);
    assert_eq!(team_score["balls"], 3);
    assert_eq!(team_score["overs"], "0.3");
    assert_eq!(data["match_events"].as_array().unwrap().len(), 4);

    let batting = player_stats(&app, match_id, striker).await;
    assert_eq!(batting["runs"], 6);
    assert_eq!(batting["fours"], 1);
}

#[tokio::test]
async fn strike_rotates_on_odd_runs() {
    let app = spawn_app().await;
    let token = create_user_and_login(&app, "scorer").await;
    let client = Client::new();

    let sport_id = seed_sport(&app.db_pool, "Cricket", "cricket").await;
    let team_a = seed_team(&app.db_pool, sport_id, "Team A").await;
    let team_b = seed_team(&app.db_pool, sport_id, "Team B").await;
    let striker = seed_player(&app.db_pool, team_a, "Striker").await;
    let non_striker = seed_player(&app.db_pool, team_a, "Non-striker").await;

    let match_id = create_match(&app, &token, sport_id, team_a, team_b).await;
    start_match(&app, &token, match_id).await;

    let response = client
        .put(format!("{}/matches/{}/score/cricket", app.address, match_id))
        .bearer_auth(&token)
        .json(&json!({
            "runs": 1,
            "batting_team_id": team_a,
            "striker_id": striker,
            "non_striker_id": non_striker
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let data = get_match_data(&app, &token, match_id).await;
    assert_eq!(data["match_state"]["striker_id"], non_striker.to_string());
    assert_eq!(data["match_state"]["non_striker_id"], striker.to_string());
}

#[tokio::test]
async fn standard_score_accumulates_and_undo_keeps_player_stats() {
    let app = spawn_app().await;
    let token = create_user_and_login(&app, "scorer").await;
    let client = Client::new();

    let sport_id = seed_sport(&app.db_pool, "Football", "standard").await;
    let team_a = seed_team(&app.db_pool, sport_id, "Team A").await;
    let team_b = seed_team(&app.db_pool, sport_id, "Team B").await;
    let forward = seed_player(&app.db_pool, team_a, "Forward").await;

    let match_id = create_match(&app, &token, sport_id, team_a, team_b).await;
    start_match(&app, &token, match_id).await;

    let response = client
        .put(format!("{}/matches/{}/score", app.address, match_id))
        .bearer_auth(&token)
        .json(&json!({
            "points": 1,
            "team_id": team_a,
            "player_id": forward,
            "event_type": "goal"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // A zero-point event still counts once for the player.
    let response = client
        .put(format!("{}/matches/{}/score", app.address, match_id))
        .bearer_auth(&token)
        .json(&json!({
            "team_id": team_a,
            "player_id": forward,
            "event_type": "yellow_card"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let data = get_match_data(&app, &token, match_id).await;
    assert_eq!(data["score_details"][team_a.to_string()]["score"], 1);

    let stats = player_stats(&app, match_id, forward).await;
    assert_eq!(stats["goal"], 1);
    assert_eq!(stats["yellow_card"], 1);

    // Undo reverses the team score only; the player counter stays.
    let response = client
        .post(format!("{}/matches/{}/undo", app.address, match_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let data = get_match_data(&app, &token, match_id).await;
    assert_eq!(data["score_details"][team_a.to_string()]["score"], 1);
    let stats = player_stats(&app, match_id, forward).await;
    assert_eq!(stats["yellow_card"], 1);
}

#[tokio::test]
async fn rejected_event_leaves_no_partial_state() {
    let app = spawn_app().await;
    let token = create_user_and_login(&app, "scorer").await;
    let client = Client::new();

    let sport_id = seed_sport(&app.db_pool, "Football", "standard").await;
    let team_a = seed_team(&app.db_pool, sport_id, "Team A").await;
    let team_b = seed_team(&app.db_pool, sport_id, "Team B").await;
    let forward = seed_player(&app.db_pool, team_a, "Forward").await;

    let match_id = create_match(&app, &token, sport_id, team_a, team_b).await;
    start_match(&app, &token, match_id).await;

    let response = client
        .put(format!("{}/matches/{}/score", app.address, match_id))
        .bearer_auth(&token)
        .json(&json!({
            "points": 1,
            "team_id": team_a,
            "player_id": forward,
            "event_type": "goal"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // A cricket delivery against a standard-scored team is rejected.
    let response = client
        .put(format!("{}/matches/{}/score/cricket", app.address, match_id))
        .bearer_auth(&token)
        .json(&json!({
            "runs": 4,
            "batting_team_id": team_a,
            "striker_id": forward
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);

    // Nothing from the rejected call is visible: aggregate, ledger and
    // player counters all keep their pre-call values.
    let data = get_match_data(&app, &token, match_id).await;
    let team_score = &data["score_details"][team_a.to_string()];
    assert_eq!(team_score["score"], 1);
    assert!(team_score.get("runs").is_none());
    assert_eq!(data["match_events"].as_array().unwrap().len(), 1);

    let stats = player_stats(&app, match_id, forward).await;
    assert_eq!(stats["goal"], 1);
    assert!(stats.get("runs").is_none());
    assert!(stats.get("balls_faced").is_none());
}

#[tokio::test]
async fn undo_on_empty_ledger_conflicts() {
    let app = spawn_app().await;
    let token = create_user_and_login(&app, "scorer").await;

    let sport_id = seed_sport(&app.db_pool, "Football", "standard").await;
    let team_a = seed_team(&app.db_pool, sport_id, "Team A").await;
    let team_b = seed_team(&app.db_pool, sport_id, "Team B").await;
    let match_id = create_match(&app, &token, sport_id, team_a, team_b).await;
    start_match(&app, &token, match_id).await;

    let response = reqwest::Client::new()
        .post(format!("{}/matches/{}/undo", app.address, match_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn mixed_event_endpoint_routes_by_tag() {
    let app = spawn_app().await;
    let token = create_user_and_login(&app, "scorer").await;
    let client = Client::new();

    let sport_id = seed_sport(&app.db_pool, "Basketball", "standard").await;
    let team_a = seed_team(&app.db_pool, sport_id, "Team A").await;
    let team_b = seed_team(&app.db_pool, sport_id, "Team B").await;
    let match_id = create_match(&app, &token, sport_id, team_a, team_b).await;
    start_match(&app, &token, match_id).await;

    let response = client
        .post(format!("{}/matches/{}/event", app.address, match_id))
        .bearer_auth(&token)
        .json(&json!({
            "type": "score",
            "points": 3,
            "team_id": team_a
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let data = get_match_data(&app, &token, match_id).await;
    assert_eq!(data["score_details"][team_a.to_string()]["score"], 3);
}

#[tokio::test]
async fn viewer_cannot_score() {
    let app = spawn_app().await;
    let scorer_token = create_user_and_login(&app, "scorer").await;
    let viewer_token = create_user_and_login(&app, "viewer").await;

    let sport_id = seed_sport(&app.db_pool, "Football", "standard").await;
    let team_a = seed_team(&app.db_pool, sport_id, "Team A").await;
    let team_b = seed_team(&app.db_pool, sport_id, "Team B").await;
    let match_id = create_match(&app, &scorer_token, sport_id, team_a, team_b).await;
    start_match(&app, &scorer_token, match_id).await;

    let response = reqwest::Client::new()
        .put(format!("{}/matches/{}/score", app.address, match_id))
        .bearer_auth(&viewer_token)
        .json(&json!({ "points": 1, "team_id": team_a }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn completed_match_rejects_scoring() {
    let app = spawn_app().await;
    let token = create_user_and_login(&app, "scorer").await;
    let client = Client::new();

    let sport_id = seed_sport(&app.db_pool, "Football", "standard").await;
    let team_a = seed_team(&app.db_pool, sport_id, "Team A").await;
    let team_b = seed_team(&app.db_pool, sport_id, "Team B").await;
    let match_id = create_match(&app, &token, sport_id, team_a, team_b).await;
    start_match(&app, &token, match_id).await;

    let response = client
        .post(format!("{}/scorer/matches/{}/end", app.address, match_id))
        .bearer_auth(&token)
        .json(&json!({ "winner_team_id": team_a }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .put(format!("{}/matches/{}/score", app.address, match_id))
        .bearer_auth(&token)
        .json(&json!({ "points": 1, "team_id": team_a }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 409);
}
