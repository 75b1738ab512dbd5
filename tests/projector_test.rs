use chrono::Utc;
use uuid::Uuid;

use meet_scoring_backend::models::match_events::{
    DeliveryEvent, ExtraType, MatchEvent, ScoreEvent, WicketType,
};
use meet_scoring_backend::models::scoring::{
    CricketScore, MatchState, PerformanceStats, StandardScore,
};
use meet_scoring_backend::scoring::{cricket, fold_events, standard};

fn ball(team: Uuid, runs: i64) -> DeliveryEvent {
    DeliveryEvent {
        timestamp: Utc::now(),
        batting_team_id: team,
        runs,
        extras: 0,
        extra_type: None,
        is_wicket: false,
        wicket_type: None,
        striker_id: None,
        non_striker_id: None,
        bowler_id: None,
        overs: String::new(),
        commentary: String::new(),
    }
}

#[test]
fn over_notation_counts_in_base_six() {
    assert_eq!(cricket::to_over_notation(0), "0.0");
    assert_eq!(cricket::to_over_notation(5), "0.5");
    assert_eq!(cricket::to_over_notation(6), "1.0");
    assert_eq!(cricket::to_over_notation(9), "1.3");
    assert_eq!(cricket::to_over_notation(31), "5.1");
}

#[test]
fn boundary_updates_team_aggregate() {
    let team = Uuid::new_v4();
    let mut score = CricketScore::default();

    cricket::apply_to_team(&mut score, &ball(team, 4));

    assert_eq!(score.runs, 4);
    assert_eq!(score.wickets, 0);
    assert_eq!(score.balls, 1);
    assert_eq!(score.overs, "0.1");
}

#[test]
fn wide_scores_runs_but_no_ball() {
    let team = Uuid::new_v4();
    let mut score = CricketScore::default();

    let mut wide = ball(team, 0);
    wide.extras = 1;
    wide.extra_type = Some(ExtraType::Wide);
    cricket::apply_to_team(&mut score, &wide);

    assert_eq!(score.runs, 1);
    assert_eq!(score.balls, 0);
    assert_eq!(score.overs, "0.0");
}

#[test]
fn revert_is_exact_inverse_of_apply() {
    let team = Uuid::new_v4();
    let mut score = CricketScore::default();
    let mut wicket_ball = ball(team, 2);
    wicket_ball.is_wicket = true;
    wicket_ball.wicket_type = Some(WicketType::Caught);

    let before = score.clone();
    cricket::apply_to_team(&mut score, &wicket_ball);
    cricket::revert_from_team(&mut score, &wicket_ball);

    assert_eq!(score, before);
}

#[test]
fn odd_runs_rotate_strike() {
    let team = Uuid::new_v4();
    let striker = Uuid::new_v4();
    let non_striker = Uuid::new_v4();
    let mut state = MatchState::default();

    let mut single = ball(team, 1);
    single.striker_id = Some(striker);
    single.non_striker_id = Some(non_striker);
    cricket::update_match_state(&mut state, &single);

    assert_eq!(state.striker_id, Some(non_striker));
    assert_eq!(state.non_striker_id, Some(striker));
}

#[test]
fn even_runs_keep_strike() {
    let team = Uuid::new_v4();
    let striker = Uuid::new_v4();
    let non_striker = Uuid::new_v4();
    let mut state = MatchState::default();

    let mut double = ball(team, 2);
    double.striker_id = Some(striker);
    double.non_striker_id = Some(non_striker);
    cricket::update_match_state(&mut state, &double);

    assert_eq!(state.striker_id, Some(striker));
    assert_eq!(state.non_striker_id, Some(non_striker));
}

#[test]
fn odd_extras_alone_do_not_rotate_strike() {
    let team = Uuid::new_v4();
    let striker = Uuid::new_v4();
    let non_striker = Uuid::new_v4();
    let mut state = MatchState::default();

    let mut wide = ball(team, 0);
    wide.extras = 1;
    wide.extra_type = Some(ExtraType::Wide);
    wide.striker_id = Some(striker);
    wide.non_striker_id = Some(non_striker);
    cricket::update_match_state(&mut state, &wide);

    assert_eq!(state.striker_id, Some(striker));
}

#[test]
fn wide_does_not_count_as_ball_faced() {
    let team = Uuid::new_v4();
    let mut stats = PerformanceStats::default();

    let mut wide = ball(team, 0);
    wide.extras = 1;
    wide.extra_type = Some(ExtraType::Wide);
    cricket::apply_to_striker(&mut stats, &wide);

    assert_eq!(stats.get("balls_faced"), 0);

    cricket::apply_to_striker(&mut stats, &ball(team, 4));
    assert_eq!(stats.get("balls_faced"), 1);
    assert_eq!(stats.get("runs"), 4);
    assert_eq!(stats.get("fours"), 1);
}

#[test]
fn bowler_charged_for_wide_extras_only() {
    let team = Uuid::new_v4();
    let mut stats = PerformanceStats::default();

    // Byes are not charged to the bowler.
    let mut bye = ball(team, 0);
    bye.extras = 2;
    bye.extra_type = Some(ExtraType::Bye);
    cricket::apply_to_bowler(&mut stats, &bye);
    assert_eq!(stats.get("runs_conceded"), 0);
    assert_eq!(stats.get("balls_bowled"), 1);

    let mut wide = ball(team, 0);
    wide.extras = 1;
    wide.extra_type = Some(ExtraType::Wide);
    cricket::apply_to_bowler(&mut stats, &wide);
    assert_eq!(stats.get("runs_conceded"), 1);
    assert_eq!(stats.get("wides"), 1);
    assert_eq!(stats.get("balls_bowled"), 1);
}

#[test]
fn runout_gives_bowler_no_wicket_credit() {
    let team = Uuid::new_v4();
    let mut stats = PerformanceStats::default();

    let mut runout = ball(team, 1);
    runout.is_wicket = true;
    runout.wicket_type = Some(WicketType::RunOut);
    cricket::apply_to_bowler(&mut stats, &runout);
    assert_eq!(stats.get("wickets"), 0);

    let mut bowled = ball(team, 0);
    bowled.is_wicket = true;
    bowled.wicket_type = Some(WicketType::Bowled);
    cricket::apply_to_bowler(&mut stats, &bowled);
    assert_eq!(stats.get("wickets"), 1);
}

#[test]
fn standard_zero_point_event_still_counts_for_player() {
    let mut stats = PerformanceStats::default();

    standard::apply_to_player(&mut stats, "goals", 2);
    assert_eq!(stats.get("goals"), 2);

    standard::apply_to_player(&mut stats, "yellow_cards", 0);
    assert_eq!(stats.get("yellow_cards"), 1);
}

#[test]
fn standard_team_score_adds_points_exactly() {
    let mut score = StandardScore::default();
    standard::apply_to_team(&mut score, 3);
    standard::apply_to_team(&mut score, 0);
    assert_eq!(score.score, 3);

    standard::revert_from_team(&mut score, 3);
    assert_eq!(score.score, 0);
}

#[test]
fn counter_key_defaults_to_points() {
    assert_eq!(standard::player_counter_key(Some("goal")), "goal");
    assert_eq!(standard::player_counter_key(Some("")), "points");
    assert_eq!(standard::player_counter_key(None), "points");
}

#[test]
fn fold_replays_five_ball_fixture() {
    let team = Uuid::new_v4();
    let mut events: Vec<MatchEvent> = Vec::new();

    events.push(MatchEvent::Delivery(ball(team, 4)));

    let mut wide = ball(team, 0);
    wide.extras = 1;
    wide.extra_type = Some(ExtraType::Wide);
    events.push(MatchEvent::Delivery(wide));

    events.push(MatchEvent::Delivery(ball(team, 2)));

    let mut bowled = ball(team, 0);
    bowled.is_wicket = true;
    bowled.wicket_type = Some(WicketType::Bowled);
    events.push(MatchEvent::Delivery(bowled));

    events.push(MatchEvent::Delivery(ball(team, 4)));

    let details = fold_events(&events);
    let score = match details.team(&team) {
        Some(meet_scoring_backend::models::scoring::TeamScore::Cricket(score)) => score,
        other => panic!("expected a cricket aggregate, got {:?}", other),
    };

    assert_eq!(score.runs, 11);
    assert_eq!(score.wickets, 1);
    assert_eq!(score.balls, 4);
    assert_eq!(score.overs, "0.4");
}

#[test]
fn fold_accumulates_standard_events_per_team() {
    let team_a = Uuid::new_v4();
    let team_b = Uuid::new_v4();
    let score_event = |team: Uuid, points: i64| {
        MatchEvent::Score(ScoreEvent {
            timestamp: Utc::now(),
            team_id: team,
            player_id: None,
            points,
            event_type: "goal".to_string(),
            details: None,
            score_before: 0,
            score_after: points,
        })
    };

    let details = fold_events(&[
        score_event(team_a, 1),
        score_event(team_b, 2),
        score_event(team_a, 1),
    ]);

    match details.team(&team_a) {
        Some(meet_scoring_backend::models::scoring::TeamScore::Standard(s)) => {
            assert_eq!(s.score, 2)
        }
        other => panic!("expected a standard aggregate, got {:?}", other),
    }
    match details.team(&team_b) {
        Some(meet_scoring_backend::models::scoring::TeamScore::Standard(s)) => {
            assert_eq!(s.score, 2)
        }
        other => panic!("expected a standard aggregate, got {:?}", other),
    }
}
