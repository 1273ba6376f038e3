use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use mathmentor_be::{
    config::Config,
    create_app,
    games::math_quiz::{Question, QuestionKind},
    models::{LeaderboardEntry, User},
    state::AppState,
};
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

async fn create_test_app() -> Router {
    let config = Config {
        database_url: "sqlite::memory:".into(),
        ..Config::default()
    };
    let state = AppState::new(config)
        .await
        .expect("in-memory database should open");
    create_app(state)
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body)),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };

    (status, value)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_raw(app, method, uri, body.map(|b| b.to_string())).await
}

async fn create_user(app: &Router, name: &str) -> User {
    let (status, body) = send(app, "POST", "/api/users", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    serde_json::from_value(body).expect("user body")
}

async fn answer(app: &Router, user_id: &str, correct: bool, xp_gained: i64) -> User {
    let (status, body) = send(
        app,
        "PUT",
        &format!("/api/users/{user_id}/stats"),
        Some(json!({ "correct": correct, "xpGained": xp_gained })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    serde_json::from_value(body).expect("user body")
}

async fn rank_of(app: &Router, user_id: &str) -> i64 {
    let (status, body) = send(app, "GET", &format!("/api/users/{user_id}/rank"), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["rank"].as_i64().expect("numeric rank")
}

async fn leaderboard(app: &Router, query: &str) -> Vec<LeaderboardEntry> {
    let (status, body) = send(app, "GET", &format!("/api/leaderboard{query}"), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    serde_json::from_value(body).expect("leaderboard body")
}

#[tokio::test]
async fn test_new_user_answers_update_stats() {
    let app = create_test_app().await;

    let ari = create_user(&app, "Ari").await;
    assert_eq!(ari.name, "Ari");
    assert_eq!(
        (ari.xp, ari.total_questions, ari.correct_answers, ari.accuracy),
        (0, 0, 0, 0)
    );

    let ari = answer(&app, &ari.id, true, 10).await;
    assert_eq!(
        (ari.xp, ari.total_questions, ari.correct_answers, ari.accuracy),
        (10, 1, 1, 100)
    );

    let ari = answer(&app, &ari.id, false, 0).await;
    assert_eq!(
        (ari.xp, ari.total_questions, ari.correct_answers, ari.accuracy),
        (10, 2, 1, 50)
    );

    let (status, body) = send(&app, "GET", &format!("/api/users/{}", ari.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let stored: User = serde_json::from_value(body).expect("user body");
    assert_eq!(stored, ari);
}

#[tokio::test]
async fn test_create_user_is_case_insensitive() {
    let app = create_test_app().await;

    let first = create_user(&app, "Ari").await;
    let second = create_user(&app, "  aRI ").await;

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Ari");

    let (_, body) = send(&app, "GET", "/api/users/count", None).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_create_user_rejects_missing_name() {
    let app = create_test_app().await;

    let (status, body) = send(&app, "POST", "/api/users", Some(json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");

    let (status, _) = send(&app, "POST", "/api/users", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let long_name = "x".repeat(51);
    let (status, _) = send(&app, "POST", "/api/users", Some(json!({ "name": long_name }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_raw(&app, "POST", "/api/users", Some("{not json".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = create_test_app().await;

    let (status, body) = send(&app, "GET", "/api/users/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/users/missing/stats",
        Some(json!({ "correct": true, "xpGained": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PUT", "/api/users/missing/reset", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/users/missing/rank", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_stats_validates_body() {
    let app = create_test_app().await;
    let user = create_user(&app, "Validator").await;
    let uri = format!("/api/users/{}/stats", user.id);

    let invalid_bodies = [
        json!({ "correct": "yes", "xpGained": 10 }),
        json!({ "correct": true, "xpGained": "10" }),
        json!({ "correct": true }),
        json!({ "xpGained": 10 }),
        json!({ "correct": true, "xpGained": -5 }),
    ];
    for body in invalid_bodies {
        let (status, response) = send(&app, "PUT", &uri, Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body} -> {response}");
    }

    let (status, body) = send(&app, "GET", &format!("/api/users/{}", user.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalQuestions"], 0);
}

#[tokio::test]
async fn test_xp_overflow_is_rejected() {
    let app = create_test_app().await;
    let user = create_user(&app, "Hoarder").await;
    let uri = format!("/api/users/{}/stats", user.id);

    let maxed = answer(&app, &user.id, true, i64::MAX).await;
    assert_eq!(maxed.xp, i64::MAX);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "correct": true, "xpGained": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "xpGained is too large");

    let (_, body) = send(&app, "GET", &format!("/api/users/{}", user.id), None).await;
    let stored: User = serde_json::from_value(body).expect("user body");
    assert_eq!((stored.xp, stored.total_questions), (i64::MAX, 1));

    let after = answer(&app, &user.id, false, 0).await;
    assert_eq!((after.xp, after.total_questions, after.accuracy), (i64::MAX, 2, 50));
}

#[tokio::test]
async fn test_accuracy_tracks_counters() {
    let app = create_test_app().await;
    let user = create_user(&app, "Counter").await;

    let pattern = [true, false, false, true, true, false, true];
    let mut correct = 0;
    for (i, &is_correct) in pattern.iter().enumerate() {
        if is_correct {
            correct += 1;
        }
        let updated = answer(&app, &user.id, is_correct, if is_correct { 10 } else { 0 }).await;
        let total = i as i64 + 1;
        let expected = ((correct as f64 / total as f64) * 100.0).round() as i64;

        assert_eq!(updated.total_questions, total);
        assert_eq!(updated.correct_answers, correct);
        assert_eq!(updated.accuracy, expected);
        assert_eq!(updated.xp, correct * 10);
    }
}

#[tokio::test]
async fn test_reset_zeroes_stats() {
    let app = create_test_app().await;
    let user = create_user(&app, "Resetter").await;
    let played = answer(&app, &user.id, true, 15).await;

    tokio::time::sleep(Duration::from_millis(10)).await;

    let (status, body) = send(&app, "PUT", &format!("/api/users/{}/reset", user.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User data reset successfully");

    let (_, body) = send(&app, "GET", &format!("/api/users/{}", user.id), None).await;
    let reset: User = serde_json::from_value(body).expect("user body");

    assert_eq!(reset.id, user.id);
    assert_eq!(reset.created_at, user.created_at);
    assert_eq!(
        (reset.xp, reset.total_questions, reset.correct_answers, reset.accuracy),
        (0, 0, 0, 0)
    );
    assert!(reset.last_played > played.last_played);
}

#[tokio::test]
async fn test_leaderboard_limit_returns_top_user() {
    let app = create_test_app().await;
    let low = create_user(&app, "Low").await;
    let high = create_user(&app, "High").await;
    answer(&app, &low.id, true, 50).await;
    answer(&app, &high.id, true, 80).await;

    let top = leaderboard(&app, "?limit=1").await;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, high.id);
    assert_eq!(top[0].xp, 80);
    assert_eq!(top[0].rank, 1);

    let top = leaderboard(&app, "?limit=1abc").await;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, high.id);
}

#[tokio::test]
async fn test_leaderboard_orders_by_xp_then_accuracy() {
    let app = create_test_app().await;
    let sharp = create_user(&app, "Sharp").await;
    let sloppy = create_user(&app, "Sloppy").await;
    let newcomer = create_user(&app, "Newcomer").await;

    answer(&app, &sloppy.id, true, 30).await;
    answer(&app, &sloppy.id, false, 0).await;
    answer(&app, &sharp.id, true, 30).await;
    answer(&app, &newcomer.id, true, 10).await;

    let board = leaderboard(&app, "").await;
    let ids: Vec<&str> = board.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![sharp.id.as_str(), sloppy.id.as_str(), newcomer.id.as_str()]);

    let ranks: Vec<i64> = board.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert_eq!(board[1].accuracy, 50);
    assert_eq!(board[1].total_questions, 2);
}

#[tokio::test]
async fn test_leaderboard_default_limit() {
    let app = create_test_app().await;
    for i in 0..12 {
        let user = create_user(&app, &format!("Player {i}")).await;
        answer(&app, &user.id, true, i).await;
    }

    assert_eq!(leaderboard(&app, "").await.len(), 10);
    assert_eq!(leaderboard(&app, "?limit=nope").await.len(), 10);
    assert_eq!(leaderboard(&app, "?limit=12").await.len(), 12);
}

#[tokio::test]
async fn test_rank_counts_users_strictly_ahead() {
    let app = create_test_app().await;
    let leader = create_user(&app, "Leader").await;
    let chaser = create_user(&app, "Chaser").await;
    let idle = create_user(&app, "Idle").await;

    answer(&app, &leader.id, true, 40).await;
    answer(&app, &chaser.id, true, 40).await;
    answer(&app, &chaser.id, false, 0).await;

    assert_eq!(rank_of(&app, &leader.id).await, 1);
    assert_eq!(rank_of(&app, &chaser.id).await, 2);
    assert_eq!(rank_of(&app, &idle.id).await, 3);
}

#[tokio::test]
async fn test_count_and_health() {
    let app = create_test_app().await;

    let (status, body) = send(&app, "GET", "/api/users/count", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    create_user(&app, "One").await;
    create_user(&app, "Two").await;
    let (_, body) = send(&app, "GET", "/api/users/count", None).await;
    assert_eq!(body["count"], 2);

    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_quiz_question_endpoint() {
    let app = create_test_app().await;

    let (status, body) = send(&app, "GET", "/api/quiz/question?mode=geometry", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["type"], "geometry");
    assert!(body["shape"]["svgPath"].is_string());

    let question: Question = serde_json::from_value(body).expect("question body");
    assert_eq!(question.kind, QuestionKind::Geometry);
    assert_eq!(question.options.len(), 4);

    let (status, body) = send(&app, "GET", "/api/quiz/question", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["correctAnswer"].as_u64().expect("index") < 4);

    let (status, _) = send(&app, "GET", "/api/quiz/question?mode=calculus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = create_test_app().await;

    let (status, body) = send(&app, "GET", "/api/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_legacy_users_table_is_migrated() {
    let path = std::env::temp_dir().join(format!("mathmentor-legacy-{}.db", Uuid::new_v4()));

    let legacy = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true),
    )
    .await
    .expect("open legacy database");
    sqlx::query(
        "CREATE TABLE users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            xp INTEGER DEFAULT 0,
            total_questions INTEGER DEFAULT 0,
            correct_answers INTEGER DEFAULT 0,
            accuracy REAL DEFAULT 0,
            last_played TEXT,
            created_at TEXT
        )",
    )
    .execute(&legacy)
    .await
    .expect("create legacy table");
    sqlx::query(
        "INSERT INTO users VALUES
            ('lq1ari', 'Ari', 40, 3, 2, 67, '2024-01-02T10:00:00.000Z', '2024-01-01T10:00:00.000Z'),
            ('lq2ari', 'ARI', 5, 1, 1, 100, NULL, '2024-01-03T10:00:00.000Z')",
    )
    .execute(&legacy)
    .await
    .expect("seed legacy rows");
    legacy.close().await;

    let config = Config {
        database_url: format!("sqlite://{}", path.display()),
        ..Config::default()
    };
    let app = create_app(AppState::new(config).await.expect("migrated database opens"));

    let ari = create_user(&app, "ari").await;
    assert_eq!(ari.id, "lq1ari");
    assert_eq!(
        (ari.xp, ari.total_questions, ari.correct_answers, ari.accuracy),
        (40, 3, 2, 67)
    );

    let ari = answer(&app, &ari.id, true, 10).await;
    assert_eq!((ari.xp, ari.total_questions, ari.accuracy), (50, 4, 75));

    create_user(&app, "Bea").await;
    let (_, body) = send(&app, "GET", "/api/users/count", None).await;
    assert_eq!(body["count"], 2);
}
