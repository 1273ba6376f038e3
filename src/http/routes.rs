use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    http::handlers::{
        create_user_handler, get_leaderboard_handler, get_question_handler,
        get_user_count_handler, get_user_handler, get_user_rank_handler, health_handler,
        reset_user_handler, update_user_stats_handler,
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/users", post(create_user_handler))
        // static segment wins over the id capture below
        .route("/api/users/count", get(get_user_count_handler))
        .route("/api/users/{user_id}", get(get_user_handler))
        .route("/api/users/{user_id}/stats", put(update_user_stats_handler))
        .route("/api/users/{user_id}/rank", get(get_user_rank_handler))
        .route("/api/users/{user_id}/reset", put(reset_user_handler))
        .route("/api/leaderboard", get(get_leaderboard_handler))
        .route("/api/quiz/question", get(get_question_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}
