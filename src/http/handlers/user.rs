use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::{
    db::{
        leaderboard::get_user_rank,
        user::{count_users, create_or_get_user, get_user_by_id, reset_user, update_user_stats},
    },
    errors::{ApiResult, AppError},
    models::{
        User,
        response::{CountResponse, MessageResponse, RankResponse},
    },
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateUserPayload {
    #[serde(default)]
    pub name: Option<String>,
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserPayload>, JsonRejection>,
) -> ApiResult<User> {
    let Json(payload) = payload.map_err(|e| AppError::from(e).to_response())?;
    let name = payload.name.unwrap_or_default();

    match create_or_get_user(name, state.db.clone()).await {
        Ok(user) => {
            tracing::info!("User ready: {} (ID: {})", user.name, user.id);
            Ok(Json(user))
        }
        Err(err) => {
            tracing::error!("Error creating user: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<User> {
    let user = get_user_by_id(&user_id, state.db.clone())
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving user {}: {}", user_id, e);
            e.to_response()
        })?;

    tracing::info!("Retrieved user: {:?}", user);

    Ok(Json(user))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatsPayload {
    pub correct: bool,
    pub xp_gained: i64,
}

pub async fn update_user_stats_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateStatsPayload>, JsonRejection>,
) -> ApiResult<User> {
    let Json(payload) = payload.map_err(|e| AppError::from(e).to_response())?;

    let user = update_user_stats(&user_id, payload.correct, payload.xp_gained, state.db.clone())
        .await
        .map_err(|e| {
            tracing::error!("Error updating stats for {}: {}", user_id, e);
            e.to_response()
        })?;

    Ok(Json(user))
}

pub async fn get_user_rank_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<RankResponse> {
    let rank = get_user_rank(&user_id, state.db.clone())
        .await
        .map_err(|e| {
            tracing::error!("Error computing rank for {}: {}", user_id, e);
            e.to_response()
        })?;

    Ok(Json(RankResponse { rank }))
}

pub async fn reset_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<MessageResponse> {
    reset_user(&user_id, state.db.clone()).await.map_err(|e| {
        tracing::error!("Error resetting user {}: {}", user_id, e);
        e.to_response()
    })?;

    Ok(Json(MessageResponse {
        message: "User data reset successfully".into(),
    }))
}

pub async fn get_user_count_handler(State(state): State<AppState>) -> ApiResult<CountResponse> {
    let count = count_users(state.db.clone()).await.map_err(|e| {
        tracing::error!("Error counting users: {}", e);
        e.to_response()
    })?;

    Ok(Json(CountResponse { count }))
}
