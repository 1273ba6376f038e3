use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    db::leaderboard::get_leaderboard, errors::ApiResult, models::LeaderboardEntry,
    state::AppState,
};

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<String>,
}

/// Reads the leading integer of `raw`, so `"5abc"` is 5 and `"abc"` is nothing.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Too many digits for i64 still means "very large"
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Unparseable or non-positive limits fall back to the default.
pub fn resolve_limit(raw: Option<&str>) -> i64 {
    raw.and_then(leading_integer)
        .filter(|&limit| limit > 0)
        .map(|limit| limit.min(MAX_LEADERBOARD_LIMIT))
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
}

pub async fn get_leaderboard_handler(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Vec<LeaderboardEntry>> {
    let limit = resolve_limit(query.limit.as_deref());

    let leaderboard = get_leaderboard(limit, state.db).await.map_err(|e| {
        tracing::error!("Failed to get leaderboard: {}", e);
        e.to_response()
    })?;

    Ok(Json(leaderboard))
}
