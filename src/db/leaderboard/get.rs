use crate::{errors::AppError, models::LeaderboardEntry, state::DbPool};

pub async fn get_leaderboard(limit: i64, pool: DbPool) -> Result<Vec<LeaderboardEntry>, AppError> {
    // created_at and id only break exact ties so repeated queries agree
    let mut leaderboard = sqlx::query_as::<_, LeaderboardEntry>(
        "SELECT id, name, xp, accuracy, total_questions
        FROM users
        ORDER BY xp DESC, accuracy DESC, created_at ASC, id ASC
        LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&pool)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch leaderboard: {}", e)))?;

    for (index, entry) in leaderboard.iter_mut().enumerate() {
        entry.rank = index as i64 + 1;
    }

    Ok(leaderboard)
}

/// One more than the number of users strictly ahead: more xp, or equal xp with better accuracy.
pub async fn get_user_rank(user_id: &str, pool: DbPool) -> Result<i64, AppError> {
    let (xp, accuracy) =
        sqlx::query_as::<_, (i64, i64)>("SELECT xp, accuracy FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let ahead = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE xp > ? OR (xp = ? AND accuracy > ?)",
    )
    .bind(xp)
    .bind(xp)
    .bind(accuracy)
    .fetch_one(&pool)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to compute rank: {}", e)))?;

    Ok(ahead + 1)
}
