use chrono::Utc;

use crate::{db::user::USER_COLUMNS, errors::AppError, models::User, state::DbPool};

pub async fn update_user_stats(
    user_id: &str,
    correct: bool,
    xp_gained: i64,
    pool: DbPool,
) -> Result<User, AppError> {
    if xp_gained < 0 {
        return Err(AppError::BadRequest("xpGained must not be negative".into()));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to start transaction: {}", e)))?;

    // Writing first takes the write lock before anything is read.
    // SQLite promotes an overflowing INTEGER sum to REAL, so the guard keeps xp in i64.
    let increment_sql = format!(
        "UPDATE users
        SET total_questions = total_questions + 1,
            correct_answers = correct_answers + ?,
            xp = xp + ?,
            last_played = ?
        WHERE id = ? AND xp <= ? - ?
        RETURNING {USER_COLUMNS}"
    );

    let updated = sqlx::query_as::<_, User>(&increment_sql)
        .bind(i64::from(correct))
        .bind(xp_gained)
        .bind(Utc::now())
        .bind(user_id)
        .bind(i64::MAX)
        .bind(xp_gained)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update user stats: {}", e)))?;

    let mut user = match updated {
        Some(user) => user,
        None => {
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to look up user: {}", e)))?
                > 0;

            return Err(if exists {
                AppError::BadRequest("xpGained is too large".into())
            } else {
                AppError::NotFound("User not found".into())
            });
        }
    };

    user.refresh_accuracy();

    sqlx::query("UPDATE users SET accuracy = ? WHERE id = ?")
        .bind(user.accuracy)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update accuracy: {}", e)))?;

    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit user stats: {}", e)))?;

    tracing::info!(
        "Updated stats for {}: correct={}, xp_gained={}, accuracy={}",
        user_id,
        correct,
        xp_gained,
        user.accuracy
    );

    Ok(user)
}

pub async fn reset_user(user_id: &str, pool: DbPool) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE users
        SET xp = 0, total_questions = 0, correct_answers = 0, accuracy = 0, last_played = ?
        WHERE id = ?",
    )
    .bind(Utc::now())
    .bind(user_id)
    .execute(&pool)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to reset user data: {}", e)))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    tracing::info!("Reset stats for user {}", user_id);

    Ok(())
}
