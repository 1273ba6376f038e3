use crate::{db::user::USER_COLUMNS, errors::AppError, models::User, state::DbPool};

pub async fn get_user_by_id(user_id: &str, pool: DbPool) -> Result<User, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");

    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .fetch_optional(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user: {}", e)))?;

    user.ok_or_else(|| AppError::NotFound("User not found".into()))
}

pub async fn count_users(pool: DbPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count users: {}", e)))?;

    Ok(count)
}
