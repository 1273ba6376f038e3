use chrono::Utc;

use crate::{
    db::user::USER_COLUMNS,
    errors::AppError,
    models::{
        User,
        user::{MAX_NAME_LEN, name_key},
    },
    state::DbPool,
};

/// Finds the user with this name (ignoring case) or creates a fresh one.
///
/// The insert and the conflict check are a single statement guarded by the
/// unique `name_key` column, so two concurrent calls with the same name end
/// up on the same row.
pub async fn create_or_get_user(name: String, pool: DbPool) -> Result<User, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Name is required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }

    let key = name_key(trimmed);
    let user = User::new(trimmed.to_string(), Utc::now());

    let insert_sql = format!(
        "INSERT INTO users (id, name, name_key, xp, total_questions, correct_answers, accuracy, last_played, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (name_key) DO NOTHING
        RETURNING {USER_COLUMNS}"
    );

    let inserted = sqlx::query_as::<_, User>(&insert_sql)
        .bind(&user.id)
        .bind(&user.name)
        .bind(&key)
        .bind(user.xp)
        .bind(user.total_questions)
        .bind(user.correct_answers)
        .bind(user.accuracy)
        .bind(user.last_played)
        .bind(user.created_at)
        .fetch_optional(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create user: {}", e)))?;

    if let Some(created) = inserted {
        tracing::info!("Created user '{}' (ID: {})", created.name, created.id);
        return Ok(created);
    }

    let select_sql = format!("SELECT {USER_COLUMNS} FROM users WHERE name_key = ?");
    let existing = sqlx::query_as::<_, User>(&select_sql)
        .bind(&key)
        .fetch_one(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch existing user: {}", e)))?;

    tracing::info!("Returning existing user '{}' (ID: {})", existing.name, existing.id);

    Ok(existing)
}
