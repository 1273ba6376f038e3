pub mod leaderboard;
pub mod user;

use chrono::{DateTime, Utc};
use sqlx::{
    FromRow,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use std::{str::FromStr, time::Duration};

use crate::{
    errors::AppError,
    models::user::{calculate_accuracy, name_key},
    state::DbPool,
};

const USERS_TABLE_COLUMNS: &str = "(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        name_key TEXT NOT NULL UNIQUE,
        xp INTEGER NOT NULL DEFAULT 0,
        total_questions INTEGER NOT NULL DEFAULT 0,
        correct_answers INTEGER NOT NULL DEFAULT 0,
        accuracy INTEGER NOT NULL DEFAULT 0,
        last_played TEXT NOT NULL,
        created_at TEXT NOT NULL
    )";

const SCHEMA: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_users_ranking ON users (xp DESC, accuracy DESC)",
    // Nothing reads or writes sessions yet
    "CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        user_id TEXT,
        created_at TEXT,
        FOREIGN KEY (user_id) REFERENCES users (id)
    )",
];

pub async fn connect(database_url: &str, max_connections: u32) -> Result<DbPool, AppError> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::EnvError(format!("Invalid DATABASE_URL: {}", e)))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    // Every in-memory connection is its own database, so pin exactly one
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to open database: {}", e)))?;

    tracing::info!("Connected to SQLite database at {}", database_url);

    Ok(pool)
}

/// Row shape of a `users` table created before `name_key` existed.
#[derive(FromRow)]
struct LegacyUserRow {
    id: String,
    name: String,
    xp: i64,
    total_questions: i64,
    correct_answers: i64,
    last_played: Option<String>,
    created_at: Option<String>,
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

async fn needs_name_key_migration(pool: &DbPool) -> Result<bool, AppError> {
    let (columns, has_key): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(name = 'name_key'), 0) FROM pragma_table_info('users')",
    )
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to inspect users table: {}", e)))?;

    Ok(columns > 0 && has_key == 0)
}

/// Rebuilds a legacy `users` table into the current shape.
///
/// Keys are computed with the same `name_key` the service uses. When two legacy
/// rows share a key the oldest one is kept. Accuracy is recomputed from the
/// counters, which also turns legacy REAL accuracy values into integers.
async fn migrate_legacy_users(pool: &DbPool) -> Result<(), AppError> {
    let db_err = |context: &str, e: sqlx::Error| {
        AppError::DatabaseError(format!("Failed to migrate users ({}): {}", context, e))
    };

    let mut tx = pool.begin().await.map_err(|e| db_err("begin", e))?;

    sqlx::query(&format!("CREATE TABLE users_next {USERS_TABLE_COLUMNS}"))
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("create", e))?;

    let legacy = sqlx::query_as::<_, LegacyUserRow>(
        "SELECT id, name,
            CAST(COALESCE(xp, 0) AS INTEGER) AS xp,
            CAST(COALESCE(total_questions, 0) AS INTEGER) AS total_questions,
            CAST(COALESCE(correct_answers, 0) AS INTEGER) AS correct_answers,
            last_played, created_at
        FROM users
        ORDER BY created_at, rowid",
    )
    .fetch_all(&mut *tx)
    .await
    .map_err(|e| db_err("read", e))?;

    let now = Utc::now();
    let mut skipped = 0;
    for row in &legacy {
        let created_at = parse_timestamp(row.created_at.as_deref()).unwrap_or(now);
        let last_played = parse_timestamp(row.last_played.as_deref()).unwrap_or(created_at);

        let result = sqlx::query(
            "INSERT INTO users_next (id, name, name_key, xp, total_questions, correct_answers, accuracy, last_played, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (name_key) DO NOTHING",
        )
        .bind(&row.id)
        .bind(row.name.trim())
        .bind(name_key(&row.name))
        .bind(row.xp)
        .bind(row.total_questions)
        .bind(row.correct_answers)
        .bind(calculate_accuracy(row.correct_answers, row.total_questions))
        .bind(last_played)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("copy", e))?;

        if result.rows_affected() == 0 {
            tracing::warn!("Skipping duplicate legacy user '{}' (ID: {})", row.name, row.id);
            skipped += 1;
        }
    }

    sqlx::query("DROP TABLE users")
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("drop", e))?;
    sqlx::query("ALTER TABLE users_next RENAME TO users")
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("rename", e))?;

    tx.commit().await.map_err(|e| db_err("commit", e))?;

    tracing::info!(
        "Migrated {} legacy users ({} duplicates skipped)",
        legacy.len() - skipped,
        skipped
    );

    Ok(())
}

pub async fn init_schema(pool: &DbPool) -> Result<(), AppError> {
    if needs_name_key_migration(pool).await? {
        migrate_legacy_users(pool).await?;
    }

    sqlx::query(&format!("CREATE TABLE IF NOT EXISTS users {USERS_TABLE_COLUMNS}"))
        .execute(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create schema: {}", e)))?;

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create schema: {}", e)))?;
    }

    Ok(())
}
