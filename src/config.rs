use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
            database_url: "sqlite://leaderboard.db".into(),
            db_max_connections: 5,
            allowed_origins: Vec::new(),
            rate_limit_per_minute: 1000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let rate_limit_per_minute: u32 = try_load("RATE_LIMIT_PER_MINUTE", "1000")?;
        if rate_limit_per_minute == 0 {
            return Err(AppError::EnvError(
                "RATE_LIMIT_PER_MINUTE must be greater than 0".into(),
            ));
        }

        Ok(Self {
            host: try_load("HOST", "0.0.0.0")?,
            port: try_load("PORT", "3001")?,
            database_url: try_load("DATABASE_URL", "sqlite://leaderboard.db")?,
            db_max_connections: try_load("DB_MAX_CONNECTIONS", "5")?,
            allowed_origins: parse_origins(&try_load::<String>("ALLOWED_ORIGINS", "*")?),
            rate_limit_per_minute,
        })
    }
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(String::from)
        .collect()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        AppError::EnvError(format!("Invalid {key} value '{raw}': {e}"))
    })
}
