//! Typed client for the leaderboard API and the per-player session built on it.

pub mod api;
pub mod session;

use thiserror::Error;

pub use api::ApiClient;
pub use session::{SessionStore, UserSession};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Cache error: {0}")]
    Cache(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
