use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    client::{ApiClient, ClientError},
    models::{LeaderboardEntry, User},
};

pub const CURRENT_USER_KEY: &str = "mathmentor_current_user";

/// Last-known copy of the current user, kept as a JSON file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CURRENT_USER_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Option<User>, ClientError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the user, or removes the file when there is none.
    pub async fn save(&self, user: Option<&User>) -> Result<(), ClientError> {
        match user {
            Some(user) => {
                let json = serde_json::to_vec(user)?;
                tokio::fs::write(&self.path, json).await?;
            }
            None => match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }
}

/// The player currently signed in, passed explicitly to whatever needs it.
///
/// Mutating calls refresh the cached user only when the API call succeeds;
/// on failure the previous state is left untouched and the error returned.
/// Read-only leaderboard queries never fail: they log and fall back to an
/// empty list or zero.
#[derive(Debug)]
pub struct UserSession {
    api: ApiClient,
    store: SessionStore,
    current: Option<User>,
}

impl UserSession {
    pub async fn load(api: ApiClient, store: SessionStore) -> Self {
        let current = store.load().await.unwrap_or_else(|e| {
            tracing::error!("Failed to load current user: {}", e);
            None
        });

        Self {
            api,
            store,
            current,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn has_user(&self) -> bool {
        self.current.is_some()
    }

    async fn set_current(&mut self, user: Option<User>) {
        self.current = user;
        if let Err(e) = self.store.save(self.current.as_ref()).await {
            tracing::error!("Failed to save current user: {}", e);
        }
    }

    pub async fn sign_in(&mut self, name: &str) -> Result<User, ClientError> {
        let user = self.api.create_user(name).await.map_err(|e| {
            tracing::error!("Failed to create user: {}", e);
            e
        })?;
        self.set_current(Some(user.clone())).await;

        Ok(user)
    }

    pub async fn record_answer(&mut self, correct: bool, xp_gained: i64) -> Result<(), ClientError> {
        let Some(user_id) = self.current.as_ref().map(|u| u.id.clone()) else {
            return Ok(());
        };

        let updated = self
            .api
            .update_user_stats(&user_id, correct, xp_gained)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update user stats: {}", e);
                e
            })?;
        self.set_current(Some(updated)).await;

        Ok(())
    }

    pub async fn reset(&mut self) -> Result<(), ClientError> {
        let Some(user_id) = self.current.as_ref().map(|u| u.id.clone()) else {
            return Ok(());
        };

        let refreshed = match self.api.reset_user(&user_id).await {
            Ok(()) => self.api.get_user(&user_id).await,
            Err(e) => Err(e),
        }
        .map_err(|e| {
            tracing::error!("Failed to reset user data: {}", e);
            e
        })?;
        self.set_current(Some(refreshed)).await;

        Ok(())
    }

    pub async fn logout(&mut self) {
        self.set_current(None).await;
    }

    pub async fn leaderboard(&self, limit: i64) -> Vec<LeaderboardEntry> {
        self.api.get_leaderboard(limit).await.unwrap_or_else(|e| {
            tracing::error!("Failed to get leaderboard: {}", e);
            Vec::new()
        })
    }

    pub async fn user_rank(&self, user_id: &str) -> i64 {
        self.api.get_user_rank(user_id).await.unwrap_or_else(|e| {
            tracing::error!("Failed to get user rank: {}", e);
            0
        })
    }

    pub async fn user_count(&self) -> i64 {
        self.api.get_user_count().await.unwrap_or_else(|e| {
            tracing::error!("Failed to get user count: {}", e);
            0
        })
    }
}
