use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    client::ClientError,
    errors::ErrorResponse,
    games::math_quiz::{Question, QuestionMode},
    models::{
        LeaderboardEntry, User,
        response::{CountResponse, HealthResponse, MessageResponse, RankResponse},
    },
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` points at the API root, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn create_user(&self, name: &str) -> Result<User, ClientError> {
        self.send(self.http.post(self.url("/users")).json(&json!({ "name": name })))
            .await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, ClientError> {
        self.send(self.http.get(self.url(&format!("/users/{user_id}"))))
            .await
    }

    pub async fn update_user_stats(
        &self,
        user_id: &str,
        correct: bool,
        xp_gained: i64,
    ) -> Result<User, ClientError> {
        self.send(
            self.http
                .put(self.url(&format!("/users/{user_id}/stats")))
                .json(&json!({ "correct": correct, "xpGained": xp_gained })),
        )
        .await
    }

    pub async fn get_leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, ClientError> {
        self.send(
            self.http
                .get(self.url("/leaderboard"))
                .query(&[("limit", limit)]),
        )
        .await
    }

    pub async fn get_user_rank(&self, user_id: &str) -> Result<i64, ClientError> {
        let response: RankResponse = self
            .send(self.http.get(self.url(&format!("/users/{user_id}/rank"))))
            .await?;
        Ok(response.rank)
    }

    pub async fn reset_user(&self, user_id: &str) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .send(self.http.put(self.url(&format!("/users/{user_id}/reset"))))
            .await?;
        Ok(())
    }

    pub async fn get_user_count(&self) -> Result<i64, ClientError> {
        let response: CountResponse = self.send(self.http.get(self.url("/users/count"))).await?;
        Ok(response.count)
    }

    pub async fn health_check(&self) -> Result<HealthResponse, ClientError> {
        self.send(self.http.get(self.url("/health"))).await
    }

    pub async fn get_question(&self, mode: QuestionMode) -> Result<Question, ClientError> {
        self.send(
            self.http
                .get(self.url("/quiz/question"))
                .query(&[("mode", mode.to_string())]),
        )
        .await
    }
}
