use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub xp: i64,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub accuracy: i64,
    pub last_played: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            xp: 0,
            total_questions: 0,
            correct_answers: 0,
            accuracy: 0,
            last_played: now,
            created_at: now,
        }
    }

    pub fn refresh_accuracy(&mut self) {
        self.accuracy = calculate_accuracy(self.correct_answers, self.total_questions);
    }
}

/// Whole percentage of correct answers, rounded half up. Zero when nothing was answered.
pub fn calculate_accuracy(correct_answers: i64, total_questions: i64) -> i64 {
    if total_questions <= 0 {
        return 0;
    }

    (correct_answers * 200 + total_questions) / (total_questions * 2)
}

/// Normalized form used for case-insensitive name matching.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
