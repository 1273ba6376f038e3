use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub xp: i64,
    pub accuracy: i64,
    pub total_questions: i64,
    #[sqlx(default)]
    pub rank: i64, // set after sorting
}
