pub mod get;

pub use get::{get_leaderboard, get_user_rank};
