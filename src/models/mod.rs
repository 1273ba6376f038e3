pub mod leaderboard;
pub mod response;
pub mod user;

pub use leaderboard::LeaderboardEntry;
pub use user::User;
