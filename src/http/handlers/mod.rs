pub mod health;
pub mod leaderboard;
pub mod quiz;
pub mod user;

pub use health::{health_handler, not_found_handler};
pub use leaderboard::get_leaderboard_handler;
pub use quiz::get_question_handler;
pub use user::{
    create_user_handler, get_user_count_handler, get_user_handler, get_user_rank_handler,
    reset_user_handler, update_user_stats_handler,
};
