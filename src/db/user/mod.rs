pub mod get;
pub mod post;
pub mod put;

pub use get::{count_users, get_user_by_id};
pub use post::create_or_get_user;
pub use put::{reset_user, update_user_stats};

pub(crate) const USER_COLUMNS: &str =
    "id, name, xp, total_questions, correct_answers, accuracy, last_played, created_at";
