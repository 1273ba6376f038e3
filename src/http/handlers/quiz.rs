use axum::{Json, extract::Query};
use serde::Deserialize;

use crate::{
    errors::{ApiResult, AppError},
    games::math_quiz::{Question, QuestionMode, generate_question},
};

#[derive(Deserialize)]
pub struct QuestionQuery {
    pub mode: Option<String>,
}

pub async fn get_question_handler(Query(query): Query<QuestionQuery>) -> ApiResult<Question> {
    let mode = match query.mode.as_deref() {
        Some(raw) => raw.parse::<QuestionMode>().map_err(|e| {
            tracing::warn!("Rejected question request: {}", e);
            AppError::BadRequest(e).to_response()
        })?,
        None => QuestionMode::default(),
    };

    let question = generate_question(mode, &mut rand::rng());
    tracing::debug!("Generated {} question: {}", mode, question.operation);

    Ok(Json(question))
}
