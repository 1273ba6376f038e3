use axum::{Json, http::StatusCode};
use chrono::Utc;

use crate::{
    errors::{AppError, ErrorResponse},
    models::response::HealthResponse,
};

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".into(),
        timestamp: Utc::now(),
    })
}

pub async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    AppError::NotFound("Not found".into()).to_response()
}
