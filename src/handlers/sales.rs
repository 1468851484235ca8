//! Order lines and reviews (read-only).

use crate::error::AppError;
use crate::response::ok;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub async fn orders(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.repo.order_lines().await?))
}

pub async fn reviews(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.repo.reviews().await?))
}

pub async fn review_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.repo.review_stats().await?))
}
