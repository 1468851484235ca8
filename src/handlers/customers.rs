//! Customer handlers: listing, profile summary, order history, partial update.

use super::path_id;
use crate::error::AppError;
use crate::response::{ok, CustomerOrders};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn customer_not_found() -> AppError {
    AppError::NotFound("Customer not found".into())
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.repo.customers().await?))
}

pub async fn read(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let summary = state
        .repo
        .customer_summary(id)
        .await?
        .ok_or_else(customer_not_found)?;
    Ok(ok(summary))
}

pub async fn orders(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let customer = state.repo.customer(id).await?.ok_or_else(customer_not_found)?;
    let orders_history = state.repo.customer_orders(id).await?;
    Ok(ok(CustomerOrders {
        customer_id: customer.customer_id,
        customer_name: customer.name,
        orders_history,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let Json(body) = payload?;
    let patch = RequestValidator::customer_patch(&body)?;
    let customer = state
        .repo
        .update_customer(id, &patch)
        .await?
        .ok_or_else(customer_not_found)?;
    Ok(ok(customer))
}
