//! Response bodies shared by several handlers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct ProductPage<T> {
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalResults")]
    pub total_results: i64,
    pub products: Vec<T>,
}

#[derive(Serialize)]
pub struct Message {
    pub message: String,
}

#[derive(Serialize)]
pub struct CustomerOrders<T> {
    pub customer_id: i64,
    pub customer_name: String,
    pub orders_history: Vec<T>,
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn message(text: impl Into<String>) -> (StatusCode, Json<Message>) {
    ok(Message { message: text.into() })
}
