//! HTTP handlers for the catalog resources.

pub mod customers;
pub mod products;
pub mod sales;

use crate::error::AppError;
use axum::extract::{rejection::PathRejection, Path};

/// Path ids are integers; anything else is a bad request rather than a routing miss.
fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

/// Unwraps the path segment, keeping axum's status for undecodable paths.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<i64, AppError> {
    let Path(id_str) = path?;
    parse_id(&id_str)
}
