//! Product handlers: listing, search, category views, stats and CRUD.

use super::path_id;
use crate::error::AppError;
use crate::models::CreatedProduct;
use crate::response::{created, message, ok, ProductPage};
use crate::service::RequestValidator;
use crate::sql::{Page, ProductFilter, ProductSort, SearchTerms};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

/// Empty query values count as absent.
fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|s| !s.trim().is_empty())
}

fn parse_price(params: &HashMap<String, String>, key: &str) -> Result<Option<f64>, AppError> {
    param(params, key)
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| AppError::BadRequest(format!("{} must be a number", key)))
        })
        .transpose()
}

fn parse_positive(params: &HashMap<String, String>, key: &str, default: u32) -> Result<u32, AppError> {
    match param(params, key) {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| AppError::BadRequest(format!("{} must be a positive integer", key))),
    }
}

/// Price bounds, allow-listed sort (unknown values ignored) and pagination.
pub(crate) fn parse_list_params(
    params: &HashMap<String, String>,
) -> Result<(ProductFilter, Option<ProductSort>, Page), AppError> {
    let filter = ProductFilter {
        min_price: parse_price(params, "minPrice")?,
        max_price: parse_price(params, "maxPrice")?,
    };
    let sort = param(params, "sort").and_then(ProductSort::parse);
    let page = Page {
        page: parse_positive(params, "page", 1)?,
        limit: parse_positive(params, "limit", Page::DEFAULT_LIMIT)?.min(Page::MAX_LIMIT),
    };
    Ok((filter, sort, page))
}

pub(crate) fn parse_search_terms(params: &HashMap<String, String>) -> Result<SearchTerms, AppError> {
    let terms = SearchTerms {
        name: param(params, "name").map(str::to_string),
        category: param(params, "category").map(str::to_string),
    };
    if terms.is_empty() {
        return Err(AppError::BadRequest("Search term is required".into()));
    }
    Ok(terms)
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let (filter, sort, page) = parse_list_params(&params)?;
    let (total, products) = state.repo.list_products(&filter, sort, page).await?;
    if products.is_empty() {
        return Err(AppError::NotFound("No products found within the given criteria.".into()));
    }
    Ok(ok(ProductPage {
        page: page.page,
        limit: page.limit,
        total_results: total,
        products,
    }))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let terms = parse_search_terms(&params)?;
    let products = state.repo.search_products(&terms).await?;
    if products.is_empty() {
        return Err(AppError::NotFound("No products found".into()));
    }
    Ok(ok(products))
}

pub async fn by_category(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let category_id = path_id(path)?;
    if !state.repo.category_exists(category_id).await? {
        return Err(AppError::NotFound("Category not found".into()));
    }
    Ok(ok(state.repo.products_in_category(category_id).await?))
}

pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.repo.category_stats().await?))
}

pub async fn read(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let product = state
        .repo
        .product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(ok(product))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let product = RequestValidator::new_product(&body)?;
    let id = state.repo.create_product(&product).await?;
    Ok(created(CreatedProduct { id, product }))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let Json(body) = payload?;
    let patch = RequestValidator::product_patch(&body)?;
    let product = state
        .repo
        .update_product(id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(ok(product))
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    if !state.repo.delete_product(id).await? {
        return Err(AppError::NotFound("Product not found".into()));
    }
    Ok(message("Product and related reviews deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn list_defaults() {
        let (filter, sort, page) = parse_list_params(&params(&[])).unwrap();
        assert_eq!(filter, ProductFilter::default());
        assert_eq!(sort, None);
        assert_eq!(page, Page { page: 1, limit: 10 });
    }

    #[test]
    fn list_parses_bounds_and_sort() {
        let (filter, sort, page) = parse_list_params(&params(&[
            ("minPrice", "10"),
            ("maxPrice", "99.5"),
            ("sort", "price_desc"),
            ("page", "3"),
            ("limit", "5"),
        ]))
        .unwrap();
        assert_eq!(filter.min_price, Some(10.0));
        assert_eq!(filter.max_price, Some(99.5));
        assert_eq!(sort, Some(ProductSort::PriceDesc));
        assert_eq!(page.offset(), 10);
    }

    #[test]
    fn unknown_sort_and_empty_values_are_ignored() {
        let (filter, sort, _) = parse_list_params(&params(&[("sort", "rating"), ("minPrice", "")])).unwrap();
        assert_eq!(sort, None);
        assert_eq!(filter.min_price, None);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(parse_list_params(&params(&[("minPrice", "cheap")])).is_err());
        assert!(parse_list_params(&params(&[("page", "0")])).is_err());
        assert!(parse_list_params(&params(&[("limit", "-4")])).is_err());
    }

    #[test]
    fn limit_is_clamped() {
        let (_, _, page) = parse_list_params(&params(&[("limit", "5000")])).unwrap();
        assert_eq!(page.limit, Page::MAX_LIMIT);
    }

    #[test]
    fn search_requires_a_term() {
        assert!(matches!(
            parse_search_terms(&params(&[])),
            Err(AppError::BadRequest(m)) if m == "Search term is required"
        ));
        assert!(parse_search_terms(&params(&[("name", "")])).is_err());
        let terms = parse_search_terms(&params(&[("category", "home")])).unwrap();
        assert_eq!(terms.category.as_deref(), Some("home"));
        assert_eq!(terms.name, None);
    }
}
