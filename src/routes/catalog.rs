//! Catalog routes. Static segments (`search`, `stats`, `category`) win over `:id`.

use crate::handlers::{customers, products, sales};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/search", get(products::search))
        .route("/products/stats", get(products::stats))
        .route("/products/category/:category_id", get(products::by_category))
        .route(
            "/products/:id",
            get(products::read).put(products::update).delete(products::delete),
        )
        .route("/customers", get(customers::list))
        .route("/customers/:id", get(customers::read).put(customers::update))
        .route("/customers/:id/orders", get(customers::orders))
        .route("/orders", get(sales::orders))
        .route("/reviews", get(sales::reviews))
        .route("/reviews/stats", get(sales::review_stats))
        .with_state(state)
}
