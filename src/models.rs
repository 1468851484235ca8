//! Row and payload types for the catalog tables.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Separator used by `GROUP_CONCAT` when collecting category names (ASCII unit separator).
pub const CATEGORY_SEPARATOR: char = '\u{1f}';

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct Product {
    pub product_id: i64,
    pub manufacturer_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: i64,
}

/// Raw listing row; categories arrive concatenated.
#[derive(Debug, FromRow)]
pub struct ProductListingRow {
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub manufacturers_name: Option<String>,
    pub category_names: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductListing {
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub manufacturers_name: Option<String>,
    pub categories: Vec<String>,
}

impl From<ProductListingRow> for ProductListing {
    fn from(row: ProductListingRow) -> Self {
        let categories = row
            .category_names
            .map(|s| s.split(CATEGORY_SEPARATOR).map(str::to_string).collect())
            .unwrap_or_default();
        ProductListing {
            product_id: row.product_id,
            name: row.name,
            price: row.price,
            manufacturers_name: row.manufacturers_name,
            categories,
        }
    }
}

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct ProductSearchHit {
    pub product_id: i64,
    pub manufacturers_name: Option<String>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: i64,
}

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct CategoryProduct {
    pub category_name: String,
    pub product_id: i64,
    pub product_name: String,
}

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct CategoryStats {
    pub category_name: String,
    pub total_products: i64,
    pub avg_price: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub manufacturer_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock_quantity: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct CreatedProduct {
    pub id: i64,
    #[serde(flatten)]
    pub product: NewProduct,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ProductPatch {
    pub manufacturer_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i64>,
}

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct CustomerSummary {
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub latest_order: Option<String>,
}

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct CustomerOrderLine {
    pub order_id: i64,
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub order_date: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<i64>,
    pub address: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct OrderLine {
    pub order_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct ReviewView {
    pub product_name: String,
    pub customer_name: String,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct ReviewStats {
    pub product_name: String,
    pub avg_rating: Option<f64>,
}
