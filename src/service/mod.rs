//! Storage access for the catalog: the repository seam plus request validation.

mod sqlite;
mod validation;
pub use sqlite::SqliteCatalog;
pub use validation::{FieldKind, FieldRule, RequestValidator};

use crate::error::AppError;
use crate::models::*;
use crate::sql::{Page, ProductFilter, ProductSort, SearchTerms};
use async_trait::async_trait;

/// Every storage operation the HTTP layer needs. Handlers only see this trait.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Cheap round trip used by `/ready`.
    async fn ping(&self) -> Result<(), AppError>;

    /// Total matching products (before pagination) and the requested page.
    async fn list_products(
        &self,
        filter: &ProductFilter,
        sort: Option<ProductSort>,
        page: Page,
    ) -> Result<(i64, Vec<ProductListing>), AppError>;

    async fn search_products(&self, terms: &SearchTerms) -> Result<Vec<ProductSearchHit>, AppError>;

    async fn category_exists(&self, category_id: i64) -> Result<bool, AppError>;

    async fn products_in_category(&self, category_id: i64) -> Result<Vec<CategoryProduct>, AppError>;

    async fn category_stats(&self) -> Result<Vec<CategoryStats>, AppError>;

    async fn product(&self, id: i64) -> Result<Option<Product>, AppError>;

    /// Insert and return the generated id.
    async fn create_product(&self, product: &NewProduct) -> Result<i64, AppError>;

    /// Apply the supplied fields and return the re-read row; `None` when the product is absent.
    async fn update_product(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>, AppError>;

    /// `false` when nothing was deleted. Dependent rows go through ON DELETE CASCADE.
    async fn delete_product(&self, id: i64) -> Result<bool, AppError>;

    async fn customers(&self) -> Result<Vec<Customer>, AppError>;

    async fn customer(&self, id: i64) -> Result<Option<Customer>, AppError>;

    async fn customer_summary(&self, id: i64) -> Result<Option<CustomerSummary>, AppError>;

    async fn customer_orders(&self, customer_id: i64) -> Result<Vec<CustomerOrderLine>, AppError>;

    async fn update_customer(&self, id: i64, patch: &CustomerPatch) -> Result<Option<Customer>, AppError>;

    async fn order_lines(&self) -> Result<Vec<OrderLine>, AppError>;

    async fn reviews(&self) -> Result<Vec<ReviewView>, AppError>;

    async fn review_stats(&self) -> Result<Vec<ReviewStats>, AppError>;
}
