//! `CatalogRepository` over a SQLite pool.

use super::CatalogRepository;
use crate::error::AppError;
use crate::models::*;
use crate::sql::{
    count_products, list_products, search_products, update_by_id, Assignments, Page, ProductFilter, ProductSort,
    SearchTerms, CUSTOMERS, PRODUCTS,
};
use async_trait::async_trait;
use sqlx::SqlitePool;

const PING: &str = "SELECT 1";

const SELECT_PRODUCT: &str = "SELECT product_id, manufacturer_id, name, description, price, stock_quantity \
     FROM products WHERE product_id = ?";

const INSERT_PRODUCT: &str = "INSERT INTO products (manufacturer_id, name, description, price, stock_quantity) \
     VALUES (?, ?, ?, ?, ?)";

const DELETE_PRODUCT: &str = "DELETE FROM products WHERE product_id = ?";

const SELECT_CATEGORY_ID: &str = "SELECT category_id FROM categories WHERE category_id = ?";

const SELECT_CATEGORY_PRODUCTS: &str = "SELECT c.name AS category_name, p.product_id, p.name AS product_name \
     FROM products p \
     JOIN products_categories pc ON p.product_id = pc.product_id \
     JOIN categories c ON c.category_id = pc.category_id \
     WHERE c.category_id = ? \
     ORDER BY p.product_id";

const SELECT_CATEGORY_STATS: &str = "SELECT c.name AS category_name, \
            COUNT(p.product_id) AS total_products, \
            ROUND(AVG(p.price), 2) AS avg_price \
     FROM categories c \
     LEFT JOIN products_categories pc ON c.category_id = pc.category_id \
     LEFT JOIN products p ON p.product_id = pc.product_id \
     GROUP BY c.category_id \
     ORDER BY c.category_id";

const SELECT_CUSTOMERS: &str =
    "SELECT customer_id, name, email, phone, address, password FROM customers ORDER BY customer_id";

const SELECT_CUSTOMER: &str = "SELECT customer_id, name, email, phone, address, password \
     FROM customers WHERE customer_id = ?";

const SELECT_CUSTOMER_SUMMARY: &str = "SELECT c.name AS customer_name, c.email, c.phone, c.address, \
            MAX(o.order_date) AS latest_order \
     FROM customers c \
     LEFT JOIN orders o ON o.customer_id = c.customer_id \
     WHERE c.customer_id = ? \
     GROUP BY c.customer_id";

const SELECT_CUSTOMER_ORDERS: &str = "SELECT o.order_id, p.name AS product_name, op.quantity, o.order_date \
     FROM orders o \
     LEFT JOIN orders_products op ON o.order_id = op.order_id \
     LEFT JOIN products p ON p.product_id = op.product_id \
     WHERE o.customer_id = ? \
     ORDER BY o.order_id, op.product_id";

const SELECT_ORDER_LINES: &str = "SELECT op.order_id, p.name AS product_name, op.quantity, op.unit_price AS price \
     FROM orders_products op \
     JOIN products p ON p.product_id = op.product_id \
     ORDER BY op.order_id, op.product_id";

const SELECT_REVIEWS: &str = "SELECT p.name AS product_name, c.name AS customer_name, r.rating, r.comment \
     FROM reviews r \
     JOIN products p ON p.product_id = r.product_id \
     JOIN customers c ON c.customer_id = r.customer_id \
     ORDER BY r.review_id";

const SELECT_REVIEW_STATS: &str = "SELECT p.name AS product_name, ROUND(AVG(r.rating), 1) AS avg_rating \
     FROM products p \
     JOIN reviews r ON r.product_id = p.product_id \
     GROUP BY p.product_id \
     ORDER BY p.product_id";

/// Placeholders in a statement. Catalog SQL never carries a literal `?`.
fn bind_count(sql: &str) -> usize {
    sql.matches('?').count()
}

fn trace_sql(sql: &str) {
    tracing::debug!(sql = %sql, binds = bind_count(sql), "query");
}

#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCatalog { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalog {
    async fn ping(&self) -> Result<(), AppError> {
        trace_sql(PING);
        sqlx::query(PING).fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        sort: Option<ProductSort>,
        page: Page,
    ) -> Result<(i64, Vec<ProductListing>), AppError> {
        let mut count_q = count_products(filter);
        trace_sql(count_q.sql());
        let total: i64 = count_q.build_query_scalar().fetch_one(&self.pool).await?;

        let mut list_q = list_products(filter, sort, page);
        trace_sql(list_q.sql());
        let rows: Vec<ProductListingRow> = list_q.build_query_as().fetch_all(&self.pool).await?;
        Ok((total, rows.into_iter().map(ProductListing::from).collect()))
    }

    async fn search_products(&self, terms: &SearchTerms) -> Result<Vec<ProductSearchHit>, AppError> {
        let mut q = search_products(terms);
        trace_sql(q.sql());
        Ok(q.build_query_as::<ProductSearchHit>().fetch_all(&self.pool).await?)
    }

    async fn category_exists(&self, category_id: i64) -> Result<bool, AppError> {
        trace_sql(SELECT_CATEGORY_ID);
        let found: Option<i64> = sqlx::query_scalar(SELECT_CATEGORY_ID)
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn products_in_category(&self, category_id: i64) -> Result<Vec<CategoryProduct>, AppError> {
        trace_sql(SELECT_CATEGORY_PRODUCTS);
        let rows = sqlx::query_as::<_, CategoryProduct>(SELECT_CATEGORY_PRODUCTS)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn category_stats(&self) -> Result<Vec<CategoryStats>, AppError> {
        trace_sql(SELECT_CATEGORY_STATS);
        let rows = sqlx::query_as::<_, CategoryStats>(SELECT_CATEGORY_STATS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn product(&self, id: i64) -> Result<Option<Product>, AppError> {
        trace_sql(SELECT_PRODUCT);
        let row = sqlx::query_as::<_, Product>(SELECT_PRODUCT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_product(&self, product: &NewProduct) -> Result<i64, AppError> {
        trace_sql(INSERT_PRODUCT);
        let result = sqlx::query(INSERT_PRODUCT)
            .bind(product.manufacturer_id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.stock_quantity)
            .execute(&self.pool)
            .await?;
        let id = result.last_insert_rowid();
        tracing::info!(product_id = id, "product created");
        Ok(id)
    }

    async fn update_product(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>, AppError> {
        if let Some(mut q) = update_by_id(PRODUCTS, patch.assignments(), id) {
            trace_sql(q.sql());
            if q.build().execute(&self.pool).await?.rows_affected() == 0 {
                return Ok(None);
            }
        }
        self.product(id).await
    }

    async fn delete_product(&self, id: i64) -> Result<bool, AppError> {
        trace_sql(DELETE_PRODUCT);
        let result = sqlx::query(DELETE_PRODUCT).bind(id).execute(&self.pool).await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(product_id = id, "product deleted");
        }
        Ok(deleted)
    }

    async fn customers(&self) -> Result<Vec<Customer>, AppError> {
        trace_sql(SELECT_CUSTOMERS);
        let rows = sqlx::query_as::<_, Customer>(SELECT_CUSTOMERS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn customer(&self, id: i64) -> Result<Option<Customer>, AppError> {
        trace_sql(SELECT_CUSTOMER);
        let row = sqlx::query_as::<_, Customer>(SELECT_CUSTOMER)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn customer_summary(&self, id: i64) -> Result<Option<CustomerSummary>, AppError> {
        trace_sql(SELECT_CUSTOMER_SUMMARY);
        let row = sqlx::query_as::<_, CustomerSummary>(SELECT_CUSTOMER_SUMMARY)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn customer_orders(&self, customer_id: i64) -> Result<Vec<CustomerOrderLine>, AppError> {
        trace_sql(SELECT_CUSTOMER_ORDERS);
        let rows = sqlx::query_as::<_, CustomerOrderLine>(SELECT_CUSTOMER_ORDERS)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_customer(&self, id: i64, patch: &CustomerPatch) -> Result<Option<Customer>, AppError> {
        if let Some(mut q) = update_by_id(CUSTOMERS, patch.assignments(), id) {
            trace_sql(q.sql());
            if q.build().execute(&self.pool).await?.rows_affected() == 0 {
                return Ok(None);
            }
        }
        self.customer(id).await
    }

    async fn order_lines(&self) -> Result<Vec<OrderLine>, AppError> {
        trace_sql(SELECT_ORDER_LINES);
        let rows = sqlx::query_as::<_, OrderLine>(SELECT_ORDER_LINES)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn reviews(&self) -> Result<Vec<ReviewView>, AppError> {
        trace_sql(SELECT_REVIEWS);
        let rows = sqlx::query_as::<_, ReviewView>(SELECT_REVIEWS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn review_stats(&self) -> Result<Vec<ReviewStats>, AppError> {
        trace_sql(SELECT_REVIEW_STATS);
        let rows = sqlx::query_as::<_, ReviewStats>(SELECT_REVIEW_STATS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::store::connect;
    use serde_json::json;

    #[test]
    fn bind_count_matches_placeholders() {
        assert_eq!(bind_count(PING), 0);
        assert_eq!(bind_count(SELECT_PRODUCT), 1);
        assert_eq!(bind_count(INSERT_PRODUCT), 5);
        let filter = ProductFilter {
            min_price: Some(10.0),
            max_price: Some(50.0),
        };
        let mut q = list_products(&filter, None, Page { page: 2, limit: 5 });
        // two price bounds plus LIMIT and OFFSET
        assert_eq!(bind_count(q.sql()), 4);
    }

    async fn catalog() -> SqliteCatalog {
        let settings = Settings::from_lookup(|k| (k == "DATABASE_URL").then(|| "sqlite::memory:".to_string())).unwrap();
        SqliteCatalog::new(connect(&settings).await.unwrap())
    }

    #[tokio::test]
    async fn update_of_missing_rows_is_none() {
        let repo = catalog().await;
        let patch: ProductPatch = serde_json::from_value(json!({"price": 9.5})).unwrap();
        assert!(repo.update_product(42, &patch).await.unwrap().is_none());
        let patch: CustomerPatch = serde_json::from_value(json!({"name": "Eve"})).unwrap();
        assert!(repo.update_customer(42, &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_returns_the_stored_row() {
        let repo = catalog().await;
        sqlx::query("INSERT INTO manufacturers (manufacturer_id, name) VALUES (1, 'Acme')")
            .execute(repo.pool())
            .await
            .unwrap();
        let new: NewProduct = serde_json::from_value(json!({
            "manufacturer_id": 1, "name": "Kettle", "price": 25.0, "stock_quantity": 3
        }))
        .unwrap();
        let id = repo.create_product(&new).await.unwrap();
        let patch: ProductPatch = serde_json::from_value(json!({"stock_quantity": 7})).unwrap();
        let updated = repo.update_product(id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.stock_quantity, 7);
        assert_eq!(updated.name, "Kettle");
    }
}
