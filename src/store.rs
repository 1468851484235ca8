//! Pool setup and catalog table DDL. Tables are created if missing; existing data is left alone.

use crate::error::AppError;
use crate::settings::Settings;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Catalog tables in dependency order. Junction and review rows cascade from their parents.
const CATALOG_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS manufacturers (
        manufacturer_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        category_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        product_id INTEGER PRIMARY KEY,
        manufacturer_id INTEGER REFERENCES manufacturers (manufacturer_id) ON DELETE SET NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price REAL NOT NULL CHECK (price > 0),
        stock_quantity INTEGER NOT NULL CHECK (stock_quantity >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products_categories (
        product_id INTEGER NOT NULL REFERENCES products (product_id) ON DELETE CASCADE,
        category_id INTEGER NOT NULL REFERENCES categories (category_id) ON DELETE CASCADE,
        PRIMARY KEY (product_id, category_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        customer_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT,
        phone TEXT,
        address TEXT,
        password TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        order_id INTEGER PRIMARY KEY,
        customer_id INTEGER NOT NULL REFERENCES customers (customer_id) ON DELETE CASCADE,
        order_date TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders_products (
        order_id INTEGER NOT NULL REFERENCES orders (order_id) ON DELETE CASCADE,
        product_id INTEGER NOT NULL REFERENCES products (product_id) ON DELETE CASCADE,
        quantity INTEGER NOT NULL,
        unit_price REAL NOT NULL,
        PRIMARY KEY (order_id, product_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        review_id INTEGER PRIMARY KEY,
        product_id INTEGER NOT NULL REFERENCES products (product_id) ON DELETE CASCADE,
        customer_id INTEGER NOT NULL REFERENCES customers (customer_id) ON DELETE CASCADE,
        rating REAL,
        comment TEXT
    )
    "#,
];

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Open the pool with foreign keys enforced, then ensure the catalog tables exist.
/// In-memory databases get a single long-lived connection so every query sees the same data.
pub async fn connect(settings: &Settings) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool_options = if is_in_memory(&settings.database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(settings.max_connections)
    };
    let pool = pool_options.connect_with(options).await?;
    ensure_catalog_tables(&pool).await?;
    tracing::info!(database_url = %settings.database_url, "database ready");
    Ok(pool)
}

pub async fn ensure_catalog_tables(pool: &SqlitePool) -> Result<(), AppError> {
    for ddl in CATALOG_TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}
