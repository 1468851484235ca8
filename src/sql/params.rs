//! Bindable values for dynamically assembled statements.

use sqlx::{QueryBuilder, Sqlite};

/// A value bound into a SQLite statement. Built from validated request fields.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    /// Append this value as a `?` placeholder and bind it.
    pub fn push_bind_to(self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            SqlValue::Int(n) => {
                qb.push_bind(n);
            }
            SqlValue::Real(n) => {
                qb.push_bind(n);
            }
            SqlValue::Text(s) => {
                qb.push_bind(s);
            }
        }
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Int(n)
    }
}

impl From<f64> for SqlValue {
    fn from(n: f64) -> Self {
        SqlValue::Real(n)
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}
