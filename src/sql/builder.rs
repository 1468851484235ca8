//! Builds parameterized SELECT and UPDATE statements for the catalog.
//!
//! Every identifier comes from a `&'static str` in this module; request data only ever
//! reaches SQL through `push_bind`.

use crate::models::{CustomerPatch, ProductPatch};
use crate::sql::SqlValue;
use sqlx::{QueryBuilder, Sqlite};

/// Table plus its primary-key column.
#[derive(Clone, Copy, Debug)]
pub struct TableRef {
    pub table: &'static str,
    pub pk: &'static str,
}

pub const PRODUCTS: TableRef = TableRef {
    table: "products",
    pk: "product_id",
};

pub const CUSTOMERS: TableRef = TableRef {
    table: "customers",
    pk: "customer_id",
};

/// Optional price bounds for the product listing. Absent bounds impose no constraint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProductFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Allow-listed orderings for the product listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl ProductSort {
    /// Unrecognized values yield `None` and the listing falls back to id order.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "price_asc" => Some(ProductSort::PriceAsc),
            "price_desc" => Some(ProductSort::PriceDesc),
            "name_asc" => Some(ProductSort::NameAsc),
            "name_desc" => Some(ProductSort::NameDesc),
            _ => None,
        }
    }

    fn order_by(self) -> &'static str {
        match self {
            ProductSort::PriceAsc => "p.price ASC",
            ProductSort::PriceDesc => "p.price DESC",
            ProductSort::NameAsc => "p.name ASC",
            ProductSort::NameDesc => "p.name DESC",
        }
    }
}

/// One-based page number and page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Search terms; each present term is ANDed in as a substring match.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchTerms {
    pub name: Option<String>,
    pub category: Option<String>,
}

impl SearchTerms {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none()
    }
}

/// `%term%` with LIKE wildcards in the term escaped (pair with `ESCAPE '\'`).
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn push_price_filter(qb: &mut QueryBuilder<'static, Sqlite>, filter: &ProductFilter) {
    qb.push(" WHERE 1=1");
    if let Some(min) = filter.min_price {
        qb.push(" AND p.price >= ");
        qb.push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND p.price <= ");
        qb.push_bind(max);
    }
}

/// COUNT of products matching the filter, ignoring pagination.
pub fn count_products(filter: &ProductFilter) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM products p");
    push_price_filter(&mut qb, filter);
    qb
}

/// One page of products with manufacturer name and concatenated category names.
pub fn list_products(filter: &ProductFilter, sort: Option<ProductSort>, page: Page) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(
        "SELECT p.product_id, p.name, p.price, m.name AS manufacturers_name, \
         GROUP_CONCAT(c.name, char(31)) AS category_names \
         FROM products p \
         LEFT JOIN manufacturers m ON p.manufacturer_id = m.manufacturer_id \
         LEFT JOIN products_categories pc ON p.product_id = pc.product_id \
         LEFT JOIN categories c ON c.category_id = pc.category_id",
    );
    push_price_filter(&mut qb, filter);
    qb.push(" GROUP BY p.product_id ORDER BY ");
    if let Some(sort) = sort {
        qb.push(sort.order_by());
        qb.push(", ");
    }
    qb.push("p.product_id ASC LIMIT ");
    qb.push_bind(i64::from(page.limit));
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());
    qb
}

pub fn search_products(terms: &SearchTerms) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(
        "SELECT p.product_id, m.name AS manufacturers_name, p.name, p.description, p.price, p.stock_quantity \
         FROM products p \
         LEFT JOIN manufacturers m ON p.manufacturer_id = m.manufacturer_id \
         WHERE 1=1",
    );
    if let Some(name) = &terms.name {
        qb.push(" AND p.name LIKE ");
        qb.push_bind(like_pattern(name));
        qb.push(" ESCAPE '\\'");
    }
    if let Some(category) = &terms.category {
        qb.push(
            " AND p.product_id IN (SELECT pc.product_id FROM products_categories pc \
             JOIN categories c ON pc.category_id = c.category_id WHERE c.name LIKE ",
        );
        qb.push_bind(like_pattern(category));
        qb.push(" ESCAPE '\\')");
    }
    qb.push(" ORDER BY p.product_id ASC");
    qb
}

/// Column assignments for a partial update, in a fixed column order.
pub trait Assignments {
    fn assignments(&self) -> Vec<(&'static str, SqlValue)>;
}

impl Assignments for ProductPatch {
    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(v) = self.manufacturer_id {
            out.push(("manufacturer_id", v.into()));
        }
        if let Some(v) = &self.name {
            out.push(("name", v.clone().into()));
        }
        if let Some(v) = &self.description {
            out.push(("description", v.clone().into()));
        }
        if let Some(v) = self.price {
            out.push(("price", v.into()));
        }
        if let Some(v) = self.stock_quantity {
            out.push(("stock_quantity", v.into()));
        }
        out
    }
}

impl Assignments for CustomerPatch {
    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(v) = &self.name {
            out.push(("name", v.clone().into()));
        }
        if let Some(v) = &self.email {
            out.push(("email", v.clone().into()));
        }
        if let Some(v) = self.phone {
            out.push(("phone", SqlValue::Text(v.to_string())));
        }
        if let Some(v) = &self.address {
            out.push(("address", v.clone().into()));
        }
        if let Some(v) = &self.password {
            out.push(("password", v.clone().into()));
        }
        out
    }
}

/// UPDATE by id: SET only the supplied columns. `None` when there is nothing to set.
pub fn update_by_id(
    target: TableRef,
    assignments: Vec<(&'static str, SqlValue)>,
    id: i64,
) -> Option<QueryBuilder<'static, Sqlite>> {
    if assignments.is_empty() {
        return None;
    }
    let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", target.table));
    for (i, (col, val)) in assignments.into_iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(col);
        qb.push(" = ");
        val.push_bind_to(&mut qb);
    }
    qb.push(format!(" WHERE {} = ", target.pk));
    qb.push_bind(id);
    Some(qb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(sql: &str) -> usize {
        sql.matches('?').count()
    }

    #[test]
    fn listing_without_bounds_has_no_price_predicates() {
        let qb = list_products(&ProductFilter::default(), None, Page::default());
        let sql = qb.sql();
        assert!(!sql.contains("p.price >="));
        assert!(!sql.contains("p.price <="));
        assert!(sql.ends_with("ORDER BY p.product_id ASC LIMIT ? OFFSET ?"));
        assert_eq!(placeholders(sql), 2);
    }

    #[test]
    fn listing_appends_only_supplied_bounds() {
        let filter = ProductFilter {
            min_price: Some(5.0),
            max_price: None,
        };
        let qb = list_products(&filter, None, Page::default());
        assert!(qb.sql().contains("WHERE 1=1 AND p.price >= ?"));
        assert!(!qb.sql().contains("p.price <="));
        assert_eq!(placeholders(qb.sql()), 3);

        let both = ProductFilter {
            min_price: Some(5.0),
            max_price: Some(50.0),
        };
        let count = count_products(&both);
        assert_eq!(
            count.sql(),
            "SELECT COUNT(*) FROM products p WHERE 1=1 AND p.price >= ? AND p.price <= ?"
        );
    }

    #[test]
    fn sort_is_allow_listed() {
        assert_eq!(ProductSort::parse("price_desc"), Some(ProductSort::PriceDesc));
        assert_eq!(ProductSort::parse("name_asc"), Some(ProductSort::NameAsc));
        assert_eq!(ProductSort::parse("price; DROP TABLE products"), None);
        assert_eq!(ProductSort::parse("PRICE_ASC"), None);

        let qb = list_products(&ProductFilter::default(), Some(ProductSort::NameDesc), Page::default());
        assert!(qb.sql().contains("ORDER BY p.name DESC, p.product_id ASC"));
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        assert_eq!(Page { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(Page { page: 3, limit: 10 }.offset(), 20);
        assert_eq!(Page { page: 2, limit: 25 }.offset(), 25);
    }

    #[test]
    fn search_includes_each_supplied_term() {
        let name_only = search_products(&SearchTerms {
            name: Some("lamp".into()),
            category: None,
        });
        assert!(name_only.sql().contains("p.name LIKE ? ESCAPE '\\'"));
        assert!(!name_only.sql().contains("products_categories"));

        let both = search_products(&SearchTerms {
            name: Some("lamp".into()),
            category: Some("home".into()),
        });
        assert!(both.sql().contains("p.product_id IN (SELECT pc.product_id FROM products_categories pc"));
        assert_eq!(placeholders(both.sql()), 2);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("tv"), "%tv%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn update_sets_exactly_the_supplied_columns() {
        let patch = ProductPatch {
            price: Some(12.5),
            name: Some("Desk".into()),
            ..Default::default()
        };
        let qb = update_by_id(PRODUCTS, patch.assignments(), 7).unwrap();
        assert_eq!(qb.sql(), "UPDATE products SET name = ?, price = ? WHERE product_id = ?");

        let customer = CustomerPatch {
            phone: Some(46701234),
            ..Default::default()
        };
        assert_eq!(customer.assignments(), vec![("phone", SqlValue::Text("46701234".into()))]);
        let qb = update_by_id(CUSTOMERS, customer.assignments(), 1).unwrap();
        assert_eq!(qb.sql(), "UPDATE customers SET phone = ? WHERE customer_id = ?");
    }

    #[test]
    fn empty_patch_builds_nothing() {
        assert!(update_by_id(PRODUCTS, ProductPatch::default().assignments(), 1).is_none());
    }
}
