//! Request body validation against per-field rules.
//!
//! Messages follow the `"field" must ...` wording clients of this API already parse.
//! Numeric fields accept numeric strings and are normalized before deserializing
//! into the typed payloads.

use crate::error::AppError;
use crate::models::{CustomerPatch, NewProduct, ProductPatch};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    NonNegativeInteger,
    PositiveInteger,
    PositiveNumber,
    Text,
    TextAllowEmpty,
    Email,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn rule(name: &'static str, kind: FieldKind, required: bool) -> FieldRule {
    FieldRule { name, kind, required }
}

pub const NEW_PRODUCT_RULES: &[FieldRule] = &[
    rule("manufacturer_id", FieldKind::Integer, true),
    rule("name", FieldKind::Text, true),
    rule("description", FieldKind::TextAllowEmpty, false),
    rule("price", FieldKind::PositiveNumber, true),
    rule("stock_quantity", FieldKind::NonNegativeInteger, true),
];

pub const PRODUCT_PATCH_RULES: &[FieldRule] = &[
    rule("manufacturer_id", FieldKind::Integer, false),
    rule("name", FieldKind::Text, false),
    rule("description", FieldKind::TextAllowEmpty, false),
    rule("price", FieldKind::PositiveNumber, false),
    rule("stock_quantity", FieldKind::NonNegativeInteger, false),
];

pub const CUSTOMER_PATCH_RULES: &[FieldRule] = &[
    rule("name", FieldKind::Text, false),
    rule("email", FieldKind::Email, false),
    rule("phone", FieldKind::PositiveInteger, false),
    rule("address", FieldKind::Text, false),
    rule("password", FieldKind::Text, false),
];

pub struct RequestValidator;

impl RequestValidator {
    /// Validate body against rules; required fields must be present. Returns the normalized fields.
    pub fn validate(body: &Value, rules: &[FieldRule]) -> Result<Map<String, Value>, AppError> {
        let obj = body
            .as_object()
            .ok_or_else(|| AppError::Validation("\"value\" must be of type object".into()))?;
        let mut out = Map::new();
        for r in rules {
            match obj.get(r.name) {
                Some(v) => {
                    out.insert(r.name.to_string(), validate_field(r.name, v, r.kind)?);
                }
                None if r.required => {
                    return Err(AppError::Validation(format!("\"{}\" is required", r.name)));
                }
                None => {}
            }
        }
        if let Some(unknown) = obj.keys().find(|k| !rules.iter().any(|r| r.name == k.as_str())) {
            return Err(AppError::Validation(format!("\"{}\" is not allowed", unknown)));
        }
        Ok(out)
    }

    /// Validate a partial update: every field optional, at least one present.
    pub fn validate_partial(body: &Value, rules: &[FieldRule]) -> Result<Map<String, Value>, AppError> {
        if body.as_object().is_some_and(|o| o.is_empty()) {
            return Err(AppError::Validation("\"value\" must have at least 1 key".into()));
        }
        Self::validate(body, rules)
    }

    pub fn new_product(body: &Value) -> Result<NewProduct, AppError> {
        into_typed(Self::validate(body, NEW_PRODUCT_RULES)?)
    }

    pub fn product_patch(body: &Value) -> Result<ProductPatch, AppError> {
        into_typed(Self::validate_partial(body, PRODUCT_PATCH_RULES)?)
    }

    pub fn customer_patch(body: &Value) -> Result<CustomerPatch, AppError> {
        into_typed(Self::validate_partial(body, CUSTOMER_PATCH_RULES)?)
    }
}

fn into_typed<T: DeserializeOwned>(fields: Map<String, Value>) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| AppError::Validation(e.to_string()))
}

fn validate_field(col: &str, v: &Value, kind: FieldKind) -> Result<Value, AppError> {
    match kind {
        FieldKind::Integer => Ok(Value::Number(as_integer(col, v)?.into())),
        FieldKind::NonNegativeInteger => {
            let n = as_integer(col, v)?;
            if n < 0 {
                return Err(AppError::Validation(format!(
                    "\"{}\" must be greater than or equal to 0",
                    col
                )));
            }
            Ok(Value::Number(n.into()))
        }
        FieldKind::PositiveInteger => {
            let n = as_integer(col, v)?;
            if n <= 0 {
                return Err(AppError::Validation(format!("\"{}\" must be greater than 0", col)));
            }
            Ok(Value::Number(n.into()))
        }
        FieldKind::PositiveNumber => {
            let n = as_number(col, v)?;
            if n <= 0.0 {
                return Err(AppError::Validation(format!("\"{}\" must be greater than 0", col)));
            }
            Number::from_f64(n)
                .map(Value::Number)
                .ok_or_else(|| AppError::Validation(format!("\"{}\" must be a number", col)))
        }
        FieldKind::Text => as_text(col, v, false),
        FieldKind::TextAllowEmpty => as_text(col, v, true),
        FieldKind::Email => {
            let s = as_text(col, v, false)?;
            let re = Regex::new(EMAIL_PATTERN)
                .map_err(|_| AppError::Validation(format!("invalid pattern for {}", col)))?;
            if !s.as_str().is_some_and(|s| re.is_match(s)) {
                return Err(AppError::Validation(format!("\"{}\" must be a valid email", col)));
            }
            Ok(s)
        }
    }
}

fn as_number(col: &str, v: &Value) -> Result<f64, AppError> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
        .ok_or_else(|| AppError::Validation(format!("\"{}\" must be a number", col)))
}

fn as_integer(col: &str, v: &Value) -> Result<i64, AppError> {
    if let Some(n) = v.as_i64() {
        return Ok(n);
    }
    if let Value::String(s) = v {
        if let Ok(n) = s.trim().parse::<i64>() {
            return Ok(n);
        }
    }
    let n = as_number(col, v)?;
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Ok(n as i64)
    } else {
        Err(AppError::Validation(format!("\"{}\" must be an integer", col)))
    }
}

fn as_text(col: &str, v: &Value, allow_empty: bool) -> Result<Value, AppError> {
    match v {
        Value::String(s) if s.is_empty() && !allow_empty => Err(AppError::Validation(format!(
            "\"{}\" is not allowed to be empty",
            col
        ))),
        Value::String(_) => Ok(v.clone()),
        _ => Err(AppError::Validation(format!("\"{}\" must be a string", col))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(m) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn new_product_accepts_valid_body() {
        let p = RequestValidator::new_product(&json!({
            "manufacturer_id": 2,
            "name": "Desk lamp",
            "description": "",
            "price": 199.0,
            "stock_quantity": 4
        }))
        .unwrap();
        assert_eq!(p.manufacturer_id, 2);
        assert_eq!(p.description, "");
        assert_eq!(p.price, 199.0);
    }

    #[test]
    fn description_defaults_to_empty_and_numeric_strings_convert() {
        let p = RequestValidator::new_product(&json!({
            "manufacturer_id": "3",
            "name": "Chair",
            "price": "49.90",
            "stock_quantity": 10
        }))
        .unwrap();
        assert_eq!(p.manufacturer_id, 3);
        assert_eq!(p.description, "");
        assert!((p.price - 49.9).abs() < 1e-9);
    }

    #[test]
    fn price_must_be_positive() {
        let body = json!({"manufacturer_id": 1, "name": "X", "price": 0, "stock_quantity": 1});
        assert_eq!(
            message(RequestValidator::new_product(&body).unwrap_err()),
            "\"price\" must be greater than 0"
        );
        let body = json!({"manufacturer_id": 1, "name": "X", "price": -3.5, "stock_quantity": 1});
        assert!(RequestValidator::new_product(&body).is_err());
    }

    #[test]
    fn first_violation_is_reported() {
        let body = json!({"name": "", "price": "abc"});
        assert_eq!(
            message(RequestValidator::new_product(&body).unwrap_err()),
            "\"manufacturer_id\" is required"
        );
    }

    #[test]
    fn stock_quantity_must_be_a_non_negative_integer() {
        let body = json!({"manufacturer_id": 1, "name": "X", "price": 1, "stock_quantity": 1.5});
        assert_eq!(
            message(RequestValidator::new_product(&body).unwrap_err()),
            "\"stock_quantity\" must be an integer"
        );
        let body = json!({"manufacturer_id": 1, "name": "X", "price": 1, "stock_quantity": -1});
        assert_eq!(
            message(RequestValidator::new_product(&body).unwrap_err()),
            "\"stock_quantity\" must be greater than or equal to 0"
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let body = json!({"manufacturer_id": 1, "name": "X", "price": 1, "stock_quantity": 1, "sku": "A1"});
        assert_eq!(message(RequestValidator::new_product(&body).unwrap_err()), "\"sku\" is not allowed");
    }

    #[test]
    fn patch_requires_at_least_one_field() {
        assert_eq!(
            message(RequestValidator::product_patch(&json!({})).unwrap_err()),
            "\"value\" must have at least 1 key"
        );
        assert_eq!(
            message(RequestValidator::product_patch(&json!([1, 2])).unwrap_err()),
            "\"value\" must be of type object"
        );
    }

    #[test]
    fn patch_keeps_only_supplied_fields() {
        let patch = RequestValidator::product_patch(&json!({"price": 12})).unwrap();
        assert_eq!(
            patch,
            ProductPatch {
                price: Some(12.0),
                ..Default::default()
            }
        );
    }

    #[test]
    fn customer_patch_checks_email_and_phone() {
        assert_eq!(
            message(RequestValidator::customer_patch(&json!({"email": "not-an-email"})).unwrap_err()),
            "\"email\" must be a valid email"
        );
        assert_eq!(
            message(RequestValidator::customer_patch(&json!({"phone": 0})).unwrap_err()),
            "\"phone\" must be greater than 0"
        );
        let patch = RequestValidator::customer_patch(&json!({"email": "ada@example.com", "phone": "0701234"})).unwrap();
        assert_eq!(patch.email.as_deref(), Some("ada@example.com"));
        assert_eq!(patch.phone, Some(701234));
    }

    #[test]
    fn null_is_a_type_error() {
        assert_eq!(
            message(RequestValidator::customer_patch(&json!({"name": null})).unwrap_err()),
            "\"name\" must be a string"
        );
    }
}
