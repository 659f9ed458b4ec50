use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

/// A raw record as held by the key-value store: attribute name → JSON value.
pub type Item = Map<String, Value>;

/// Read a string attribute. Any other JSON type reads as absent.
pub fn str_attr(item: &Item, key: &str) -> Option<String> {
    match item.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Read a numeric attribute as an exact decimal.
///
/// Strings are NOT coerced: a stored `"12.50"` is a malformed amount.
pub fn decimal_attr(item: &Item, key: &str) -> Option<Decimal> {
    match item.get(key) {
        Some(Value::Number(n)) => number_to_decimal(n),
        _ => None,
    }
}

/// Read a boolean attribute. Only a JSON `true`/`false` counts.
pub fn bool_attr(item: &Item, key: &str) -> Option<bool> {
    item.get(key).and_then(Value::as_bool)
}

pub fn number_to_decimal(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Encode a decimal as a JSON number (the store keeps amounts numeric).
pub fn decimal_to_value(d: Decimal) -> Value {
    if d.fract().is_zero() {
        if let Some(i) = d.to_i64() {
            return Value::Number(Number::from(i));
        }
    }
    d.to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

pub(crate) fn put_opt_str(item: &mut Item, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        item.insert(key.to_string(), Value::String(v.clone()));
    }
}
