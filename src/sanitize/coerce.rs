use serde_json::{Number, Value};

use super::ids::IdSource;

/// Largest magnitude at which an integral float still prints as plain digits.
const PLAIN_DIGITS_LIMIT: f64 = 1e21;

pub(crate) fn number_text(number: &Number) -> String {
    if let Some(value) = number.as_i64() {
        return value.to_string();
    }
    if let Some(value) = number.as_u64() {
        return value.to_string();
    }
    match number.as_f64() {
        Some(value) => float_text(value),
        None => number.to_string(),
    }
}

pub(crate) fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < PLAIN_DIGITS_LIMIT {
        if value == 0.0 {
            return "0".to_string();
        }
        return format!("{value:.0}");
    }
    format!("{value}")
}

/// Display text for an arbitrary value: strings verbatim, numbers without a
/// trailing `.0`, arrays comma-joined, objects as `[object Object]`.
pub(crate) fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_text(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `None` for missing or `null`, the value otherwise.
pub(crate) fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Non-empty display text of a truthy value.
pub(crate) fn truthy_text(value: Option<&Value>) -> Option<String> {
    value
        .filter(|v| is_truthy(v))
        .map(js_string)
        .filter(|text| !text.is_empty())
}

/// Stable id for a node: the value's display text, or a generated token when
/// the value is absent or prints as an empty string.
pub(crate) fn canonical_id(value: Option<&Value>, ids: &mut dyn IdSource) -> String {
    match present(value).map(js_string) {
        Some(text) if !text.is_empty() => text,
        _ => ids.next_id(),
    }
}

/// Numeric reading of a value, accepting numeric strings and booleans.
pub(crate) fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let number = match present(value)? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Bool(flag) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}
