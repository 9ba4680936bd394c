use std::collections::HashMap;

use serde_json::Value;

use super::coerce::{js_string, number_text};
use crate::ir::{ArrayData, Scalar};

const ELEMENT_KEYS: [&str; 3] = ["elements", "array", "values"];

pub(super) fn sanitize_array(data: &Value, highlights: &[Value]) -> (ArrayData, Vec<String>) {
    let raw_elements = ELEMENT_KEYS
        .iter()
        .find_map(|key| data.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or_default();

    let elements: Vec<Scalar> = raw_elements.iter().map(to_scalar).collect();

    let mut value_to_index: HashMap<String, usize> = HashMap::new();
    for (idx, element) in elements.iter().enumerate() {
        value_to_index.insert(element.to_string(), idx);
    }

    let highlights = highlights
        .iter()
        .map(|highlight| match highlight {
            Value::Number(number) => number_text(number),
            other => {
                let key = js_string(other);
                match value_to_index.get(&key) {
                    Some(idx) => idx.to_string(),
                    None => key,
                }
            }
        })
        .collect();

    (ArrayData { elements }, highlights)
}

fn to_scalar(value: &Value) -> Scalar {
    match value {
        Value::Bool(flag) => Scalar::Bool(*flag),
        Value::Number(number) => Scalar::Number(number.clone()),
        Value::String(text) => Scalar::Text(text.clone()),
        Value::Null | Value::Array(_) | Value::Object(_) => Scalar::Text(value.to_string()),
    }
}
