use std::collections::BTreeMap;

use serde_json::Value;

use super::coerce::{coerce_number, js_string};
use crate::ir::{Annotation, Position};

const DEFAULT_X: f64 = 10.0;
const DEFAULT_Y: f64 = 20.0;

pub(super) fn sanitize_annotations(raw: Option<&Value>) -> Vec<Annotation> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    items.iter().filter_map(sanitize_annotation).collect()
}

fn sanitize_annotation(raw: &Value) -> Option<Annotation> {
    let text = raw.get("text")?.as_str().filter(|text| !text.is_empty())?;
    let position = raw.get("position").filter(|p| p.is_object())?;

    let style = raw
        .get("style")
        .and_then(Value::as_object)
        .map(|style| {
            style
                .iter()
                .filter(|(_, value)| !value.is_null() && !value.is_array() && !value.is_object())
                .map(|(key, value)| (key.clone(), js_string(value)))
                .collect()
        })
        .unwrap_or_else(BTreeMap::new);

    Some(Annotation {
        text: text.to_string(),
        position: Position {
            x: coerce_number(position.get("x")).unwrap_or(DEFAULT_X),
            y: coerce_number(position.get("y")).unwrap_or(DEFAULT_Y),
        },
        style,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drops_annotations_without_text_or_position() {
        let annotations = sanitize_annotations(Some(&json!([
            {"text": "kept", "position": {"x": 1, "y": 2}},
            {"text": "", "position": {"x": 1, "y": 2}},
            {"text": 5, "position": {"x": 1, "y": 2}},
            {"text": "no position"},
            {"text": "bad position", "position": "top"},
            null
        ])));
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].text, "kept");
        assert_eq!(annotations[0].position, Position { x: 1.0, y: 2.0 });
    }

    #[test]
    fn coordinates_default_when_missing_or_non_numeric() {
        let annotations = sanitize_annotations(Some(&json!([
            {"text": "a", "position": {}},
            {"text": "b", "position": {"x": "35", "y": "low"}},
            {"text": "c", "position": {"x": 0, "y": 0}}
        ])));
        assert_eq!(annotations[0].position, Position { x: 10.0, y: 20.0 });
        assert_eq!(annotations[1].position, Position { x: 35.0, y: 20.0 });
        assert_eq!(annotations[2].position, Position { x: 0.0, y: 0.0 });
    }

    #[test]
    fn style_keeps_scalar_values() {
        let annotations = sanitize_annotations(Some(&json!([
            {"text": "a", "position": {}, "style": {"color": "#000", "opacity": 0.5, "nested": {"x": 1}}}
        ])));
        let style = &annotations[0].style;
        assert_eq!(style.get("color").map(String::as_str), Some("#000"));
        assert_eq!(style.get("opacity").map(String::as_str), Some("0.5"));
        assert!(!style.contains_key("nested"));
    }

    #[test]
    fn non_array_input_yields_nothing() {
        assert!(sanitize_annotations(None).is_empty());
        assert!(sanitize_annotations(Some(&json!({"text": "a"}))).is_empty());
    }
}
