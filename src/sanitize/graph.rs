use serde_json::Value;

use super::StepRejection;
use super::coerce::{canonical_id, js_string, present};
use super::ids::IdSource;
use crate::ir::{GraphData, GraphEdge, GraphNode};

pub(super) fn sanitize_graph(
    data: &Value,
    ids: &mut dyn IdSource,
) -> Result<GraphData, StepRejection> {
    let raw_nodes = data
        .get("nodes")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let raw_edges = data
        .get("edges")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for (idx, raw) in raw_nodes.iter().enumerate() {
        if raw.is_null() {
            return Err(StepRejection::NullNode(idx));
        }
        nodes.push(sanitize_node(raw, idx, ids));
    }

    let mut edges = Vec::with_capacity(raw_edges.len());
    for (idx, raw) in raw_edges.iter().enumerate() {
        if raw.is_null() {
            return Err(StepRejection::NullEdge(idx));
        }
        edges.push(GraphEdge {
            source: canonical_id(
                present(raw.get("source")).or_else(|| present(raw.get("from"))),
                ids,
            ),
            target: canonical_id(
                present(raw.get("target")).or_else(|| present(raw.get("to"))),
                ids,
            ),
            weight: raw.get("weight").and_then(Value::as_f64),
        });
    }

    Ok(GraphData { nodes, edges })
}

fn sanitize_node(raw: &Value, idx: usize, ids: &mut dyn IdSource) -> GraphNode {
    let raw_id = present(raw.get("id"));
    let id = match raw_id {
        Some(value) => canonical_id(Some(value), ids),
        None => idx.to_string(),
    };
    let label = present(raw.get("label"))
        .or(raw_id)
        .map(js_string)
        .unwrap_or_else(|| idx.to_string());
    let label = if label.is_empty() { id.clone() } else { label };

    GraphNode {
        id,
        label,
        x: raw.get("x").and_then(Value::as_f64),
        y: raw.get("y").and_then(Value::as_f64),
    }
}
