mod annotation;
mod array;
pub(crate) mod coerce;
mod graph;
pub mod ids;
mod tree;

use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::config::SanitizeConfig;
use crate::ir::{Complexity, StepData, StepKind, VisualizationPlan, VisualizationStep};
use annotation::sanitize_annotations;
use coerce::{is_truthy, js_string, present, truthy_text};
#[cfg(feature = "random-ids")]
pub use ids::RandomIds;
pub use ids::{IdSource, SequentialIds};

const DEFAULT_TITLE: &str = "Visualization";
const DEFAULT_ALGORITHM_TYPE: &str = "generic";

/// Why a step payload could not be canonicalized for its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepRejection {
    #[error("tree step has neither `tree` nor `root`")]
    MissingRoot,
    #[error("graph node {0} is null")]
    NullNode(usize),
    #[error("graph edge {0} is null")]
    NullEdge(usize),
}

/// Sanitize with default settings and random fallback ids.
#[cfg(feature = "random-ids")]
pub fn sanitize_plan(raw: &Value) -> VisualizationPlan {
    sanitize_plan_with(raw, &SanitizeConfig::default(), &mut RandomIds)
}

/// Never fails: malformed fields are defaulted and undrawable steps become
/// `custom` with their data attached.
pub fn sanitize_plan_with(
    raw: &Value,
    config: &SanitizeConfig,
    ids: &mut dyn IdSource,
) -> VisualizationPlan {
    let steps: Vec<VisualizationStep> = raw
        .get("steps")
        .and_then(Value::as_array)
        .map(|steps| {
            steps
                .iter()
                .enumerate()
                .map(|(index, step)| sanitize_step(step, index, config, ids))
                .collect()
        })
        .unwrap_or_default();

    let complexity = match raw.get("complexity").filter(|c| c.is_object()) {
        Some(raw_complexity) => {
            let defaults = Complexity::default();
            Complexity {
                time: truthy_text(raw_complexity.get("time")).unwrap_or(defaults.time),
                space: truthy_text(raw_complexity.get("space")).unwrap_or(defaults.space),
            }
        }
        None => Complexity::default(),
    };

    let plan = VisualizationPlan {
        title: truthy_text(raw.get("title")).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: truthy_text(raw.get("description")).unwrap_or_default(),
        algorithm_type: truthy_text(raw.get("algorithmType"))
            .unwrap_or_else(|| DEFAULT_ALGORITHM_TYPE.to_string()),
        complexity,
        steps,
        initial_state: sanitize_state(raw.get("initialState")),
        final_state: sanitize_state(raw.get("finalState")),
    };
    tracing::debug!(title = %plan.title, steps = plan.steps.len(), "sanitized plan");
    plan
}

pub fn sanitize_step(
    raw: &Value,
    index: usize,
    config: &SanitizeConfig,
    ids: &mut dyn IdSource,
) -> VisualizationStep {
    let id = truthy_text(raw.get("id")).unwrap_or_else(|| index.to_string());
    let description =
        truthy_text(raw.get("description")).unwrap_or_else(|| format!("Step {}", index + 1));
    let kind = raw
        .get("type")
        .and_then(Value::as_str)
        .and_then(StepKind::from_token)
        .unwrap_or(StepKind::Custom);
    let raw_data = raw.get("data").filter(|data| is_truthy(data));
    let raw_highlights = raw
        .get("highlights")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let annotations = sanitize_annotations(raw.get("annotations"));

    let empty = Value::Object(Map::new());
    let data = raw_data.unwrap_or(&empty);
    let passthrough = || data.clone();

    let outcome = match kind {
        StepKind::Array => {
            let (array, highlights) = array::sanitize_array(data, raw_highlights);
            Ok((StepData::Array(array), highlights))
        }
        StepKind::Tree => tree::sanitize_tree(data, config.max_tree_depth, ids)
            .map(|tree| (StepData::Tree(tree), plain_highlights(raw_highlights))),
        StepKind::Graph => graph::sanitize_graph(data, ids)
            .map(|graph| (StepData::Graph(graph), plain_highlights(raw_highlights))),
        StepKind::Flow => Ok((StepData::Flow(passthrough()), plain_highlights(raw_highlights))),
        StepKind::Chart => Ok((StepData::Chart(passthrough()), plain_highlights(raw_highlights))),
        StepKind::Custom => Ok((StepData::Custom(passthrough()), plain_highlights(raw_highlights))),
    };

    let (data, highlights) = match outcome {
        Ok(sanitized) => sanitized,
        Err(rejection) => {
            tracing::debug!(step = index, %kind, reason = %rejection, "downgrading step to custom");
            (StepData::Custom(passthrough()), plain_highlights(raw_highlights))
        }
    };

    VisualizationStep {
        id,
        description,
        data,
        highlights,
        annotations,
    }
}

fn plain_highlights(raw: &[Value]) -> Vec<String> {
    raw.iter().map(js_string).collect()
}

fn sanitize_state(raw: Option<&Value>) -> Value {
    match present(raw) {
        Some(Value::String(description)) => json!({ "description": description, "data": {} }),
        Some(state) => state.clone(),
        None => Value::Object(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sanitize(raw: Value) -> VisualizationPlan {
        sanitize_plan_with(&raw, &SanitizeConfig::default(), &mut SequentialIds::default())
    }

    fn step(raw: Value) -> VisualizationStep {
        sanitize_step(&raw, 0, &SanitizeConfig::default(), &mut SequentialIds::default())
    }

    #[test]
    fn plan_defaults_fill_missing_fields() {
        let plan = sanitize(json!({}));
        assert_eq!(plan.title, "Visualization");
        assert_eq!(plan.description, "");
        assert_eq!(plan.algorithm_type, "generic");
        assert_eq!(plan.complexity, Complexity::default());
        assert!(plan.steps.is_empty());
        assert_eq!(plan.initial_state, json!({}));
        assert_eq!(plan.final_state, json!({}));
    }

    #[test]
    fn non_object_plans_are_tolerated() {
        for raw in [json!(null), json!(3), json!("plan"), json!([1, 2])] {
            let plan = sanitize(raw);
            assert!(plan.steps.is_empty());
        }
        let plan = sanitize(json!({"steps": {"0": {}}}));
        assert!(plan.steps.is_empty());
    }

    #[test]
    fn step_count_is_preserved() {
        let plan = sanitize(json!({"steps": [null, 1, "x", {}, {"type": "tree"}]}));
        assert_eq!(plan.steps.len(), 5);
        assert!(plan.steps.iter().all(|s| !s.id.is_empty() && !s.description.is_empty()));
        assert_eq!(plan.steps[3].id, "3");
        assert_eq!(plan.steps[3].description, "Step 4");
    }

    #[test]
    fn string_states_are_promoted() {
        let plan = sanitize(json!({"initialState": "unsorted", "finalState": {"data": {"a": 1}}}));
        assert_eq!(plan.initial_state, json!({"description": "unsorted", "data": {}}));
        assert_eq!(plan.final_state, json!({"data": {"a": 1}}));
    }

    #[test]
    fn partial_complexity_keeps_known_fields() {
        let plan = sanitize(json!({"complexity": {"time": "O(n)"}}));
        assert_eq!(plan.complexity.time, "O(n)");
        assert_eq!(plan.complexity.space, "—");
    }

    #[test]
    fn falsy_ids_fall_back_to_index() {
        let sanitized = sanitize_step(
            &json!({"id": 0, "description": ""}),
            4,
            &SanitizeConfig::default(),
            &mut SequentialIds::default(),
        );
        assert_eq!(sanitized.id, "4");
        assert_eq!(sanitized.description, "Step 5");
    }

    #[test]
    fn tree_without_root_becomes_custom_with_data_preserved() {
        let sanitized = step(json!({"type": "tree", "data": {}, "highlights": ["x"]}));
        assert_eq!(sanitized.kind(), StepKind::Custom);
        assert_eq!(sanitized.data, StepData::Custom(json!({})));
        assert_eq!(sanitized.highlights, vec!["x"]);

        let sanitized = step(json!({"type": "tree", "data": {"nodes": [1, 2]}}));
        assert_eq!(sanitized.data, StepData::Custom(json!({"nodes": [1, 2]})));
    }

    #[test]
    fn null_graph_entries_downgrade_to_custom() {
        let raw_data = json!({"nodes": [{"id": "A"}, null], "edges": []});
        let sanitized = step(json!({"type": "graph", "data": raw_data.clone()}));
        assert_eq!(sanitized.data, StepData::Custom(raw_data));
    }

    #[test]
    fn unknown_types_become_custom() {
        let sanitized = step(json!({"type": "heatmap", "data": {"cells": []}}));
        assert_eq!(sanitized.data, StepData::Custom(json!({"cells": []})));

        let sanitized = step(json!({"type": "flow", "data": {"steps": ["a"]}}));
        assert_eq!(sanitized.kind(), StepKind::Flow);
    }

    #[test]
    fn array_step_scenario() {
        let sanitized = step(json!({
            "type": "array",
            "data": {"elements": [2, 7, 11, 15]},
            "highlights": ["0"]
        }));
        assert_eq!(sanitized.highlights, vec!["0"]);

        let sanitized = step(json!({
            "type": "array",
            "data": {"elements": [2, 7, 11, 15]},
            "highlights": ["15"]
        }));
        assert_eq!(sanitized.highlights, vec!["3"]);
    }

    #[test]
    fn serialized_step_has_canonical_shape() {
        let sanitized = step(json!({
            "id": "s1",
            "description": "d",
            "type": "graph",
            "data": {"nodes": [{"id": "A"}], "edges": [{"from": "A", "to": "B"}]},
            "annotations": [{"text": "t", "position": {"x": 1, "y": 2}}]
        }));
        assert_eq!(
            serde_json::to_value(&sanitized).unwrap(),
            json!({
                "id": "s1",
                "description": "d",
                "type": "graph",
                "data": {
                    "nodes": [{"id": "A", "label": "A"}],
                    "edges": [{"source": "A", "target": "B"}]
                },
                "highlights": [],
                "annotations": [{"text": "t", "position": {"x": 1.0, "y": 2.0}, "style": {}}]
            })
        );
    }

    #[test]
    fn resanitizing_is_stable() {
        let raw = json!({
            "title": "BST insert",
            "steps": [
                {"type": "tree", "data": {"root": {"value": 5, "left": {"value": 5}}}},
                {"type": "array", "data": {"values": [3, {"k": 1}]}, "highlights": [1]},
                {"type": "graph", "data": {"nodes": [{"id": "A", "x": 3}], "edges": []}}
            ]
        });
        let first = sanitize(raw);
        let first_json = serde_json::to_value(&first).unwrap();
        let second = sanitize(first_json.clone());
        assert_eq!(serde_json::to_value(&second).unwrap(), first_json);
    }
}
