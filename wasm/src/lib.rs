use algoviz_plan::layout_dump::LayoutDump;
use algoviz_plan::{
    Canvas, RenderOptions, SanitizeConfig, SequentialIds, VisualizationPlan, compute_layout,
    extract_plan, render_step_with_options, sanitize_plan_with,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

const ID_PREFIX: &str = "node-";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

fn build_render_options(options: PlanRenderOptions, width: f32, height: f32) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }

    render_options.with_canvas(width, height)
}

fn to_js(error: impl ToString) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Accepts a raw generator response, a solution document or a bare plan.
fn load_plan(text: &str) -> Result<VisualizationPlan, JsValue> {
    let raw = extract_plan(text).map_err(to_js)?;
    Ok(sanitize_plan_with(
        &raw,
        &SanitizeConfig::default(),
        &mut SequentialIds::new(ID_PREFIX),
    ))
}

#[wasm_bindgen]
pub fn sanitize_plan_json(text: &str) -> Result<String, JsValue> {
    let plan = load_plan(text)?;
    serde_json::to_string(&plan).map_err(to_js)
}

#[wasm_bindgen]
pub fn layout_step_json(plan_json: &str, step: usize, width: f32, height: f32) -> Result<String, JsValue> {
    let plan = load_plan(plan_json)?;
    let visual_step = plan
        .step(step)
        .ok_or_else(|| to_js(format!("step {step} out of range (plan has {} steps)", plan.steps.len())))?;
    let layout = compute_layout(
        visual_step,
        Canvas::new(width, height),
        &RenderOptions::default().layout,
    );
    serde_json::to_string(&LayoutDump::from_layout(visual_step, &layout)).map_err(to_js)
}

#[wasm_bindgen]
pub fn render_step_svg(
    plan_json: &str,
    step: usize,
    width: f32,
    height: f32,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<PlanRenderOptions>(&raw_options).map_err(to_js)?
    } else {
        PlanRenderOptions::default()
    };

    let plan = load_plan(plan_json)?;
    let render_options = build_render_options(options, width, height);
    render_step_with_options(&plan, step, &render_options).map_err(to_js)
}

#[cfg(test)]
mod tests {
    use algoviz_plan::render_step_with_options;

    use crate::{PlanRenderOptions, build_render_options, layout_step_json, load_plan, sanitize_plan_json};

    const TREE_PLAN: &str = r#"{"title": "BST", "steps": [
  {"type": "tree", "data": {"root": {"value": 5, "leftChild": {"value": 3}, "rightChild": {"id": ""}}}},
  {"type": "tree", "data": {}}
]}"#;

    #[test]
    fn sanitizes_plan_to_json_with_stable_ids() {
        let json = sanitize_plan_json(TREE_PLAN).expect("plan should sanitize");
        let plan: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(plan["title"], "BST");
        assert_eq!(plan["steps"][0]["data"]["tree"]["left"]["id"], "3");
        assert_eq!(plan["steps"][0]["data"]["tree"]["right"]["id"], "node-0");
        assert_eq!(plan["steps"][1]["type"], "custom");
    }

    #[test]
    fn layout_json_reports_positions_for_the_requested_step() {
        let json = layout_step_json(TREE_PLAN, 0, 600.0, 400.0).expect("step 0 should lay out");
        let dump: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(dump["view"], "tree");
        assert_eq!(dump["nodes"][0]["x"], 300.0);
        assert_eq!(dump["nodes"][0]["y"], 40.0);
        assert_eq!(dump["edges"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn renders_graph_step_from_generator_response() {
        let text = r#"Here you go:
{"visualizationPlan": {"steps": [
  {"type": "graph", "data": {
    "nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
    "edges": [{"from": "A", "to": "B", "weight": 7}, {"from": "B", "to": "C"}]
  }, "highlights": ["B"]}
]}}"#;

        let plan = load_plan(text).expect("response should contain a plan");
        let options = build_render_options(
            PlanRenderOptions {
                theme: Some("modern".to_string()),
                font_family: None,
                font_size: Some(12.0),
            },
            480.0,
            320.0,
        );
        let svg = render_step_with_options(&plan, 0, &options).expect("graph step should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("width=\"480\""));
        assert!(svg.contains(">7</text>"));
    }
}
