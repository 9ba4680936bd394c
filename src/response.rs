use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::SanitizeConfig;
use crate::ir::VisualizationPlan;
use crate::sanitize::coerce::truthy_text;
use crate::sanitize::{IdSource, sanitize_plan_with};

const DEFAULT_LANGUAGE: &str = "python";

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("generator response is empty")]
    Empty,
    #[error("no JSON object found in generator response")]
    NoJsonObject,
    #[error("invalid JSON in generator response: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("generator response has no visualization plan")]
    MissingPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmSolution {
    pub explanation: String,
    pub code: String,
    pub language: String,
    pub visualization_plan: VisualizationPlan,
}

/// Parse the response text into a JSON document, falling back to the span
/// between the first `{` and the last `}`.
pub fn parse_document(text: &str) -> Result<Value, ResponseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ResponseError::Empty);
    }
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }
    let start = trimmed.find('{').ok_or(ResponseError::NoJsonObject)?;
    let end = trimmed.rfind('}').ok_or(ResponseError::NoJsonObject)?;
    if end < start {
        return Err(ResponseError::NoJsonObject);
    }
    Ok(serde_json::from_str(&trimmed[start..=end])?)
}

/// The raw plan: `visualizationPlan` of a solution document, or the document
/// itself when it already looks like a plan.
pub fn extract_plan(text: &str) -> Result<Value, ResponseError> {
    let document = parse_document(text)?;
    plan_value(document)
}

fn plan_value(mut document: Value) -> Result<Value, ResponseError> {
    if let Some(plan) = document
        .get_mut("visualizationPlan")
        .filter(|plan| plan.is_object())
    {
        return Ok(plan.take());
    }
    if document.get("steps").is_some() {
        return Ok(document);
    }
    Err(ResponseError::MissingPlan)
}

pub fn parse_solution(
    text: &str,
    config: &SanitizeConfig,
    ids: &mut dyn IdSource,
) -> Result<AlgorithmSolution, ResponseError> {
    let document = parse_document(text)?;
    let explanation = truthy_text(document.get("explanation")).unwrap_or_default();
    let code = truthy_text(document.get("code")).unwrap_or_default();
    let language =
        truthy_text(document.get("language")).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let raw_plan = plan_value(document)?;
    let visualization_plan = sanitize_plan_with(&raw_plan, config, ids);
    tracing::debug!(
        language = %language,
        steps = visualization_plan.steps.len(),
        "parsed generator solution"
    );
    Ok(AlgorithmSolution {
        explanation,
        code,
        language,
        visualization_plan,
    })
}
