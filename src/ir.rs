use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::sanitize::coerce::number_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Array,
    Tree,
    Graph,
    Flow,
    Chart,
    Custom,
}

impl StepKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "array" => Some(Self::Array),
            "tree" => Some(Self::Tree),
            "graph" => Some(Self::Graph),
            "flow" => Some(Self::Flow),
            "chart" => Some(Self::Chart),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Tree => "tree",
            Self::Graph => "graph",
            Self::Flow => "flow",
            Self::Chart => "chart",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value the array renderer can draw directly in a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Number(value) => f.write_str(&number_text(value)),
            Scalar::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayData {
    pub elements: Vec<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub value: Value,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(id: impl Into<String>, value: Value) -> Self {
        Self {
            id: id.into(),
            value,
            left: None,
            right: None,
        }
    }

    /// Nodes in pre-order (node, left subtree, right subtree).
    pub fn preorder(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            if let Some(right) = node.right.as_deref() {
                stack.push(right);
            }
            if let Some(left) = node.left.as_deref() {
                stack.push(left);
            }
        }
        out
    }

    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeData {
    pub tree: TreeNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Step payload, discriminated by the step's `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum StepData {
    Array(ArrayData),
    Tree(TreeData),
    Graph(GraphData),
    Flow(Value),
    Chart(Value),
    Custom(Value),
}

impl StepData {
    pub fn kind(&self) -> StepKind {
        match self {
            StepData::Array(_) => StepKind::Array,
            StepData::Tree(_) => StepKind::Tree,
            StepData::Graph(_) => StepKind::Graph,
            StepData::Flow(_) => StepKind::Flow,
            StepData::Chart(_) => StepKind::Chart,
            StepData::Custom(_) => StepKind::Custom,
        }
    }
}

impl Serialize for StepData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StepData::Array(data) => data.serialize(serializer),
            StepData::Tree(data) => data.serialize(serializer),
            StepData::Graph(data) => data.serialize(serializer),
            StepData::Flow(data) | StepData::Chart(data) | StepData::Custom(data) => {
                data.serialize(serializer)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub position: Position,
    pub style: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualizationStep {
    pub id: String,
    pub description: String,
    pub data: StepData,
    pub highlights: Vec<String>,
    pub annotations: Vec<Annotation>,
}

impl VisualizationStep {
    pub fn kind(&self) -> StepKind {
        self.data.kind()
    }
}

impl Serialize for VisualizationStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("description", &self.description)?;
        map.serialize_entry("type", &self.kind())?;
        map.serialize_entry("data", &self.data)?;
        map.serialize_entry("highlights", &self.highlights)?;
        map.serialize_entry("annotations", &self.annotations)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complexity {
    pub time: String,
    pub space: String,
}

impl Default for Complexity {
    fn default() -> Self {
        Self {
            time: "—".to_string(),
            space: "—".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationPlan {
    pub title: String,
    pub description: String,
    pub algorithm_type: String,
    pub complexity: Complexity,
    pub steps: Vec<VisualizationStep>,
    pub initial_state: Value,
    pub final_state: Value,
}

impl VisualizationPlan {
    pub fn step(&self, index: usize) -> Option<&VisualizationStep> {
        self.steps.get(index)
    }
}
