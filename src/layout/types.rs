use serde::Serialize;

use crate::ir::StepKind;

/// Drawing area supplied by the host, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    /// Non-finite or negative dimensions collapse to zero.
    pub fn new(width: f32, height: f32) -> Self {
        let sane = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }

    /// Clamp a point into `[margin, dimension - margin]` on both axes.
    pub fn clamp(&self, x: f32, y: f32, margin: f32) -> (f32, f32) {
        (
            clamp_axis(x, margin, self.width),
            clamp_axis(y, margin, self.height),
        )
    }

    /// Whether a point lies inside the margin box (inclusive).
    pub fn contains(&self, x: f32, y: f32, margin: f32) -> bool {
        let inside = |v: f32, dim: f32| {
            if dim <= margin * 2.0 {
                (v - dim / 2.0).abs() <= f32::EPSILON * dim.max(1.0)
            } else {
                v >= margin && v <= dim - margin
            }
        };
        inside(x, self.width) && inside(y, self.height)
    }
}

/// Clamp into `[margin, dim - margin]`; when the band is empty the coordinate
/// collapses to the center of the dimension.
pub(crate) fn clamp_axis(value: f32, margin: f32, dim: f32) -> f32 {
    let margin = margin.max(0.0);
    if dim <= margin * 2.0 {
        return dim / 2.0;
    }
    if value.is_nan() {
        return dim / 2.0;
    }
    value.clamp(margin, dim - margin)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    pub from: String,
    pub to: String,
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub weight: Option<f64>,
    pub highlighted: bool,
}

impl EdgeLayout {
    pub fn midpoint(&self) -> (f32, f32) {
        (
            (self.start.0 + self.end.0) / 2.0,
            (self.start.1 + self.end.1) / 2.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeLayout {
    /// Pre-order: each parent precedes its children.
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<EdgeLayout>,
    pub node_radius: f32,
    pub margin: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GraphStrategy {
    Empty,
    Circular { radius: f32 },
    Grid { cols: usize, rows: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphLayout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<EdgeLayout>,
    pub strategy: GraphStrategy,
    /// Edges dropped because an endpoint id names no node.
    pub skipped_edges: usize,
    pub node_radius: f32,
    pub margin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayCell {
    pub index: usize,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayLayout {
    pub cells: Vec<ArrayCell>,
    pub pitch: f32,
    pub index_label_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackReason {
    /// `flow`, `chart` and `custom` steps have no dedicated view.
    UnsupportedKind,
    /// An array step with no elements.
    NoElements,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum DiagramLayout {
    Array(ArrayLayout),
    Tree(TreeLayout),
    Graph(GraphLayout),
    Fallback { reason: FallbackReason },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub kind: StepKind,
    pub canvas: Canvas,
    pub diagram: DiagramLayout,
}

impl Layout {
    /// Positioned tree/graph nodes; empty for other views.
    pub fn nodes(&self) -> &[PositionedNode] {
        match &self.diagram {
            DiagramLayout::Tree(tree) => &tree.nodes,
            DiagramLayout::Graph(graph) => &graph.nodes,
            DiagramLayout::Array(_) | DiagramLayout::Fallback { .. } => &[],
        }
    }

    pub fn edges(&self) -> &[EdgeLayout] {
        match &self.diagram {
            DiagramLayout::Tree(tree) => &tree.edges,
            DiagramLayout::Graph(graph) => &graph.edges,
            DiagramLayout::Array(_) | DiagramLayout::Fallback { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_points_inside_margins() {
        let canvas = Canvas::new(600.0, 400.0);
        assert_eq!(canvas.clamp(-50.0, 900.0, 32.0), (32.0, 368.0));
        assert_eq!(canvas.clamp(300.0, 200.0, 32.0), (300.0, 200.0));
    }

    #[test]
    fn tiny_canvas_collapses_to_center() {
        let canvas = Canvas::new(40.0, 400.0);
        let (x, y) = canvas.clamp(0.0, 0.0, 32.0);
        assert_eq!(x, 20.0);
        assert_eq!(y, 32.0);
        assert!(canvas.contains(x, y, 32.0));
    }

    #[test]
    fn invalid_dimensions_become_zero() {
        let canvas = Canvas::new(f32::NAN, -10.0);
        assert_eq!(canvas, Canvas::new(0.0, 0.0));
        assert_eq!(canvas.clamp(5.0, f32::INFINITY, 10.0), (0.0, 0.0));
    }
}
