mod array;
mod graph;
mod tree;
pub(crate) mod types;
pub use array::layout_array;
pub use graph::layout_graph;
pub use tree::layout_tree;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{StepData, VisualizationStep};

/// Lay out one step for the given canvas. Pure: call again whenever the canvas
/// size or the displayed step changes.
pub fn compute_layout(step: &VisualizationStep, canvas: Canvas, config: &LayoutConfig) -> Layout {
    let diagram = match &step.data {
        StepData::Array(data) if data.elements.is_empty() => DiagramLayout::Fallback {
            reason: FallbackReason::NoElements,
        },
        StepData::Array(data) => {
            DiagramLayout::Array(layout_array(data, &step.highlights, canvas, &config.array))
        }
        StepData::Tree(data) => {
            DiagramLayout::Tree(layout_tree(&data.tree, &step.highlights, canvas, &config.tree))
        }
        StepData::Graph(data) => {
            DiagramLayout::Graph(layout_graph(data, &step.highlights, canvas, &config.graph))
        }
        StepData::Flow(_) | StepData::Chart(_) | StepData::Custom(_) => DiagramLayout::Fallback {
            reason: FallbackReason::UnsupportedKind,
        },
    };

    Layout {
        kind: step.kind(),
        canvas,
        diagram,
    }
}
