use crate::ir::{StepKind, VisualizationStep};
use crate::layout::{Canvas, DiagramLayout, FallbackReason, GraphStrategy, Layout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub step_id: String,
    pub kind: StepKind,
    pub canvas: Canvas,
    pub view: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<GraphStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub cells: Vec<CellDump>,
    pub skipped_edges: usize,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub highlighted: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub points: [[f32; 2]; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub highlighted: bool,
}

#[derive(Debug, Serialize)]
pub struct CellDump {
    pub index: usize,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub highlighted: bool,
}

impl LayoutDump {
    pub fn from_layout(step: &VisualizationStep, layout: &Layout) -> Self {
        let nodes = layout
            .nodes()
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                label: node.label.clone(),
                x: node.x,
                y: node.y,
                highlighted: node.highlighted,
            })
            .collect();

        let edges = layout
            .edges()
            .iter()
            .map(|edge| EdgeDump {
                from: edge.from.clone(),
                to: edge.to.clone(),
                points: [[edge.start.0, edge.start.1], [edge.end.0, edge.end.1]],
                weight: edge.weight,
                highlighted: edge.highlighted,
            })
            .collect();

        let mut cells = Vec::new();
        let mut strategy = None;
        let mut fallback = None;
        let mut skipped_edges = 0;
        let view = match &layout.diagram {
            DiagramLayout::Array(array) => {
                cells = array
                    .cells
                    .iter()
                    .map(|cell| CellDump {
                        index: cell.index,
                        label: cell.label.clone(),
                        x: cell.x,
                        y: cell.y,
                        width: cell.width,
                        height: cell.height,
                        highlighted: cell.highlighted,
                    })
                    .collect();
                "array"
            }
            DiagramLayout::Tree(_) => "tree",
            DiagramLayout::Graph(graph) => {
                strategy = Some(graph.strategy);
                skipped_edges = graph.skipped_edges;
                "graph"
            }
            DiagramLayout::Fallback { reason } => {
                fallback = Some(*reason);
                "fallback"
            }
        };

        LayoutDump {
            step_id: step.id.clone(),
            kind: layout.kind,
            canvas: layout.canvas,
            view,
            strategy,
            fallback,
            nodes,
            edges,
            cells,
            skipped_edges,
        }
    }
}

pub fn write_layout_dump(
    path: Option<&Path>,
    step: &VisualizationStep,
    layout: &Layout,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(step, layout);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }
    Ok(())
}
