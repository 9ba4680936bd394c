use std::collections::HashMap;
use std::f32::consts::PI;

use crate::config::GraphLayoutConfig;
use crate::ir::GraphData;

use super::types::{Canvas, EdgeLayout, GraphLayout, GraphStrategy, PositionedNode};

/// Circle for small graphs, grid past `circular_threshold`. Nodes with both
/// coordinates preset keep them (clamped), but still occupy their slot.
pub fn layout_graph(
    graph: &GraphData,
    highlights: &[String],
    canvas: Canvas,
    config: &GraphLayoutConfig,
) -> GraphLayout {
    let margin = config.margin();
    let available_width = (canvas.width - margin * 2.0).max(0.0);
    let available_height = (canvas.height - margin * 2.0).max(0.0);
    let count = graph.nodes.len();

    let strategy = if count == 0 {
        GraphStrategy::Empty
    } else if count <= config.circular_threshold {
        let fitted = available_width.min(available_height) / config.circle_divisor;
        GraphStrategy::Circular {
            radius: config.min_radius.max(fitted),
        }
    } else {
        let cols = (count as f64).sqrt().ceil() as usize;
        let rows = count.div_ceil(cols);
        GraphStrategy::Grid { cols, rows }
    };
    tracing::trace!(nodes = count, ?strategy, "graph layout");

    let min_cell = config.node_radius * config.min_cell_factor;
    let nodes: Vec<PositionedNode> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let (x, y) = match (node.x, node.y) {
                (Some(x), Some(y)) => (x as f32, y as f32),
                _ => match strategy {
                    GraphStrategy::Circular { radius } => {
                        let angle = 2.0 * PI * index as f32 / count as f32;
                        (
                            canvas.width / 2.0 + radius * angle.cos(),
                            canvas.height / 2.0 + radius * angle.sin(),
                        )
                    }
                    GraphStrategy::Grid { cols, rows } => {
                        let cell_width = (available_width / cols as f32).max(min_cell);
                        let cell_height = (available_height / rows as f32).max(min_cell);
                        let col = index % cols;
                        let row = index / cols;
                        (
                            margin + col as f32 * cell_width + cell_width / 2.0,
                            margin + row as f32 * cell_height + cell_height / 2.0,
                        )
                    }
                    GraphStrategy::Empty => (canvas.width / 2.0, canvas.height / 2.0),
                },
            };
            let (x, y) = canvas.clamp(x, y, margin);
            PositionedNode {
                id: node.id.clone(),
                label: node.label.clone(),
                x,
                y,
                highlighted: highlights.iter().any(|h| *h == node.id || *h == node.label),
            }
        })
        .collect();

    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        by_id.entry(node.id.as_str()).or_insert(idx);
    }

    let mut edges = Vec::with_capacity(graph.edges.len());
    let mut skipped_edges = 0usize;
    for edge in &graph.edges {
        let (Some(&from), Some(&to)) = (
            by_id.get(edge.source.as_str()),
            by_id.get(edge.target.as_str()),
        ) else {
            skipped_edges += 1;
            continue;
        };
        let pair = format!("{}-{}", edge.source, edge.target);
        let highlighted = highlights
            .iter()
            .any(|h| *h == pair || *h == edge.source || *h == edge.target);
        edges.push(EdgeLayout {
            from: edge.source.clone(),
            to: edge.target.clone(),
            start: (nodes[from].x, nodes[from].y),
            end: (nodes[to].x, nodes[to].y),
            weight: edge.weight,
            highlighted,
        });
    }
    if skipped_edges > 0 {
        tracing::debug!(skipped_edges, "edges reference unknown node ids");
    }

    GraphLayout {
        nodes,
        edges,
        strategy,
        skipped_edges,
        node_radius: config.node_radius,
        margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{GraphEdge, GraphNode};

    fn graph(count: usize) -> GraphData {
        GraphData {
            nodes: (0..count)
                .map(|i| GraphNode {
                    id: i.to_string(),
                    label: format!("N{i}"),
                    x: None,
                    y: None,
                })
                .collect(),
            edges: Vec::new(),
        }
    }

    #[test]
    fn ten_nodes_use_a_four_by_three_grid() {
        let canvas = Canvas::new(600.0, 400.0);
        let config = GraphLayoutConfig::default();
        let layout = layout_graph(&graph(10), &[], canvas, &config);
        assert_eq!(layout.strategy, GraphStrategy::Grid { cols: 4, rows: 3 });
        let margin = config.margin();
        for node in &layout.nodes {
            assert!(node.x > margin && node.x < 600.0 - margin, "{node:?}");
            assert!(node.y > margin && node.y < 400.0 - margin, "{node:?}");
        }
        // first cell center: 54 + 492/4/2
        assert_eq!(layout.nodes[0].x, 115.5);
    }

    #[test]
    fn small_graphs_sit_on_a_circle() {
        let canvas = Canvas::new(600.0, 400.0);
        let config = GraphLayoutConfig::default();
        let layout = layout_graph(&graph(5), &[], canvas, &config);
        let GraphStrategy::Circular { radius } = layout.strategy else {
            panic!("expected circular layout, got {:?}", layout.strategy);
        };
        assert!((radius - 292.0 / 2.8).abs() < 1e-3);
        for node in &layout.nodes {
            let dist = ((node.x - 300.0).powi(2) + (node.y - 200.0).powi(2)).sqrt();
            assert!((dist - radius).abs() < 1e-2);
        }
    }

    #[test]
    fn min_radius_circle_is_clamped_on_small_canvases() {
        // 200x160: fitted radius 52/2.8 is below min_radius, so the circle
        // overflows the margin box and clamping pulls nodes inward
        let canvas = Canvas::new(200.0, 160.0);
        let config = GraphLayoutConfig::default();
        let layout = layout_graph(&graph(8), &[], canvas, &config);
        assert_eq!(layout.strategy, GraphStrategy::Circular { radius: 50.0 });
        let dist = |node: &PositionedNode| ((node.x - 100.0).powi(2) + (node.y - 80.0).powi(2)).sqrt();
        for node in &layout.nodes {
            assert!(canvas.contains(node.x, node.y, config.margin()), "{node:?}");
            assert!(dist(node) <= 50.0 + 1e-3);
        }
        assert_eq!((layout.nodes[0].x, layout.nodes[0].y), (146.0, 80.0));
        assert!(layout.nodes.iter().any(|node| dist(node) < 49.0));
    }

    #[test]
    fn preset_coordinates_are_clamped_not_moved() {
        let mut data = graph(3);
        data.nodes[0].x = Some(120.0);
        data.nodes[0].y = Some(90.0);
        data.nodes[1].x = Some(-500.0);
        data.nodes[1].y = Some(5000.0);
        data.nodes[2].x = Some(10.0);
        let layout = layout_graph(&data, &[], Canvas::new(600.0, 400.0), &GraphLayoutConfig::default());
        assert_eq!((layout.nodes[0].x, layout.nodes[0].y), (120.0, 90.0));
        assert_eq!((layout.nodes[1].x, layout.nodes[1].y), (54.0, 346.0));
        // x alone is not enough to pin a node
        assert_ne!(layout.nodes[2].x, 54.0);
    }

    #[test]
    fn dangling_edges_are_skipped_and_counted() {
        let mut data = graph(2);
        data.edges = vec![
            GraphEdge {
                source: "0".to_string(),
                target: "1".to_string(),
                weight: Some(3.0),
            },
            GraphEdge {
                source: "0".to_string(),
                target: "ghost".to_string(),
                weight: None,
            },
        ];
        let highlights = vec!["0-1".to_string()];
        let layout = layout_graph(&data, &highlights, Canvas::new(600.0, 400.0), &GraphLayoutConfig::default());
        assert_eq!(layout.edges.len(), 1);
        assert_eq!(layout.skipped_edges, 1);
        assert!(layout.edges[0].highlighted);
        assert_eq!(layout.edges[0].weight, Some(3.0));
        assert_eq!(layout.edges[0].start, (layout.nodes[0].x, layout.nodes[0].y));
    }

    #[test]
    fn single_node_stays_inside_a_tiny_canvas() {
        let canvas = Canvas::new(80.0, 60.0);
        let config = GraphLayoutConfig::default();
        let layout = layout_graph(&graph(1), &[], canvas, &config);
        let node = &layout.nodes[0];
        assert!(canvas.contains(node.x, node.y, config.margin()));
    }

    #[test]
    fn empty_graph_has_nothing_to_place() {
        let layout = layout_graph(&graph(0), &[], Canvas::new(600.0, 400.0), &GraphLayoutConfig::default());
        assert_eq!(layout.strategy, GraphStrategy::Empty);
        assert!(layout.nodes.is_empty());
    }
}
