use crate::config::TreeLayoutConfig;
use crate::ir::TreeNode;
use crate::sanitize::coerce::js_string;

use super::types::{Canvas, EdgeLayout, PositionedNode, TreeLayout};

/// Top-down binary layout. The horizontal offset of a child halves at every
/// level, so a balanced tree never spreads wider than the available width.
pub fn layout_tree(
    root: &TreeNode,
    highlights: &[String],
    canvas: Canvas,
    config: &TreeLayoutConfig,
) -> TreeLayout {
    let margin = config.margin;
    let available_width = (canvas.width - margin * 2.0).max(config.min_available_width);

    let mut nodes: Vec<PositionedNode> = Vec::new();
    let mut edges: Vec<EdgeLayout> = Vec::new();

    struct Pending<'a> {
        node: &'a TreeNode,
        x: f32,
        y: f32,
        level: i32,
        parent: Option<usize>,
    }

    let mut stack = vec![Pending {
        node: root,
        x: canvas.width / 2.0,
        y: config.top,
        level: 0,
        parent: None,
    }];

    while let Some(Pending {
        node,
        x,
        y,
        level,
        parent,
    }) = stack.pop()
    {
        let (x, y) = canvas.clamp(x, y, margin);
        let label = js_string(&node.value);
        let highlighted = highlights.iter().any(|h| *h == node.id || *h == label);
        let index = nodes.len();
        nodes.push(PositionedNode {
            id: node.id.clone(),
            label,
            x,
            y,
            highlighted,
        });

        if let Some(parent_idx) = parent {
            let from = &nodes[parent_idx];
            edges.push(EdgeLayout {
                from: from.id.clone(),
                to: node.id.clone(),
                start: (from.x, from.y),
                end: (x, y),
                weight: None,
                highlighted: false,
            });
        }

        let spread = available_width / 2f32.powi(level + 1);
        let child_y = y + config.level_height;
        // Right first so the left subtree pops first and output stays pre-order.
        if let Some(right) = node.right.as_deref() {
            stack.push(Pending {
                node: right,
                x: x + spread,
                y: child_y,
                level: level + 1,
                parent: Some(index),
            });
        }
        if let Some(left) = node.left.as_deref() {
            stack.push(Pending {
                node: left,
                x: x - spread,
                y: child_y,
                level: level + 1,
                parent: Some(index),
            });
        }
    }

    tracing::trace!(nodes = nodes.len(), "tree layout");

    TreeLayout {
        nodes,
        edges,
        node_radius: config.node_radius,
        margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, left: Option<TreeNode>, right: Option<TreeNode>) -> TreeNode {
        TreeNode {
            id: id.to_string(),
            value: json!(id),
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    fn leaf(id: &str) -> TreeNode {
        node(id, None, None)
    }

    fn position<'a>(layout: &'a TreeLayout, id: &str) -> &'a PositionedNode {
        layout.nodes.iter().find(|n| n.id == id).unwrap()
    }

    #[test]
    fn root_only_is_centered_at_top() {
        let layout = layout_tree(
            &leaf("r"),
            &[],
            Canvas::new(600.0, 400.0),
            &TreeLayoutConfig::default(),
        );
        assert_eq!(layout.nodes.len(), 1);
        assert_eq!((layout.nodes[0].x, layout.nodes[0].y), (300.0, 40.0));
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn children_split_by_half_the_available_width() {
        let tree = node("r", Some(leaf("a")), Some(node("b", Some(leaf("c")), None)));
        let layout = layout_tree(&tree, &[], Canvas::new(600.0, 400.0), &TreeLayoutConfig::default());
        // available width 536: root children at +-268, grandchildren at +-134
        assert_eq!(position(&layout, "a").x, 32.0);
        assert_eq!(position(&layout, "b").x, 568.0);
        assert_eq!(position(&layout, "c").x, 434.0);
        assert_eq!(position(&layout, "a").y, 120.0);
        assert_eq!(position(&layout, "c").y, 200.0);
        let order: Vec<&str> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["r", "a", "b", "c"]);
        assert_eq!(layout.edges.len(), 3);
    }

    #[test]
    fn deep_chains_stay_inside_the_canvas() {
        let mut tree = leaf("n0");
        for i in 1..30 {
            tree = node(&format!("n{i}"), None, Some(tree));
        }
        let canvas = Canvas::new(300.0, 200.0);
        let config = TreeLayoutConfig::default();
        let layout = layout_tree(&tree, &[], canvas, &config);
        assert_eq!(layout.nodes.len(), 30);
        for n in &layout.nodes {
            assert!(canvas.contains(n.x, n.y, config.margin), "{} escaped: {:?}", n.id, n);
        }
    }

    #[test]
    fn highlights_match_id_or_value() {
        let tree = TreeNode {
            id: "root".to_string(),
            value: json!(8),
            left: Some(Box::new(leaf("x"))),
            right: None,
        };
        let highlights = vec!["8".to_string()];
        let layout = layout_tree(&tree, &highlights, Canvas::new(600.0, 400.0), &TreeLayoutConfig::default());
        assert!(layout.nodes[0].highlighted);
        assert_eq!(layout.nodes[0].label, "8");
        assert!(!layout.nodes[1].highlighted);
    }

    #[test]
    fn layout_is_idempotent() {
        let tree = node("r", Some(leaf("a")), Some(leaf("b")));
        let canvas = Canvas::new(480.0, 320.0);
        let config = TreeLayoutConfig::default();
        assert_eq!(
            layout_tree(&tree, &[], canvas, &config),
            layout_tree(&tree, &[], canvas, &config)
        );
    }
}
