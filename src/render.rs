use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::{Annotation, VisualizationPlan, VisualizationStep};
use crate::layout::{
    ArrayLayout, Canvas, DiagramLayout, EdgeLayout, GraphLayout, Layout, PositionedNode,
    TreeLayout, compute_layout,
};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const FALLBACK_LINE_HEIGHT: f32 = 16.0;
const FALLBACK_FONT: &str = "ui-monospace, SFMono-Regular, Menlo, monospace";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub canvas: Canvas,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self {
            theme: Theme::classic(),
            layout: LayoutConfig::default(),
            canvas: Canvas::new(600.0, 400.0),
        }
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            ..Self::classic()
        }
    }

    pub fn with_canvas(mut self, width: f32, height: f32) -> Self {
        self.canvas = Canvas::new(width, height);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

/// Lay out and render one step of a sanitized plan.
pub fn render_step_with_options(
    plan: &VisualizationPlan,
    index: usize,
    options: &RenderOptions,
) -> Result<String> {
    let step = plan.step(index).ok_or_else(|| {
        anyhow::anyhow!(
            "step {} out of range (plan has {} steps)",
            index,
            plan.steps.len()
        )
    })?;
    let layout = compute_layout(step, options.canvas, &options.layout);
    Ok(render_step_svg(step, &layout, &options.theme, &options.layout))
}

pub fn render_step_svg(
    step: &VisualizationStep,
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    let width = layout.canvas.width;
    let height = layout.canvas.height;
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    match &layout.diagram {
        DiagramLayout::Array(array) => render_array(&mut svg, array, theme, config),
        DiagramLayout::Tree(tree) => render_tree(&mut svg, tree, theme),
        DiagramLayout::Graph(graph) => render_graph(&mut svg, graph, theme),
        DiagramLayout::Fallback { .. } => render_fallback(&mut svg, step, theme),
    }

    for annotation in &step.annotations {
        svg.push_str(&annotation_svg(annotation, theme));
    }

    svg.push_str("</svg>");
    svg
}

fn render_array(svg: &mut String, array: &ArrayLayout, theme: &Theme, config: &LayoutConfig) {
    let radius = config.array.corner_radius;
    for cell in &array.cells {
        let (fill, stroke, text_fill) = if cell.highlighted {
            (&theme.highlight_fill, &theme.highlight_border, &theme.highlight_text_color)
        } else {
            (&theme.cell_fill, &theme.cell_border, &theme.text_color)
        };
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"1.4\"/>",
            cell.x, cell.y, cell.width, cell.height,
        ));
        let center_x = cell.x + cell.width / 2.0;
        let center_y = cell.y + cell.height / 2.0;
        svg.push_str(&centered_text(
            center_x,
            center_y,
            &cell.label,
            theme,
            text_fill,
            theme.font_size,
        ));
        svg.push_str(&centered_text(
            center_x,
            array.index_label_y,
            &cell.index.to_string(),
            theme,
            &theme.muted_text_color,
            theme.font_size * 0.8,
        ));
    }
}

fn render_tree(svg: &mut String, tree: &TreeLayout, theme: &Theme) {
    let r = tree.node_radius;
    for edge in &tree.edges {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\"/>",
            edge.start.0,
            edge.start.1 + r,
            edge.end.0,
            edge.end.1 - r,
            theme.line_color
        ));
    }
    for node in &tree.nodes {
        svg.push_str(&node_svg(node, r, theme));
    }
}

fn render_graph(svg: &mut String, graph: &GraphLayout, theme: &Theme) {
    svg.push_str("<defs>");
    for (id, color) in [
        ("arrow", &theme.line_color),
        ("arrow-active", &theme.highlight_border),
    ] {
        svg.push_str(&format!(
            "<marker id=\"{id}\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{color}\"/></marker>",
        ));
    }
    svg.push_str("</defs>");

    let r = graph.node_radius;
    for edge in &graph.edges {
        let ((x1, y1), (x2, y2)) = trim_to_circles(edge, r);
        let (stroke, marker, stroke_width) = if edge.highlighted {
            (&theme.highlight_border, "arrow-active", 3.0)
        } else {
            (&theme.line_color, "arrow", 2.0)
        };
        svg.push_str(&format!(
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\" marker-end=\"url(#{marker})\"/>",
        ));
        if let Some(weight) = edge.weight {
            svg.push_str(&weight_badge(edge, weight, theme));
        }
    }
    for node in &graph.nodes {
        svg.push_str(&node_svg(node, r, theme));
    }
}

/// Shorten an edge so it starts and ends on the node outlines. Coincident
/// endpoints are left untouched.
fn trim_to_circles(edge: &EdgeLayout, radius: f32) -> ((f32, f32), (f32, f32)) {
    let dx = edge.end.0 - edge.start.0;
    let dy = edge.end.1 - edge.start.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= radius * 2.0 {
        return (edge.start, edge.end);
    }
    let ux = dx / len * radius;
    let uy = dy / len * radius;
    (
        (edge.start.0 + ux, edge.start.1 + uy),
        (edge.end.0 - ux, edge.end.1 - uy),
    )
}

fn weight_badge(edge: &EdgeLayout, weight: f64, theme: &Theme) -> String {
    let (x, y) = edge.midpoint();
    let text = crate::sanitize::coerce::float_text(weight);
    let width = text.chars().count() as f32 * theme.font_size * 0.6 + 10.0;
    let height = theme.font_size + 6.0;
    let mut out = format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        x - width / 2.0,
        y - height / 2.0,
        theme.weight_fill,
        theme.weight_border
    );
    out.push_str(&centered_text(
        x,
        y,
        &text,
        theme,
        &theme.text_color,
        theme.font_size * 0.85,
    ));
    out
}

fn node_svg(node: &PositionedNode, radius: f32, theme: &Theme) -> String {
    let (fill, stroke, text_fill) = if node.highlighted {
        (&theme.highlight_fill, &theme.highlight_border, &theme.highlight_text_color)
    } else {
        (&theme.cell_fill, &theme.cell_border, &theme.text_color)
    };
    let mut out = format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"2\"/>",
        node.x, node.y
    );
    out.push_str(&centered_text(
        node.x,
        node.y,
        &node.label,
        theme,
        text_fill,
        theme.font_size,
    ));
    out
}

fn render_fallback(svg: &mut String, step: &VisualizationStep, theme: &Theme) {
    let x = 16.0;
    let mut y = 28.0;
    svg.push_str(&format!(
        "<text x=\"{x}\" y=\"{y}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{} step</text>",
        theme.font_family,
        theme.font_size,
        theme.text_color,
        escape_xml(step.kind().as_str())
    ));
    y += FALLBACK_LINE_HEIGHT * 1.5;

    let pretty = serde_json::to_string_pretty(&step.data).unwrap_or_default();
    svg.push_str(&format!(
        "<text x=\"{x}\" y=\"{y}\" font-family=\"{FALLBACK_FONT}\" font-size=\"{}\" fill=\"{}\" xml:space=\"preserve\">",
        theme.font_size * 0.85,
        theme.muted_text_color
    ));
    for (idx, line) in pretty.lines().enumerate() {
        let dy = if idx == 0 { 0.0 } else { FALLBACK_LINE_HEIGHT };
        svg.push_str(&format!(
            "<tspan x=\"{x}\" dy=\"{dy}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    svg.push_str("</text>");
}

fn annotation_svg(annotation: &Annotation, theme: &Theme) -> String {
    let fill = annotation
        .style
        .get("color")
        .map(String::as_str)
        .unwrap_or(theme.text_color.as_str());
    let font_size = annotation
        .style
        .get("fontSize")
        .and_then(|size| size.trim_end_matches("px").parse::<f32>().ok())
        .unwrap_or(theme.font_size * 0.85);
    let weight = annotation
        .style
        .get("fontWeight")
        .map(|w| format!(" font-weight=\"{}\"", escape_xml(w)))
        .unwrap_or_default();
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{}\"{weight}>{}</text>",
        annotation.position.x,
        annotation.position.y,
        theme.font_family,
        escape_xml(fill),
        escape_xml(&annotation.text)
    )
}

fn centered_text(x: f32, y: f32, text: &str, theme: &Theme, fill: &str, size: f32) -> String {
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{size}\" fill=\"{fill}\">{}</text>",
        theme.font_family,
        escape_xml(text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
