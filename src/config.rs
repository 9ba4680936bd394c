use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizeConfig {
    /// Tree levels kept below the root; deeper subtrees are dropped.
    pub max_tree_depth: usize,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self { max_tree_depth: 64 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeLayoutConfig {
    pub node_radius: f32,
    pub margin: f32,
    pub top: f32,
    pub level_height: f32,
    pub min_available_width: f32,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            node_radius: 20.0,
            margin: 32.0,
            top: 40.0,
            level_height: 80.0,
            min_available_width: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLayoutConfig {
    pub node_radius: f32,
    pub padding: f32,
    pub circular_threshold: usize,
    pub circle_divisor: f32,
    pub min_radius: f32,
    pub min_cell_factor: f32,
}

impl GraphLayoutConfig {
    pub fn margin(&self) -> f32 {
        self.node_radius + self.padding
    }
}

impl Default for GraphLayoutConfig {
    fn default() -> Self {
        Self {
            node_radius: 22.0,
            padding: 32.0,
            circular_threshold: 8,
            circle_divisor: 2.8,
            min_radius: 50.0,
            min_cell_factor: 2.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayLayoutConfig {
    pub max_cell_width: f32,
    pub side_padding: f32,
    pub cell_height: f32,
    pub cell_gap: f32,
    pub index_label_offset: f32,
    pub corner_radius: f32,
}

impl Default for ArrayLayoutConfig {
    fn default() -> Self {
        Self {
            max_cell_width: 60.0,
            side_padding: 40.0,
            cell_height: 40.0,
            cell_gap: 2.0,
            index_label_offset: 15.0,
            corner_radius: 4.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub tree: TreeLayoutConfig,
    pub graph: GraphLayoutConfig,
    pub array: ArrayLayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub sanitize: SanitizeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::classic(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
            sanitize: SanitizeConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    background: Option<String>,
    cell_fill: Option<String>,
    cell_border: Option<String>,
    highlight_fill: Option<String>,
    highlight_border: Option<String>,
    highlight_text_color: Option<String>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    line_color: Option<String>,
    weight_fill: Option<String>,
    weight_border: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TreeConfigFile {
    node_radius: Option<NumberOrString>,
    margin: Option<NumberOrString>,
    top: Option<NumberOrString>,
    level_height: Option<NumberOrString>,
    min_available_width: Option<NumberOrString>,
    max_depth: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GraphConfigFile {
    node_radius: Option<NumberOrString>,
    padding: Option<NumberOrString>,
    circular_threshold: Option<usize>,
    circle_divisor: Option<NumberOrString>,
    min_radius: Option<NumberOrString>,
    min_cell_factor: Option<NumberOrString>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ArrayConfigFile {
    max_cell_width: Option<NumberOrString>,
    side_padding: Option<NumberOrString>,
    cell_height: Option<NumberOrString>,
    cell_gap: Option<NumberOrString>,
    index_label_offset: Option<NumberOrString>,
    corner_radius: Option<NumberOrString>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CanvasConfigFile {
    width: Option<NumberOrString>,
    height: Option<NumberOrString>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    canvas: Option<CanvasConfigFile>,
    tree: Option<TreeConfigFile>,
    graph: Option<GraphConfigFile>,
    array: Option<ArrayConfigFile>,
}

/// Circle radius divisor below which a circular layout could leave the canvas.
const MIN_CIRCLE_DIVISOR: f32 = 2.5;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => tracing::warn!(theme = other, "unknown theme preset, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.cell_fill {
            config.theme.cell_fill = v;
        }
        if let Some(v) = vars.cell_border {
            config.theme.cell_border = v;
        }
        if let Some(v) = vars.highlight_fill {
            config.theme.highlight_fill = v;
        }
        if let Some(v) = vars.highlight_border {
            config.theme.highlight_border = v;
        }
        if let Some(v) = vars.highlight_text_color {
            config.theme.highlight_text_color = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.muted_text_color {
            config.theme.muted_text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.weight_fill {
            config.theme.weight_fill = v;
        }
        if let Some(v) = vars.weight_border {
            config.theme.weight_border = v;
        }
    }

    if let Some(canvas) = parsed.canvas {
        apply_f32(&mut config.render.width, canvas.width.as_ref());
        apply_f32(&mut config.render.height, canvas.height.as_ref());
    }

    if let Some(tree) = parsed.tree {
        let cfg = &mut config.layout.tree;
        apply_f32(&mut cfg.node_radius, tree.node_radius.as_ref());
        apply_f32(&mut cfg.margin, tree.margin.as_ref());
        apply_f32(&mut cfg.top, tree.top.as_ref());
        apply_f32(&mut cfg.level_height, tree.level_height.as_ref());
        apply_f32(&mut cfg.min_available_width, tree.min_available_width.as_ref());
        if let Some(v) = tree.max_depth {
            config.sanitize.max_tree_depth = v.max(1);
        }
    }

    if let Some(graph) = parsed.graph {
        let cfg = &mut config.layout.graph;
        apply_f32(&mut cfg.node_radius, graph.node_radius.as_ref());
        apply_f32(&mut cfg.padding, graph.padding.as_ref());
        if let Some(v) = graph.circular_threshold {
            cfg.circular_threshold = v;
        }
        apply_f32(&mut cfg.circle_divisor, graph.circle_divisor.as_ref());
        cfg.circle_divisor = cfg.circle_divisor.max(MIN_CIRCLE_DIVISOR);
        apply_f32(&mut cfg.min_radius, graph.min_radius.as_ref());
        apply_f32(&mut cfg.min_cell_factor, graph.min_cell_factor.as_ref());
    }

    if let Some(array) = parsed.array {
        let cfg = &mut config.layout.array;
        apply_f32(&mut cfg.max_cell_width, array.max_cell_width.as_ref());
        apply_f32(&mut cfg.side_padding, array.side_padding.as_ref());
        apply_f32(&mut cfg.cell_height, array.cell_height.as_ref());
        apply_f32(&mut cfg.cell_gap, array.cell_gap.as_ref());
        apply_f32(&mut cfg.index_label_offset, array.index_label_offset.as_ref());
        apply_f32(&mut cfg.corner_radius, array.corner_radius.as_ref());
    }

    Ok(config)
}

/// Overwrite `target` with a finite, non-negative value from the file.
fn apply_f32(target: &mut f32, value: Option<&NumberOrString>) {
    if let Some(v) = value.and_then(NumberOrString::as_f32) {
        if v.is_finite() && v >= 0.0 {
            *target = v;
        } else {
            tracing::warn!(value = v, "ignoring non-finite or negative config value");
        }
    }
}
