#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod response;
pub mod sanitize;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, SanitizeConfig, load_config};
pub use ir::{StepKind, VisualizationPlan, VisualizationStep};
pub use layout::{Canvas, Layout, compute_layout};
pub use render::{RenderOptions, render_step_svg, render_step_with_options};
pub use response::{AlgorithmSolution, ResponseError, extract_plan, parse_solution};
#[cfg(feature = "random-ids")]
pub use sanitize::{RandomIds, sanitize_plan};
pub use sanitize::{IdSource, SequentialIds, sanitize_plan_with, sanitize_step};
pub use theme::Theme;
