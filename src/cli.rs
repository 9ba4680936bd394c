use crate::config::load_config;
use crate::ir::VisualizationPlan;
use crate::layout::{Canvas, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::render::{render_step_svg, write_output_png, write_output_svg};
use crate::response::extract_plan;
use crate::sanitize::{IdSource, RandomIds, SequentialIds, sanitize_plan_with};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "algoviz",
    version,
    about = "Sanitize algorithm visualization plans and lay out their steps"
)]
pub struct Args {
    /// Generator response or plan JSON, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file or directory. Defaults to stdout for json/svg/layout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Step to render (0-based). All steps when omitted.
    #[arg(short = 's', long = "step")]
    pub step: Option<usize>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Generate fallback ids deterministically (id-0, id-1, ...)
    #[arg(long = "stable-ids")]
    pub stable_ids: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
    Png,
    Layout,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json | OutputFormat::Layout => "json",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let raw_plan = extract_plan(&input)?;
    let mut ids: Box<dyn IdSource> = if args.stable_ids {
        Box::new(SequentialIds::default())
    } else {
        Box::new(RandomIds)
    };
    let plan = sanitize_plan_with(&raw_plan, &config.sanitize, ids.as_mut());
    tracing::info!(title = %plan.title, steps = plan.steps.len(), "sanitized plan");

    if args.output_format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&plan)?;
        match args.output.as_deref() {
            Some(path) => std::fs::write(path, json)?,
            None => println!("{json}"),
        }
        return Ok(());
    }

    let canvas = Canvas::new(config.render.width, config.render.height);
    let indices = select_steps(&plan, args.step)?;
    let outputs: Vec<Option<PathBuf>> = if indices.len() == 1 {
        vec![args.output.clone()]
    } else {
        resolve_multi_outputs(args.output.as_deref(), args.output_format, indices.len())?
            .into_iter()
            .map(Some)
            .collect()
    };

    for (index, output) in indices.into_iter().zip(outputs) {
        let step = &plan.steps[index];
        let layout = compute_layout(step, canvas, &config.layout);
        match args.output_format {
            OutputFormat::Layout => {
                write_layout_dump(output.as_deref(), step, &layout)?;
            }
            OutputFormat::Svg => {
                let svg = render_step_svg(step, &layout, &config.theme, &config.layout);
                write_output_svg(&svg, output.as_deref())?;
            }
            OutputFormat::Png => {
                let output = ensure_output(&output, "png")?;
                let svg = render_step_svg(step, &layout, &config.theme, &config.layout);
                write_output_png(&svg, &output, &config.render)?;
            }
            // written above without a layout pass
            OutputFormat::Json => {}
        }
    }

    Ok(())
}

/// Install a stderr subscriber honoring `RUST_LOG`, `warn` when unset.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn select_steps(plan: &VisualizationPlan, step: Option<usize>) -> Result<Vec<usize>> {
    if plan.steps.is_empty() {
        return Err(anyhow::anyhow!("Plan has no steps to render"));
    }
    match step {
        Some(index) if index >= plan.steps.len() => Err(anyhow::anyhow!(
            "Step {} out of range (plan has {} steps)",
            index,
            plan.steps.len()
        )),
        Some(index) => Ok(vec![index]),
        None => Ok((0..plan.steps.len()).collect()),
    }
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| {
        anyhow::anyhow!("Output path required when rendering several steps (or pass --step)")
    })?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("step-{}.{}", idx + 1, ext)))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("step");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((0..count)
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx + 1, ext)))
        .collect())
}
