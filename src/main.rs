//! Pairplot Operator - Main entry point
//!
//! Generates the synthetic table, builds the pair grid and writes the figure to
//! an image file. Property overrides come from a JSON file and command-line flags.

use anyhow::{Context, Result};
use clap::Parser;
use pairplot_operator::config::PairplotConfig;
use pairplot_operator::data::PropertyReader;
use pairplot_operator::pipeline::generate_plot;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pairplot_operator", version, about = "Render a pairplot of a synthetic table")]
struct Args {
    /// Output image path
    #[arg(short, long, default_value = "pairplot.png")]
    output: PathBuf,

    /// Property overrides (flat JSON object); ignored when missing
    #[arg(short, long, default_value = "operator_config.json")]
    config: PathBuf,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Rows per column
    #[arg(long)]
    rows: Option<usize>,

    /// Output format (png or svg)
    #[arg(long)]
    format: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    info!("Pairplot Operator v{}", env!("CARGO_PKG_VERSION"));

    let mut props = if args.config.exists() {
        info!("Loading properties from {}", args.config.display());
        PropertyReader::from_file(&args.config)
            .with_context(|| format!("failed to read {}", args.config.display()))?
    } else {
        info!("No {} found, using defaults", args.config.display());
        PropertyReader::new()
    };

    if let Some(seed) = args.seed {
        props.set("data.seed", seed.to_string());
    }
    if let Some(rows) = args.rows {
        props.set("data.rows", rows.to_string());
    }
    if let Some(format) = args.format {
        props.set("output.format", format);
    }
    props.log_effective_values();

    let config = PairplotConfig::from_properties(&props).context("invalid configuration")?;
    let result = generate_plot(&config, &args.output)
        .with_context(|| format!("failed to render {}", args.output.display()))?;

    info!(
        "✓ {} ({}x{} px, {} variables, {} rows)",
        result.path.display(),
        result.width,
        result.height,
        result.n_vars,
        result.n_rows
    );
    debug!("Result: {}", serde_json::to_string(&result)?);
    Ok(())
}
