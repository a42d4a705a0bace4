//! Shared plot generation pipeline
//!
//! The pipeline:
//! 1. Generates the synthetic table
//! 2. Builds the pair grid and runs the diagonal/upper/lower callbacks
//! 3. Decorates the axes and adjusts the figure margins
//! 4. Renders the figure to a file

use crate::config::PairplotConfig;
use crate::data::{PairplotError, Result, Table};
use crate::figure::{
    correlation_text, decorate_axes, density_curve, scatter, scatter_marker, AxisStyle, LineStyle,
    PairGrid, DENSITY_COLOR,
};
use crate::render::{render_to_buffer, render_to_file, OutputFormat, RenderSettings, DENSITY_LINE_WIDTH};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Grid edges after decoration, leaving room for the edge labels
pub const ADJUSTED_TOP: f64 = 0.95;
pub const ADJUSTED_RIGHT: f64 = 0.95;

/// Result of a rendered figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotResult {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub n_vars: usize,
    pub n_rows: usize,
}

/// Generate the table described by `config`
pub fn generate_table(config: &PairplotConfig) -> Result<Table> {
    if config.n_rows < 2 {
        return Err(PairplotError::Config(format!(
            "at least 2 rows are needed for densities and correlations, got {}",
            config.n_rows
        )));
    }
    Table::generate_uniform(config.seed, config.n_rows, &config.columns)
}

/// Build the fully decorated figure model for `table`
pub fn build_figure(table: &Table, config: &PairplotConfig) -> Result<PairGrid> {
    let mut grid = PairGrid::new(table, config)?;

    grid.map_diag(density_curve(
        LineStyle {
            color: DENSITY_COLOR,
            width: DENSITY_LINE_WIDTH,
        },
        config.kde_fill_alpha,
    ))
    .map_upper(correlation_text(
        config.corr_decimals,
        config.corr_font_size,
        config.corr_color,
    ))
    .map_lower(scatter(scatter_marker(config)));

    decorate_axes(&mut grid, &AxisStyle::from_config(config));
    grid.adjust_margins(ADJUSTED_TOP, ADJUSTED_RIGHT)?;

    Ok(grid)
}

/// Generate, build and render the figure into `output`
pub fn generate_plot(config: &PairplotConfig, output: &Path) -> Result<PlotResult> {
    let t0 = Instant::now();

    info!("[1/4] Generating table...");
    let table = generate_table(config)?;
    info!(
        "  {} rows x {} columns (seed {})",
        table.n_rows(),
        table.n_cols(),
        config.seed
    );

    info!("[2/4] Building pair grid...");
    let grid = build_figure(&table, config)?;
    info!("  {} panels", grid.panels().len());

    info!("[3/4] Rendering...");
    let settings = RenderSettings::from_config(config, grid.n_vars());
    info!(
        "  {}x{} px at {} dpi ({})",
        settings.width, settings.height, settings.dpi, config.output_format
    );
    render_to_file(&grid, &settings, output, config.output_format)?;

    info!("[4/4] Plot generation complete in {:.2?}", t0.elapsed());

    Ok(PlotResult {
        path: output.to_path_buf(),
        width: settings.width,
        height: settings.height,
        format: config.output_format,
        n_vars: grid.n_vars(),
        n_rows: table.n_rows(),
    })
}

/// Render the figure for `config` into an in-memory RGB buffer
pub fn generate_buffer(config: &PairplotConfig) -> Result<(RenderSettings, Vec<u8>)> {
    let table = generate_table(config)?;
    let grid = build_figure(&table, config)?;
    let settings = RenderSettings::from_config(config, grid.n_vars());
    let buffer = render_to_buffer(&grid, &settings)?;
    debug!("Rendered {} bytes", buffer.len());
    Ok((settings, buffer))
}
