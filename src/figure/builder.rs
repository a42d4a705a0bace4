//! Pair grid construction and per-cell callbacks
//!
//! [`PairGrid::new`] lays out one panel per ordered pair of variables with
//! shared axis limits (per column for x, per row for y) and transparent
//! placeholder series. The `map_*` methods then run a callback once per cell of
//! the diagonal, the upper triangle or the lower triangle.

use super::grid::{row_major, CellKind, CellPosition};
use super::model::{
    Annotation, AxisDecoration, HAlign, Layer, LineStyle, MarkerStyle, Panel, TickParams, VAlign,
};
use crate::config::{FigureMargins, PairplotConfig};
use crate::data::stats::{gaussian_kde, linspace, pearson, DensityCurve};
use crate::data::{PairplotError, Result, Rgba, Table};
use tracing::debug;

/// Fraction of the data span added on each side of an axis
const AXIS_MARGIN: f64 = 0.05;

/// Headroom above the highest density value on the diagonal
const DENSITY_HEADROOM: f64 = 1.05;

/// Default color of the diagonal density curve
pub const DENSITY_COLOR: Rgba = Rgba::rgb(31, 119, 180);

/// Data handed to a cell callback
#[derive(Debug, Clone, Copy)]
pub struct CellData<'a> {
    pub position: CellPosition,
    pub x_name: &'a str,
    pub y_name: &'a str,
    /// Values of the column variable
    pub x: &'a [f64],
    /// Values of the row variable
    pub y: &'a [f64],
    /// Density of the variable, only set on diagonal cells
    pub density: Option<&'a DensityCurve>,
}

/// Square grid of panels, one per ordered pair of table columns
#[derive(Debug, Clone)]
pub struct PairGrid {
    vars: Vec<String>,
    columns: Vec<Vec<f64>>,
    densities: Vec<Option<DensityCurve>>,
    panels: Vec<Panel>,
    margins: FigureMargins,
}

impl PairGrid {
    /// Build the grid for `table` with every series initially transparent
    pub fn new(table: &Table, config: &PairplotConfig) -> Result<Self> {
        let vars = table.column_names();
        let columns = table.all_column_values()?;
        let n = vars.len();

        if n == 0 {
            return Err(PairplotError::InvalidTable(
                "cannot build a grid without columns".to_string(),
            ));
        }

        let densities: Vec<Option<DensityCurve>> = columns
            .iter()
            .map(|values| {
                gaussian_kde(
                    values,
                    config.kde_grid_size,
                    config.kde_cut,
                    config.kde_bw_adjust,
                )
            })
            .collect();

        let ticks = linspace(config.tick_min, config.tick_max, config.tick_count);

        // Columns share x with the diagonal, so the density support widens them
        let x_ranges: Vec<(f64, f64)> = columns
            .iter()
            .zip(&densities)
            .map(|(values, density)| {
                let bounds = union_bounds(
                    data_bounds(values),
                    density.as_ref().and_then(|d| d.support()),
                );
                axis_range(bounds, &ticks)
            })
            .collect();

        let y_ranges: Vec<(f64, f64)> = columns
            .iter()
            .map(|values| axis_range(data_bounds(values), &ticks))
            .collect();

        let placeholder = MarkerStyle {
            shape: config.point_shape,
            color: config.point_color.with_alpha(0.0),
            size: config.point_size,
            edge: None,
        };

        let panels = row_major(n)
            .map(|position| {
                let (row, col) = (position.row, position.col);
                let layers = if position.kind() == CellKind::Diagonal {
                    Vec::new()
                } else {
                    vec![Layer::Scatter {
                        points: zip_points(&columns[col], &columns[row]),
                        marker: placeholder,
                    }]
                };

                Panel {
                    position,
                    x_var: col,
                    y_var: row,
                    x_range: x_ranges[col],
                    y_range: y_ranges[row],
                    layers,
                    annotations: Vec::new(),
                    axes: default_axes(position, n, &vars),
                }
            })
            .collect();

        debug!("Built {}x{} pair grid", n, n);

        Ok(Self {
            vars,
            columns,
            densities,
            panels,
            margins: config.margins,
        })
    }

    pub fn n_vars(&self) -> usize {
        self.vars.len()
    }

    /// Variable names in display order
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// Panels in row-major order
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panels_mut(&mut self) -> &mut [Panel] {
        &mut self.panels
    }

    pub fn panel(&self, row: usize, col: usize) -> Option<&Panel> {
        let n = self.n_vars();
        if row >= n || col >= n {
            return None;
        }
        self.panels.get(CellPosition::new(row, col).flat_index(n))
    }

    pub fn margins(&self) -> FigureMargins {
        self.margins
    }

    /// Move the top and right grid edges (figure fractions)
    pub fn adjust_margins(&mut self, top: f64, right: f64) -> Result<()> {
        let adjusted = FigureMargins {
            top,
            right,
            ..self.margins
        };
        adjusted.validate()?;
        self.margins = adjusted;
        Ok(())
    }

    /// Run `f` on every diagonal cell
    pub fn map_diag<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&CellData, &mut Panel),
    {
        self.map_kind(CellKind::Diagonal, f)
    }

    /// Run `f` on every cell above the diagonal
    pub fn map_upper<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&CellData, &mut Panel),
    {
        self.map_kind(CellKind::Upper, f)
    }

    /// Run `f` on every cell below the diagonal
    pub fn map_lower<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&CellData, &mut Panel),
    {
        self.map_kind(CellKind::Lower, f)
    }

    fn map_kind<F>(&mut self, kind: CellKind, mut f: F) -> &mut Self
    where
        F: FnMut(&CellData, &mut Panel),
    {
        let Self {
            vars,
            columns,
            densities,
            panels,
            ..
        } = self;

        for panel in panels.iter_mut().filter(|p| p.position.kind() == kind) {
            let (row, col) = (panel.position.row, panel.position.col);
            let data = CellData {
                position: panel.position,
                x_name: &vars[col],
                y_name: &vars[row],
                x: &columns[col],
                y: &columns[row],
                density: if row == col {
                    densities[col].as_ref()
                } else {
                    None
                },
            };
            f(&data, panel);
        }

        self
    }
}

/// Correlation text as shown in the upper triangle
pub fn format_correlation(r: f64, decimals: usize) -> String {
    format!("Corr:\n{:.*}", decimals, r)
}

/// Upper-triangle callback: Pearson correlation as centered text
pub fn correlation_text(
    decimals: usize,
    font_size: f64,
    color: Rgba,
) -> impl FnMut(&CellData, &mut Panel) {
    move |cell, panel| {
        let r = pearson(cell.x, cell.y);
        panel.annotate(
            Annotation::new(format_correlation(r, decimals), (0.5, 0.5))
                .align(HAlign::Center, VAlign::Center)
                .font_size(font_size)
                .color(color),
        );
    }
}

/// Lower-triangle callback: scatter of the two variables
pub fn scatter(marker: MarkerStyle) -> impl FnMut(&CellData, &mut Panel) {
    move |cell, panel| {
        panel.add_layer(Layer::Scatter {
            points: zip_points(cell.x, cell.y),
            marker,
        });
    }
}

/// Diagonal callback: density curve of the single variable, shaded below
/// in the line color at `fill_alpha`
pub fn density_curve(line: LineStyle, fill_alpha: f64) -> impl FnMut(&CellData, &mut Panel) {
    let fill = (fill_alpha > 0.0).then(|| line.color.with_alpha(fill_alpha));
    move |cell, panel| {
        if let Some(density) = cell.density {
            panel.add_layer(Layer::Density {
                curve: density.points(),
                y_max: density.max_density() * DENSITY_HEADROOM,
                line,
                fill,
            });
        }
    }
}

/// Scatter marker from configuration: fill at `point_alpha`, thin white edge
pub fn scatter_marker(config: &PairplotConfig) -> MarkerStyle {
    MarkerStyle {
        shape: config.point_shape,
        color: config.point_color.with_alpha(config.point_alpha),
        size: config.point_size,
        edge: Some(LineStyle {
            color: Rgba::WHITE.with_alpha(config.point_alpha),
            width: 0.08 * config.point_size.sqrt(),
        }),
    }
}

fn default_axes(position: CellPosition, n: usize, vars: &[String]) -> AxisDecoration {
    AxisDecoration {
        x_label: position
            .is_bottom(n)
            .then(|| vars[position.col].clone()),
        y_label: position.is_left().then(|| vars[position.row].clone()),
        grid: None,
        ticks: TickParams {
            left: true,
            bottom: true,
            label_left: position.is_left(),
            label_bottom: position.is_bottom(n),
        },
        x_tick_rotation: 0.0,
        border: None,
        x_ticks: Vec::new(),
        y_ticks: Vec::new(),
    }
}

fn zip_points(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter().copied().zip(y.iter().copied()).collect()
}

fn data_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    Some(finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

fn union_bounds(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> Option<(f64, f64)> {
    match (a, b) {
        (Some((alo, ahi)), Some((blo, bhi))) => Some((alo.min(blo), ahi.max(bhi))),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Pad the data bounds and widen them to contain every tick
fn axis_range(bounds: Option<(f64, f64)>, ticks: &[f64]) -> (f64, f64) {
    let tick_lo = ticks.first().copied().unwrap_or(0.0);
    let tick_hi = ticks.last().copied().unwrap_or(1.0);

    match bounds {
        Some((lo, hi)) => {
            let pad = (hi - lo) * AXIS_MARGIN;
            ((lo - pad).min(tick_lo), (hi + pad).max(tick_hi))
        }
        None => (tick_lo, tick_hi),
    }
}
