//! Axis post-processing
//!
//! Runs after the cell callbacks and replaces the default axis furniture:
//! labels move from the left/bottom edges to bold annotations along the
//! top/right edges, tick marks survive only on the outer left column and
//! bottom row, and every cell gets a border and fixed tick positions.

use super::builder::PairGrid;
use super::grid::CellPosition;
use super::model::{Annotation, HAlign, LineStyle, TickParams, VAlign};
use crate::config::PairplotConfig;
use crate::data::stats::linspace;
use crate::data::Rgba;

/// Offset of the edge labels outside the cell, in axes fraction
const EDGE_LABEL_OFFSET: f64 = 1.05;

/// Cosmetic settings applied by [`decorate_axes`]
#[derive(Debug, Clone, PartialEq)]
pub struct AxisStyle {
    pub grid: LineStyle,
    pub border: LineStyle,
    pub label_font_size: f64,
    pub x_tick_rotation: f64,
    pub ticks: Vec<f64>,
}

impl AxisStyle {
    pub fn from_config(config: &PairplotConfig) -> Self {
        Self {
            grid: LineStyle {
                color: config.grid_color,
                width: config.grid_line_width,
            },
            border: LineStyle {
                color: Rgba::BLACK,
                width: 1.0,
            },
            label_font_size: config.label_font_size,
            x_tick_rotation: config.x_tick_rotation,
            ticks: linspace(config.tick_min, config.tick_max, config.tick_count),
        }
    }
}

/// Tick visibility for a cell, given its current settings
///
/// - interior cells lose every tick mark and label
/// - left column (not bottom) keeps only the left ticks
/// - bottom row (not left) keeps only the bottom ticks
/// - the bottom-left corner is left unchanged
pub fn tick_params_for(position: CellPosition, n: usize, current: TickParams) -> TickParams {
    match (position.is_left(), position.is_bottom(n)) {
        (false, false) => TickParams::NONE,
        (true, false) => TickParams {
            left: true,
            bottom: false,
            label_left: true,
            label_bottom: false,
        },
        (false, true) => TickParams {
            left: false,
            bottom: true,
            label_left: false,
            label_bottom: true,
        },
        (true, true) => current,
    }
}

/// Apply the axis decoration to every panel in row-major order
pub fn decorate_axes(grid: &mut PairGrid, style: &AxisStyle) {
    let n = grid.n_vars();
    let vars = grid.vars().to_vec();

    for panel in grid.panels_mut() {
        let position = panel.position;
        let axes = &mut panel.axes;

        // Edge annotations replace the per-axis labels
        axes.x_label = None;
        axes.y_label = None;

        if position.is_lower_or_diagonal() {
            axes.grid = Some(style.grid);
        }

        axes.ticks = tick_params_for(position, n, axes.ticks);

        if position.is_bottom(n) {
            axes.x_tick_rotation = style.x_tick_rotation;
        }

        axes.border = Some(style.border);
        axes.x_ticks = style.ticks.clone();
        axes.y_ticks = style.ticks.clone();

        if position.is_top() {
            panel.annotate(
                Annotation::new(vars[position.col].clone(), (0.5, EDGE_LABEL_OFFSET))
                    .align(HAlign::Center, VAlign::Bottom)
                    .font_size(style.label_font_size)
                    .bold(),
            );
        }

        if position.is_right(n) {
            panel.annotate(
                Annotation::new(vars[position.row].clone(), (EDGE_LABEL_OFFSET, 0.5))
                    .align(HAlign::Left, VAlign::Center)
                    .font_size(style.label_font_size)
                    .bold()
                    .rotation(270.0),
            );
        }
    }
}
