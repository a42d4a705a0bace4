//! Figure rendering with plotters
//!
//! Draw order per cell: grid lines, data layers (clipped to the cell), border,
//! tick marks, tick labels, axis labels, annotations.

use super::layout::{FigureLayout, PixelRect};
use super::text::draw_text_block;
use super::{render_err, OutputFormat, RenderSettings};
use crate::config::MarkerShape;
use crate::data::stats::format_tick_labels;
use crate::data::{PairplotError, Result, Rgba};
use crate::figure::{FontWeight, HAlign, Layer, LineStyle, MarkerStyle, PairGrid, Panel, VAlign};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Tick mark length in points
const TICK_LENGTH: f64 = 3.5;

/// Tick mark width in points
const TICK_WIDTH: f64 = 0.8;

/// Gap between tick marks and their labels in points
const TICK_PAD: f64 = 3.5;

/// Width of the diagonal density curve in points
pub const DENSITY_LINE_WIDTH: f64 = 1.5;

fn px(v: f64) -> i32 {
    v.round() as i32
}

/// Draw the whole grid onto `root` and present it
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    grid: &PairGrid,
    settings: &RenderSettings,
) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let layout = FigureLayout::new(settings.width, settings.height, grid.n_vars(), grid.margins());
    debug!(
        "Layout: {}x{} cells of {:.1}x{:.1} px",
        layout.n, layout.n, layout.cell_width, layout.cell_height
    );

    for panel in grid.panels() {
        let rect = layout.cell_rect(panel.position);
        draw_panel(root, panel, rect, settings)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panel: &Panel,
    rect: PixelRect,
    settings: &RenderSettings,
) -> Result<()> {
    let axes = &panel.axes;
    let x_ticks = visible_ticks(&axes.x_ticks, panel.x_range);
    let y_ticks = visible_ticks(&axes.y_ticks, panel.y_range);

    if let Some(grid) = axes.grid {
        let style = settings.stroke(grid);
        for &x in &x_ticks {
            let x = px(rect.map_x(x, panel.x_range));
            root.draw(&PathElement::new(vec![(x, px(rect.y0)), (x, px(rect.y1))], style))
                .map_err(render_err)?;
        }
        for &y in &y_ticks {
            let y = px(rect.map_y(y, panel.y_range));
            root.draw(&PathElement::new(vec![(px(rect.x0), y), (px(rect.x1), y)], style))
                .map_err(render_err)?;
        }
    }

    draw_layers(root, panel, rect, settings)?;

    if let Some(border) = axes.border {
        root.draw(&Rectangle::new(
            [(px(rect.x0), px(rect.y0)), (px(rect.x1), px(rect.y1))],
            settings.stroke(border),
        ))
        .map_err(render_err)?;
    }

    draw_ticks(root, panel, rect, settings, &x_ticks, &y_ticks)?;

    let label_spec = settings.text_spec(settings.tick_font_size, FontWeight::Normal, Rgba::BLACK);
    let outside = settings.pt_to_px(TICK_LENGTH + TICK_PAD) + label_spec.size_px * 2.5;
    if let Some(label) = &axes.x_label {
        let anchor = ((rect.x0 + rect.x1) / 2.0, rect.y1 + outside);
        draw_text_block(root, label, &label_spec, anchor, HAlign::Center, VAlign::Top, 0.0)?;
    }
    if let Some(label) = &axes.y_label {
        let anchor = (rect.x0 - outside, (rect.y0 + rect.y1) / 2.0);
        draw_text_block(root, label, &label_spec, anchor, HAlign::Right, VAlign::Center, 90.0)?;
    }

    for annotation in &panel.annotations {
        let spec = settings.text_spec(annotation.font_size, annotation.weight, annotation.color);
        draw_text_block(
            root,
            &annotation.text,
            &spec,
            rect.fraction_to_px(annotation.xy),
            annotation.h_align,
            annotation.v_align,
            annotation.rotation,
        )?;
    }

    Ok(())
}

/// Data layers, clipped to the cell rectangle
fn draw_layers<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panel: &Panel,
    rect: PixelRect,
    settings: &RenderSettings,
) -> Result<()> {
    let (x0, y0) = (px(rect.x0), px(rect.y0));
    let w = (px(rect.x1) - x0).max(1) as u32;
    let h = (px(rect.y1) - y0).max(1) as u32;
    let cell = root.clone().shrink((x0, y0), (w, h));

    // Cell-local coordinates
    let local = PixelRect {
        x0: rect.x0 - x0 as f64,
        y0: rect.y0 - y0 as f64,
        x1: rect.x1 - x0 as f64,
        y1: rect.y1 - y0 as f64,
    };

    for layer in panel.visible_layers() {
        match layer {
            Layer::Scatter { points, marker } => {
                draw_markers(&cell, points, marker, local, panel, settings)?;
            }
            Layer::Density {
                curve,
                y_max,
                line,
                fill,
            } => {
                let range = (0.0, y_max.max(f64::MIN_POSITIVE));
                let path: Vec<(i32, i32)> = curve
                    .iter()
                    .map(|&(x, d)| (px(local.map_x(x, panel.x_range)), px(local.map_y(d, range))))
                    .collect();

                if let (Some(fill), Some(first), Some(last)) = (fill, path.first(), path.last()) {
                    if !fill.is_transparent() {
                        let baseline = px(local.map_y(0.0, range));
                        let mut area = path.clone();
                        area.push((last.0, baseline));
                        area.push((first.0, baseline));
                        cell.draw(&Polygon::new(area, fill.to_plotters().filled()))
                            .map_err(render_err)?;
                    }
                }

                cell.draw(&PathElement::new(path, settings.stroke(*line)))
                    .map_err(render_err)?;
            }
        }
    }

    Ok(())
}

fn draw_markers<DB: DrawingBackend>(
    cell: &DrawingArea<DB, Shift>,
    points: &[(f64, f64)],
    marker: &MarkerStyle,
    local: PixelRect,
    panel: &Panel,
    settings: &RenderSettings,
) -> Result<()> {
    // Marker area is in points squared; its side/diameter is sqrt(area)
    let half = settings.pt_to_px(marker.size.sqrt()) / 2.0;
    let radius = half.round().max(1.0) as i32;
    let fill = marker.color.to_plotters().filled();
    let edge = marker.edge.map(|e| settings.stroke(e));

    for &(x, y) in points {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        let center = (px(local.map_x(x, panel.x_range)), px(local.map_y(y, panel.y_range)));

        match marker.shape {
            MarkerShape::Circle => {
                cell.draw(&Circle::new(center, radius, fill)).map_err(render_err)?;
                if let Some(edge) = edge {
                    cell.draw(&Circle::new(center, radius, edge)).map_err(render_err)?;
                }
            }
            MarkerShape::Square => {
                let corners = [
                    (center.0 - radius, center.1 - radius),
                    (center.0 + radius, center.1 + radius),
                ];
                cell.draw(&Rectangle::new(corners, fill)).map_err(render_err)?;
                if let Some(edge) = edge {
                    cell.draw(&Rectangle::new(corners, edge)).map_err(render_err)?;
                }
            }
        }
    }

    Ok(())
}

fn draw_ticks<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panel: &Panel,
    rect: PixelRect,
    settings: &RenderSettings,
    x_ticks: &[f64],
    y_ticks: &[f64],
) -> Result<()> {
    let ticks = panel.axes.ticks;
    let length = settings.pt_to_px(TICK_LENGTH);
    let pad = settings.pt_to_px(TICK_PAD);
    let style = settings.stroke(LineStyle {
        color: Rgba::BLACK,
        width: TICK_WIDTH,
    });
    let spec = settings.text_spec(settings.tick_font_size, FontWeight::Normal, Rgba::BLACK);

    if ticks.left || ticks.label_left {
        let labels = format_tick_labels(y_ticks);
        for (&v, label) in y_ticks.iter().zip(&labels) {
            let y = rect.map_y(v, panel.y_range);
            if ticks.left {
                root.draw(&PathElement::new(
                    vec![(px(rect.x0 - length), px(y)), (px(rect.x0), px(y))],
                    style,
                ))
                .map_err(render_err)?;
            }
            if ticks.label_left {
                let anchor = (rect.x0 - length - pad, y);
                draw_text_block(root, label, &spec, anchor, HAlign::Right, VAlign::Center, 0.0)?;
            }
        }
    }

    if ticks.bottom || ticks.label_bottom {
        let labels = format_tick_labels(x_ticks);
        for (&v, label) in x_ticks.iter().zip(&labels) {
            let x = rect.map_x(v, panel.x_range);
            if ticks.bottom {
                root.draw(&PathElement::new(
                    vec![(px(x), px(rect.y1)), (px(x), px(rect.y1 + length))],
                    style,
                ))
                .map_err(render_err)?;
            }
            if ticks.label_bottom {
                let anchor = (x, rect.y1 + length + pad);
                draw_text_block(
                    root,
                    label,
                    &spec,
                    anchor,
                    HAlign::Center,
                    VAlign::Top,
                    panel.axes.x_tick_rotation,
                )?;
            }
        }
    }

    Ok(())
}

/// Ticks inside the axis range, in their original order
fn visible_ticks(ticks: &[f64], range: (f64, f64)) -> Vec<f64> {
    let (lo, hi) = if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    };
    ticks
        .iter()
        .copied()
        .filter(|t| *t >= lo - 1e-12 && *t <= hi + 1e-12)
        .collect()
}

/// Render into an RGB buffer (3 bytes per pixel, row-major)
pub fn render_to_buffer(grid: &PairGrid, settings: &RenderSettings) -> Result<Vec<u8>> {
    let (w, h) = (settings.width, settings.height);
    let mut buffer = vec![0u8; (w as usize) * (h as usize) * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
        draw_figure(&root, grid, settings)?;
    }
    Ok(buffer)
}

/// Render to an image file in the given format
pub fn render_to_file(
    grid: &PairGrid,
    settings: &RenderSettings,
    path: &Path,
    format: OutputFormat,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let (w, h) = (settings.width, settings.height);
    match format {
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, (w, h)).into_drawing_area();
            draw_figure(&root, grid, settings)?;
        }
        OutputFormat::Svg => {
            // Upright text stays vector text in SVG
            let vector = RenderSettings {
                raster_text: false,
                ..settings.clone()
            };
            let root = SVGBackend::new(path, (w, h)).into_drawing_area();
            draw_figure(&root, grid, &vector)?;
        }
    }

    if !path.exists() {
        return Err(PairplotError::Render(format!(
            "backend reported success but {} was not written",
            path.display()
        )));
    }

    info!("Wrote {} ({}x{}, {})", path.display(), w, h, format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_ticks() {
        let ticks = [0.0, 0.25, 0.5, 0.75, 1.0];
        assert_eq!(visible_ticks(&ticks, (-0.1, 1.1)), ticks.to_vec());
        assert_eq!(visible_ticks(&ticks, (0.3, 0.8)), vec![0.5, 0.75]);
        assert_eq!(visible_ticks(&ticks, (0.8, 0.3)), vec![0.5, 0.75]);
    }

    #[test]
    fn test_px_rounding() {
        assert_eq!(px(1.49), 1);
        assert_eq!(px(1.5), 2);
        assert_eq!(px(-0.6), -1);
    }
}
