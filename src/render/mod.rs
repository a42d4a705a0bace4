//! Rendering of the figure model with plotters
//!
//! Structure:
//! - `layout.rs`: Cell rectangles in pixels from the figure margins
//! - `text.rs`: Aligned, multi-line and rotated text
//! - `renderer.rs`: Drawing of panels onto a plotters backend (PNG or SVG)

pub mod layout;
pub mod renderer;
pub mod text;

use crate::config::PairplotConfig;
use crate::data::{PairplotError, Rgba};
use crate::figure::{FontWeight, LineStyle};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::style::{Color, ShapeStyle};
use serde::Serialize;
use std::fmt;

pub use layout::{FigureLayout, PixelRect};
pub use renderer::{draw_figure, render_to_buffer, render_to_file, DENSITY_LINE_WIDTH};
pub use text::{draw_text_block, TextSpec};

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    /// Parse from string value
    ///
    /// Validation happens in PropertyReader::get_enum()
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "svg" => Self::Svg,
            _ => Self::Png,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Pixel geometry and fonts shared by every panel
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub dpi: f64,
    pub font_family: String,
    /// Tick label font size in points
    pub tick_font_size: f64,
    /// Rasterise upright text offscreen too (bitmap targets)
    pub raster_text: bool,
}

impl RenderSettings {
    pub fn from_config(config: &PairplotConfig, n_vars: usize) -> Self {
        let (width, height) = config.resolve_dimensions(n_vars);
        Self {
            width,
            height,
            dpi: config.dpi,
            font_family: config.font_family.clone(),
            tick_font_size: config.tick_font_size,
            raster_text: true,
        }
    }

    pub fn pt_to_px(&self, pt: f64) -> f64 {
        pt * self.dpi / 72.0
    }

    /// Text style for a font size in points
    pub fn text_spec(&self, size_pt: f64, weight: FontWeight, color: Rgba) -> TextSpec<'_> {
        TextSpec {
            family: &self.font_family,
            size_px: self.pt_to_px(size_pt),
            weight,
            color,
            raster: self.raster_text,
        }
    }

    /// Stroke style of a line, at least one pixel wide
    pub fn stroke(&self, line: LineStyle) -> ShapeStyle {
        let width = self.pt_to_px(line.width).round().max(1.0) as u32;
        line.color.to_plotters().stroke_width(width)
    }
}

pub(crate) fn render_err<E>(e: DrawingAreaErrorKind<E>) -> PairplotError
where
    E: std::error::Error + Send + Sync,
{
    PairplotError::Render(e.to_string())
}
