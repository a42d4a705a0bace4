//! Operator configuration from properties
//!
//! Configuration is loaded through [`PropertyReader`], so every default comes from
//! operator.json; this module only groups, converts and cross-validates the values.

use crate::data::properties::PropertyReader;
use crate::data::{PairplotError, Result, Rgba};
use crate::render::OutputFormat;

/// Scatter marker shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
}

impl MarkerShape {
    /// Parse from string value
    ///
    /// Validation happens in PropertyReader::get_enum()
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "square" => Self::Square,
            _ => Self::Circle,
        }
    }
}

/// Placement of the cell grid inside the figure, as figure fractions
///
/// `left`/`bottom`/`right`/`top` are the edges of the grid, `spacing` is the gap
/// between cells relative to the cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureMargins {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
    pub spacing: f64,
}

impl Default for FigureMargins {
    fn default() -> Self {
        Self {
            left: 0.08,
            bottom: 0.08,
            right: 0.95,
            top: 0.95,
            spacing: 0.05,
        }
    }
}

impl FigureMargins {
    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !(in_unit(self.left) && in_unit(self.right) && in_unit(self.bottom) && in_unit(self.top))
        {
            return Err(PairplotError::Config(format!(
                "figure margins must be within [0, 1]: {:?}",
                self
            )));
        }
        if self.left >= self.right || self.bottom >= self.top {
            return Err(PairplotError::Config(format!(
                "grid edges are inverted: left={} right={} bottom={} top={}",
                self.left, self.right, self.bottom, self.top
            )));
        }
        if self.spacing < 0.0 {
            return Err(PairplotError::Config(format!(
                "cell spacing must not be negative: {}",
                self.spacing
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PairplotConfig {
    /// Seed of the random generator
    pub seed: u64,

    /// Rows per generated column
    pub n_rows: usize,

    /// Column names in display order
    pub columns: Vec<String>,

    /// Height of one cell in inches
    pub cell_height: f64,

    /// Cell width / cell height
    pub aspect: f64,

    /// Pixels per inch
    pub dpi: f64,

    /// Scatter marker area in points squared
    pub point_size: f64,

    /// Scatter marker opacity
    pub point_alpha: f64,

    /// Scatter marker color (opaque; `point_alpha` is applied per layer)
    pub point_color: Rgba,

    pub point_shape: MarkerShape,

    /// Decimals of the correlation text
    pub corr_decimals: usize,

    /// Correlation text font size in points
    pub corr_font_size: f64,

    /// Correlation text color including its opacity
    pub corr_color: Rgba,

    /// Variable name labels (top row, right column) font size in points
    pub label_font_size: f64,

    /// Tick label font size in points
    pub tick_font_size: f64,

    pub grid_color: Rgba,

    /// Grid line width in points
    pub grid_line_width: f64,

    /// Number of ticks per axis
    pub tick_count: usize,

    /// First and last tick value
    pub tick_min: f64,
    pub tick_max: f64,

    /// Bottom row tick label rotation in degrees (counter-clockwise)
    pub x_tick_rotation: f64,

    /// Evaluation points of the diagonal density curve
    pub kde_grid_size: usize,

    /// Bandwidths the density curve extends past the data range
    pub kde_cut: f64,

    /// Multiplier of the Scott bandwidth
    pub kde_bw_adjust: f64,

    /// Opacity of the area under the density curve
    pub kde_fill_alpha: f64,

    pub margins: FigureMargins,

    pub font_family: String,

    pub output_format: OutputFormat,
}

impl PairplotConfig {
    /// Create config from operator properties
    ///
    /// All default values come from operator.json via PropertyReader.
    pub fn from_properties(props: &PropertyReader) -> Result<Self> {
        let seed = props.get_u64("data.seed");
        let n_rows = props.get_usize_in_range("data.rows", 2, 1_000_000);
        let columns = props.get_list("data.columns");

        let cell_height = props.get_f64_in_range("plot.height", 0.5, 20.0);
        let aspect = props.get_f64_in_range("plot.aspect", 0.1, 10.0);
        let dpi = props.get_f64_in_range("plot.dpi", 10.0, 600.0);

        let point_size = props.get_f64_in_range("point.size", 0.0, 10_000.0);
        let point_alpha = props.get_f64_in_range("point.alpha", 0.0, 1.0);
        let point_color = props.get_color("point.color");
        let point_shape = MarkerShape::parse(&props.get_enum("point.shape"));

        let corr_decimals = props.get_usize_in_range("corr.decimals", 0, 10);
        let corr_font_size = props.get_f64_in_range("corr.font.size", 1.0, 200.0);
        let corr_alpha = props.get_f64_in_range("corr.alpha", 0.0, 1.0);
        let corr_color = props.get_color("corr.color").with_alpha(corr_alpha);

        let label_font_size = props.get_f64_in_range("label.font.size", 1.0, 200.0);
        let tick_font_size = props.get_f64_in_range("tick.font.size", 1.0, 200.0);

        let grid_color = props.get_color("grid.color");
        let grid_line_width = props.get_f64_in_range("grid.line.width", 0.0, 20.0);

        let tick_count = props.get_usize_in_range("tick.count", 2, 20);
        let tick_min = props.get_f64("tick.min");
        let tick_max = props.get_f64("tick.max");
        if tick_min >= tick_max {
            return Err(PairplotError::Config(format!(
                "tick.min ({}) must be smaller than tick.max ({})",
                tick_min, tick_max
            )));
        }
        let x_tick_rotation = props.get_f64_in_range("axis.x.tick.rotation", -360.0, 360.0);

        let kde_grid_size = props.get_usize_in_range("kde.grid.size", 2, 10_000);
        let kde_cut = props.get_f64_in_range("kde.cut", 0.0, 100.0);
        let kde_bw_adjust = props.get_f64_in_range("kde.bw.adjust", 0.01, 100.0);
        let kde_fill_alpha = props.get_f64_in_range("kde.fill.alpha", 0.0, 1.0);

        let margins = FigureMargins {
            left: props.get_f64("layout.left"),
            bottom: props.get_f64("layout.bottom"),
            right: props.get_f64("layout.right"),
            top: props.get_f64("layout.top"),
            spacing: props.get_f64("layout.spacing"),
        };
        margins.validate()?;

        let font_family = props.get_string("font.family");
        let output_format = OutputFormat::parse(&props.get_enum("output.format"));

        Ok(Self {
            seed,
            n_rows,
            columns,
            cell_height,
            aspect,
            dpi,
            point_size,
            point_alpha,
            point_color,
            point_shape,
            corr_decimals,
            corr_font_size,
            corr_color,
            label_font_size,
            tick_font_size,
            grid_color,
            grid_line_width,
            tick_count,
            tick_min,
            tick_max,
            x_tick_rotation,
            kde_grid_size,
            kde_cut,
            kde_bw_adjust,
            kde_fill_alpha,
            margins,
            font_family,
            output_format,
        })
    }

    /// Configuration with every property at its operator.json default
    pub fn defaults() -> Result<Self> {
        Self::from_properties(&PropertyReader::new())
    }

    /// Figure size in pixels for an `n_vars` x `n_vars` grid
    ///
    /// Each variable contributes one cell of `cell_height * aspect` by
    /// `cell_height` inches, converted at `dpi`.
    pub fn resolve_dimensions(&self, n_vars: usize) -> (u32, u32) {
        let n = n_vars.max(1) as f64;
        let width = (n * self.cell_height * self.aspect * self.dpi).round();
        let height = (n * self.cell_height * self.dpi).round();
        (width.max(1.0) as u32, height.max(1.0) as u32)
    }

    /// Convert a length in points to pixels at the configured dpi
    pub fn pt_to_px(&self, pt: f64) -> f64 {
        pt * self.dpi / 72.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_operator_json() {
        let config = PairplotConfig::defaults().unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.n_rows, 100);
        assert_eq!(config.columns.len(), 7);
        assert_eq!(config.point_shape, MarkerShape::Circle);
        assert_eq!(config.point_color, Rgba::from_fractions(0.6, 0.8, 0.2));
        assert_eq!(config.corr_color, Rgba::from_fractions(0.5, 0.0, 0.0).with_alpha(0.8));
        assert_eq!(config.grid_color, Rgba::from_fractions(0.8, 0.8, 0.8));
        assert_eq!(config.tick_count, 5);
        assert_eq!(config.x_tick_rotation, 45.0);
        assert_eq!(config.kde_fill_alpha, 0.25);
        assert_eq!(config.margins, FigureMargins::default());
        assert_eq!(config.output_format, OutputFormat::Png);
    }

    #[test]
    fn test_resolve_dimensions() {
        let config = PairplotConfig::defaults().unwrap();
        // 7 cells of 2 inches at 100 dpi
        assert_eq!(config.resolve_dimensions(7), (1400, 1400));
        assert_eq!(config.resolve_dimensions(1), (200, 200));

        let mut props = PropertyReader::new();
        props.set("plot.aspect", "1.5");
        let wide = PairplotConfig::from_properties(&props).unwrap();
        assert_eq!(wide.resolve_dimensions(2), (600, 400));
    }

    #[test]
    fn test_pt_to_px() {
        let config = PairplotConfig::defaults().unwrap();
        assert!((config.pt_to_px(72.0) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_ticks_rejected() {
        let mut props = PropertyReader::new();
        props.set("tick.min", "1");
        props.set("tick.max", "0");
        assert!(matches!(
            PairplotConfig::from_properties(&props),
            Err(PairplotError::Config(_))
        ));
    }

    #[test]
    fn test_inverted_margins_rejected() {
        let mut props = PropertyReader::new();
        props.set("layout.left", "0.9");
        props.set("layout.right", "0.2");
        assert!(matches!(
            PairplotConfig::from_properties(&props),
            Err(PairplotError::Config(_))
        ));
    }

    #[test]
    fn test_non_ascii_color_falls_back_to_default() {
        let mut props = PropertyReader::new();
        props.set("point.color", "#aéééb");
        let config = PairplotConfig::from_properties(&props).unwrap();
        assert_eq!(config.point_color, Rgba::rgb(153, 204, 51));
    }

    #[test]
    fn test_marker_shape_parse() {
        assert_eq!(MarkerShape::parse("square"), MarkerShape::Square);
        assert_eq!(MarkerShape::parse("Circle"), MarkerShape::Circle);
        assert_eq!(MarkerShape::parse("other"), MarkerShape::Circle);
    }
}
