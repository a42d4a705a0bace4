//! Backend-independent figure model
//!
//! A [`Panel`] holds everything that will be drawn in one grid cell: data layers
//! in data coordinates, text annotations in axes-fraction coordinates, and the
//! axis decoration state. Sizes are in points; the renderer converts to pixels.

use super::grid::CellPosition;
use crate::config::MarkerShape;
use crate::data::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Text placed relative to a cell's plotting rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// May contain `\n` for multi-line text
    pub text: String,
    /// Anchor in axes fraction: (0, 0) bottom-left, (1, 1) top-right
    pub xy: (f64, f64),
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub font_size: f64,
    pub weight: FontWeight,
    pub color: Rgba,
    /// Counter-clockwise degrees
    pub rotation: f64,
}

impl Annotation {
    pub fn new(text: impl Into<String>, xy: (f64, f64)) -> Self {
        Self {
            text: text.into(),
            xy,
            h_align: HAlign::Center,
            v_align: VAlign::Center,
            font_size: 10.0,
            weight: FontWeight::Normal,
            color: Rgba::BLACK,
            rotation: 0.0,
        }
    }

    pub fn align(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgba,
    /// Width in points
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    /// Fill color including opacity
    pub color: Rgba,
    /// Marker area in points squared
    pub size: f64,
    /// Outline drawn around each marker
    pub edge: Option<LineStyle>,
}

/// Data drawn inside a cell
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// Points in (x data, y data) coordinates
    Scatter {
        points: Vec<(f64, f64)>,
        marker: MarkerStyle,
    },
    /// Curve in (x data, density) coordinates, drawn on its own vertical scale
    /// running from 0 to `y_max`
    Density {
        curve: Vec<(f64, f64)>,
        y_max: f64,
        line: LineStyle,
        /// Shading between the curve and zero
        fill: Option<Rgba>,
    },
}

impl Layer {
    /// False for layers that are present only to contribute to the layout
    pub fn is_visible(&self) -> bool {
        match self {
            Layer::Scatter { points, marker } => {
                !points.is_empty() && !marker.color.is_transparent()
            }
            Layer::Density { curve, line, .. } => {
                !curve.is_empty() && !line.color.is_transparent()
            }
        }
    }
}

/// Which tick marks and tick labels a cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickParams {
    pub left: bool,
    pub bottom: bool,
    pub label_left: bool,
    pub label_bottom: bool,
}

impl TickParams {
    pub const NONE: TickParams = TickParams {
        left: false,
        bottom: false,
        label_left: false,
        label_bottom: false,
    };

    pub fn any_marks(&self) -> bool {
        self.left || self.bottom
    }
}

/// Cosmetic axis state of one cell
#[derive(Debug, Clone, PartialEq)]
pub struct AxisDecoration {
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Grid lines at every tick position
    pub grid: Option<LineStyle>,
    pub ticks: TickParams,
    /// Counter-clockwise rotation of the x tick labels in degrees
    pub x_tick_rotation: f64,
    /// Rectangle around the plotting area
    pub border: Option<LineStyle>,
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
}

/// One cell of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub position: CellPosition,
    /// Variable index on the horizontal axis (the column)
    pub x_var: usize,
    /// Variable index on the vertical axis (the row)
    pub y_var: usize,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub layers: Vec<Layer>,
    pub annotations: Vec<Annotation>,
    pub axes: AxisDecoration,
}

impl Panel {
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.is_visible())
    }

    /// Number of points in visible scatter layers
    pub fn visible_scatter_points(&self) -> usize {
        self.visible_layers()
            .map(|l| match l {
                Layer::Scatter { points, .. } => points.len(),
                Layer::Density { .. } => 0,
            })
            .sum()
    }

    pub fn has_visible_density(&self) -> bool {
        self.visible_layers()
            .any(|l| matches!(l, Layer::Density { .. }))
    }
}
