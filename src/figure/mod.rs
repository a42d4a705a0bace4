//! Pairplot figure model
//!
//! Structure:
//! - `grid.rs`: Cell positions and diagonal/upper/lower classification
//! - `model.rs`: Panels, layers, annotations and axis decoration state
//! - `builder.rs`: `PairGrid` construction and the per-cell callbacks
//! - `decorate.rs`: Axis post-processing over the realized grid

pub mod builder;
pub mod decorate;
pub mod grid;
pub mod model;

pub use builder::{
    correlation_text, density_curve, format_correlation, scatter, scatter_marker, CellData,
    PairGrid, DENSITY_COLOR,
};
pub use decorate::{decorate_axes, tick_params_for, AxisStyle};
pub use grid::{CellKind, CellPosition};
pub use model::{
    Annotation, AxisDecoration, FontWeight, HAlign, Layer, LineStyle, MarkerStyle, Panel,
    TickParams, VAlign,
};
