//! Pairplot Operator Library
//!
//! Renders a pairwise scatter matrix of a synthetic table: scatter plots in the
//! lower triangle, correlation coefficients in the upper triangle and density
//! curves on the diagonal.
//!
//! Module organization:
//! - `data`: Properties, colors, table generation and statistics
//! - `config`: Operator configuration
//! - `figure`: Backend-independent figure model
//! - `render`: plotters rendering
//! - `pipeline`: End-to-end generation

pub mod config;
pub mod data;
pub mod figure;
pub mod pipeline;
pub mod render;
