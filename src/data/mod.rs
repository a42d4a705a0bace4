//! Data layer of the pairplot operator
//!
//! Structure:
//! - `error.rs`: Error types
//! - `properties.rs`: Property definitions (operator.json) and typed overrides
//! - `colors.rs`: Color parsing and conversion
//! - `table.rs`: Synthetic table generation backed by a Polars DataFrame
//! - `stats.rs`: Correlation, bandwidth and density estimation

pub mod colors;
pub mod error;
pub mod properties;
pub mod stats;
pub mod table;

// Re-exports for convenience
pub use colors::{parse_hex_color, Rgba};
pub use error::{PairplotError, Result};
pub use properties::{registry, PropertyReader};
pub use table::Table;
