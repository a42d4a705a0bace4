use thiserror::Error;

/// Errors that can occur while building or rendering a pairplot
#[derive(Debug, Error)]
pub enum PairplotError {
    /// DataFrame construction or column access failed
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Property file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading configuration or writing the figure failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (invalid property combination, bad output path, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Table shape cannot be plotted (no columns, duplicate names, too few rows)
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Drawing backend failure
    #[error("Render error: {0}")]
    Render(String),
}

/// Type alias for Results using PairplotError
pub type Result<T> = std::result::Result<T, PairplotError>;
