//! Synthetic table generation
//!
//! The table is a Polars DataFrame of Float64 columns, each filled with
//! independent uniform-random values in [0, 1). Column order is the display
//! order of the pairplot grid.

use super::error::{PairplotError, Result};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::debug;

/// Default column names of the generated dataset
pub const DEFAULT_COLUMNS: [&str; 7] = ["Eco_S", "Soc_S", "Env_S", "HQ", "WY", "CS", "SC"];

/// Ordered set of named numeric columns of equal length
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
}

impl Table {
    /// Generate a table of uniform-random columns from a fixed seed
    ///
    /// Columns are drawn in display order, each one fully before the next,
    /// from a single generator, so the result is a pure function of
    /// `(seed, n_rows, column_names)`.
    pub fn generate_uniform<S: AsRef<str>>(
        seed: u64,
        n_rows: usize,
        column_names: &[S],
    ) -> Result<Self> {
        validate_names(column_names)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let columns: Vec<Column> = column_names
            .iter()
            .map(|name| {
                let values: Vec<f64> = (0..n_rows).map(|_| rng.random::<f64>()).collect();
                Series::new(name.as_ref().into(), values).into_column()
            })
            .collect();

        debug!(
            "Generated {} columns x {} rows (seed {})",
            column_names.len(),
            n_rows,
            seed
        );

        Self::from_dataframe(DataFrame::new(columns)?)
    }

    /// Wrap an existing DataFrame
    ///
    /// All columns must be Float64 and there must be at least one of them.
    /// Equal column length is enforced by Polars itself.
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        if df.width() == 0 {
            return Err(PairplotError::InvalidTable(
                "table has no columns".to_string(),
            ));
        }

        for col in df.get_columns() {
            if col.dtype() != &DataType::Float64 {
                return Err(PairplotError::InvalidTable(format!(
                    "column '{}' has type {:?}, expected Float64",
                    col.name(),
                    col.dtype()
                )));
            }
        }

        Ok(Self { df })
    }

    pub fn n_rows(&self) -> usize {
        self.df.height()
    }

    pub fn n_cols(&self) -> usize {
        self.df.width()
    }

    /// Column names in display order
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Values of the column at `index` (display order)
    pub fn column_values(&self, index: usize) -> Result<Vec<f64>> {
        let col = self.df.get_columns().get(index).ok_or_else(|| {
            PairplotError::InvalidTable(format!(
                "column index {} out of range (table has {} columns)",
                index,
                self.n_cols()
            ))
        })?;

        let values = col
            .as_materialized_series()
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();

        Ok(values)
    }

    /// Values of every column, in display order
    pub fn all_column_values(&self) -> Result<Vec<Vec<f64>>> {
        (0..self.n_cols()).map(|i| self.column_values(i)).collect()
    }
}

fn validate_names<S: AsRef<str>>(names: &[S]) -> Result<()> {
    if names.is_empty() {
        return Err(PairplotError::InvalidTable(
            "at least one column name is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for name in names {
        let name = name.as_ref();
        if name.trim().is_empty() {
            return Err(PairplotError::InvalidTable(
                "column names must not be empty".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(PairplotError::InvalidTable(format!(
                "duplicate column name '{}'",
                name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_shape() {
        let table = Table::generate_uniform(42, 100, &DEFAULT_COLUMNS).unwrap();
        assert_eq!(table.n_rows(), 100);
        assert_eq!(table.n_cols(), 7);
        assert_eq!(table.column_names(), DEFAULT_COLUMNS.to_vec());
    }

    #[test]
    fn test_values_in_unit_interval() {
        let table = Table::generate_uniform(42, 100, &DEFAULT_COLUMNS).unwrap();
        for values in table.all_column_values().unwrap() {
            assert_eq!(values.len(), 100);
            assert!(values.iter().all(|v| (0.0..1.0).contains(v)));
        }
    }

    #[test]
    fn test_generation_is_reproducible() {
        let a = Table::generate_uniform(42, 50, &["a", "b", "c"]).unwrap();
        let b = Table::generate_uniform(42, 50, &["a", "b", "c"]).unwrap();
        assert_eq!(a.all_column_values().unwrap(), b.all_column_values().unwrap());

        let c = Table::generate_uniform(43, 50, &["a", "b", "c"]).unwrap();
        assert_ne!(a.all_column_values().unwrap(), c.all_column_values().unwrap());
    }

    #[test]
    fn test_columns_are_drawn_in_order() {
        // The first column only depends on the seed, not on how many columns follow
        let one = Table::generate_uniform(7, 20, &["x"]).unwrap();
        let three = Table::generate_uniform(7, 20, &["x", "y", "z"]).unwrap();
        assert_eq!(
            one.column_values(0).unwrap(),
            three.column_values(0).unwrap()
        );
        assert_ne!(
            three.column_values(0).unwrap(),
            three.column_values(1).unwrap()
        );
    }

    #[test]
    fn test_invalid_column_names() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            Table::generate_uniform(1, 10, &empty),
            Err(PairplotError::InvalidTable(_))
        ));
        assert!(matches!(
            Table::generate_uniform(1, 10, &["a", "a"]),
            Err(PairplotError::InvalidTable(_))
        ));
        assert!(matches!(
            Table::generate_uniform(1, 10, &["a", " "]),
            Err(PairplotError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_zero_rows_allowed() {
        let table = Table::generate_uniform(1, 0, &["a", "b"]).unwrap();
        assert_eq!(table.n_rows(), 0);
        assert!(table.column_values(1).unwrap().is_empty());
    }

    #[test]
    fn test_column_index_out_of_range() {
        let table = Table::generate_uniform(1, 3, &["a"]).unwrap();
        assert!(table.column_values(1).is_err());
    }

    #[test]
    fn test_from_dataframe_rejects_non_float() {
        let df = df! {
            "name" => ["a", "b"],
            "value" => [1.0, 2.0]
        }
        .unwrap();
        assert!(matches!(
            Table::from_dataframe(df),
            Err(PairplotError::InvalidTable(_))
        ));
    }
}
