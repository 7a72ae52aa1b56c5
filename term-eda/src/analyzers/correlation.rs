//! Pairwise Pearson correlation across numeric columns.
//!
//! Each pair is computed over the rows where both columns have a value
//! (pairwise-complete observations), so missing values in one column do not
//! shrink the sample of unrelated pairs.

use crate::dataset::{ColumnValues, Dataset};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Complete observations of one column pair.
#[derive(Debug, Default, Clone)]
struct PairState {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl PairState {
    fn from_columns(x: &[Option<f64>], y: &[Option<f64>]) -> Self {
        let (xs, ys) = x
            .iter()
            .zip(y)
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .unzip();
        Self { xs, ys }
    }

    /// Pearson coefficient over deviations from the pair means, so a large
    /// common offset does not cancel out the variance.
    fn pearson(&self) -> Option<f64> {
        let n = self.xs.len();
        if n < 2 || is_constant(&self.xs) || is_constant(&self.ys) {
            return None;
        }
        let mean_x = self.xs.iter().sum::<f64>() / n as f64;
        let mean_y = self.ys.iter().sum::<f64>() / n as f64;

        let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
        for (x, y) in self.xs.iter().zip(&self.ys) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
        if var_x <= 0.0 || var_y <= 0.0 {
            return None;
        }
        let r = cov / (var_x.sqrt() * var_y.sqrt());
        r.is_finite().then(|| r.clamp(-1.0, 1.0))
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Square, symmetric correlation table over numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Numeric column names labelling both axes
    pub columns: Vec<String>,
    /// Row-major values; `None` where the coefficient is undefined
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// A matrix with no columns.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Returns true when fewer than two numeric columns were available.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    /// Distinct column pairs with a defined coefficient, strongest first.
    pub fn strongest_pairs(&self) -> Vec<(&str, &str, f64)> {
        let mut pairs = Vec::new();
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                if let Some(r) = self.values[i][j] {
                    pairs.push((self.columns[i].as_str(), self.columns[j].as_str(), r));
                }
            }
        }
        pairs.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));
        pairs
    }
}

/// Computes the Pearson correlation matrix of the numeric columns.
///
/// With fewer than two numeric columns the result is an empty matrix.
///
/// # Errors
///
/// Returns [`EdaError::EmptyDataset`](crate::error::EdaError::EmptyDataset)
/// when the dataset has no columns.
#[instrument(skip(dataset), fields(rows = dataset.n_rows(), columns = dataset.n_cols()))]
pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix> {
    dataset.ensure_not_empty()?;

    let numeric: Vec<(&str, &[Option<f64>])> = dataset
        .columns()
        .iter()
        .filter_map(|column| match column.values() {
            ColumnValues::Numeric(values) => Some((column.name(), values.as_slice())),
            ColumnValues::Categorical(_) => None,
        })
        .collect();

    if numeric.len() < 2 {
        debug!(
            numeric_columns = numeric.len(),
            "Not enough numeric columns for correlation"
        );
        return Ok(CorrelationMatrix::empty());
    }

    let size = numeric.len();
    let mut values = vec![vec![None; size]; size];
    for i in 0..size {
        values[i][i] = Some(1.0);
        for j in (i + 1)..size {
            let r = PairState::from_columns(numeric[i].1, numeric[j].1).pearson();
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: numeric.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_correlations() {
        let dataset = Dataset::builder()
            .numeric("x", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)])
            .numeric("y", vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0)])
            .numeric("z", vec![Some(4.0), Some(3.0), Some(2.0), Some(1.0)])
            .build()
            .unwrap();

        let matrix = correlation_matrix(&dataset).unwrap();
        assert_eq!(matrix.columns, vec!["x", "y", "z"]);
        assert!((matrix.get("x", "y").unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.get("x", "z").unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(matrix.get("z", "z"), Some(1.0));
    }

    #[test]
    fn test_pairwise_complete_observations() {
        // Row 3 is dropped only for the (a, b) pair
        let dataset = Dataset::builder()
            .numeric("a", vec![Some(1.0), Some(2.0), Some(3.0), Some(100.0)])
            .numeric("b", vec![Some(1.0), Some(2.0), Some(3.0), None])
            .build()
            .unwrap();

        let matrix = correlation_matrix(&dataset).unwrap();
        assert!((matrix.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_is_undefined() {
        let dataset = Dataset::builder()
            .numeric("a", vec![Some(1.0), Some(2.0), Some(3.0)])
            .numeric("c", vec![Some(5.0), Some(5.0), Some(5.0)])
            .build()
            .unwrap();

        let matrix = correlation_matrix(&dataset).unwrap();
        assert_eq!(matrix.get("a", "c"), None);
        assert_eq!(matrix.get("c", "c"), Some(1.0));
    }

    #[test]
    fn test_too_few_pairs_is_undefined() {
        let dataset = Dataset::builder()
            .numeric("a", vec![Some(1.0), None, Some(3.0)])
            .numeric("b", vec![None, Some(2.0), Some(3.0)])
            .build()
            .unwrap();

        let matrix = correlation_matrix(&dataset).unwrap();
        assert_eq!(matrix.get("a", "b"), None);
    }

    #[test]
    fn test_single_numeric_column_gives_empty_matrix() {
        let dataset = Dataset::builder()
            .numeric("a", vec![Some(1.0), Some(2.0)])
            .categorical("b", vec![Some("x"), Some("y")])
            .build()
            .unwrap();

        let matrix = correlation_matrix(&dataset).unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.get("a", "a"), None);
    }

    #[test]
    fn test_strongest_pairs_order() {
        let dataset = Dataset::builder()
            .numeric("x", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)])
            .numeric("y", vec![Some(1.0), Some(3.0), Some(2.0), Some(4.0)])
            .numeric("z", vec![Some(-1.0), Some(-2.0), Some(-3.0), Some(-4.0)])
            .build()
            .unwrap();

        let matrix = correlation_matrix(&dataset).unwrap();
        let pairs = matrix.strongest_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!((pairs[0].0, pairs[0].1), ("x", "z"));
        assert!((pairs[0].2 + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_large_offset_keeps_correlation() {
        let x: Vec<Option<f64>> = (0..10).map(|i| Some(1e9 + i as f64)).collect();
        let y: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).collect();
        let shifted: Vec<Option<f64>> = (0..10).map(|i| Some(1e12 - 3.0 * i as f64)).collect();
        let dataset = Dataset::builder()
            .numeric("x", x)
            .numeric("y", y)
            .numeric("shifted", shifted)
            .build()
            .unwrap();

        let matrix = correlation_matrix(&dataset).unwrap();
        assert!((matrix.get("x", "y").unwrap() - 1.0).abs() < 1e-9);
        assert!((matrix.get("y", "shifted").unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_fraction_is_constant() {
        let dataset = Dataset::builder()
            .numeric("a", vec![Some(1.0), Some(2.0), Some(3.0)])
            .numeric("c", vec![Some(0.1), Some(0.1), Some(0.1)])
            .build()
            .unwrap();

        assert_eq!(correlation_matrix(&dataset).unwrap().get("a", "c"), None);
    }
}
