//! Most frequent values of categorical columns.

use crate::dataset::{ColumnValues, Dataset};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// One value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// `count` over the column's non-missing values
    pub share: f64,
}

/// Top values of one categorical column, most frequent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub column: String,
    pub rows: Vec<CategoryCount>,
}

impl CategoryTable {
    /// Number of rows kept.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when no value was kept.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Top value tables keyed by column name, in dataset order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopCategoriesResult {
    pub tables: Vec<CategoryTable>,
}

impl TopCategoriesResult {
    /// Looks up the table of a column.
    pub fn get(&self, column: &str) -> Option<&CategoryTable> {
        self.tables.iter().find(|t| t.column == column)
    }

    /// Returns true when the column was examined.
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Number of examined columns.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true when no column was examined.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Counts values of the first `max_columns` categorical columns and keeps the
/// `top_k` most frequent of each.
///
/// Values with equal counts keep the order in which they first appear in the
/// column. Categorical columns past `max_columns` are skipped.
///
/// # Errors
///
/// Returns [`EdaError::EmptyDataset`](crate::error::EdaError::EmptyDataset)
/// when the dataset has no columns.
#[instrument(skip(dataset), fields(columns = dataset.n_cols()))]
pub fn top_categories(
    dataset: &Dataset,
    max_columns: usize,
    top_k: usize,
) -> Result<TopCategoriesResult> {
    dataset.ensure_not_empty()?;

    let tables: Vec<CategoryTable> = dataset
        .columns()
        .iter()
        .filter_map(|column| match column.values() {
            ColumnValues::Categorical(values) => Some((column.name(), values)),
            ColumnValues::Numeric(_) => None,
        })
        .take(max_columns)
        .map(|(name, values)| CategoryTable {
            column: name.to_string(),
            rows: count_values(values, top_k),
        })
        .collect();

    debug!(examined = tables.len(), top_k, "Computed top categories");
    Ok(TopCategoriesResult { tables })
}

fn count_values(values: &[Option<String>], top_k: usize) -> Vec<CategoryCount> {
    // value -> (first position, count)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut total = 0;
    for (position, value) in values.iter().enumerate() {
        if let Some(value) = value {
            counts.entry(value.as_str()).or_insert((position, 0)).1 += 1;
            total += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (first, count))| (value, first, count))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));

    ranked
        .into_iter()
        .take(top_k)
        .map(|(value, _, count)| CategoryCount {
            value: value.to_string(),
            count,
            share: count as f64 / total as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let values = letters(&[Some("b"), Some("a"), Some("c"), Some("a"), Some("b"), Some("c")]);
        let rows = count_values(&values, 10);
        let order: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert!(rows.iter().all(|r| r.count == 2));
    }

    #[test]
    fn test_shares_exclude_missing() {
        let values = letters(&[Some("x"), None, Some("x"), Some("y")]);
        let rows = count_values(&values, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, "x");
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].share - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_columns_skips_later_columns() {
        let dataset = Dataset::builder()
            .categorical("first", vec![Some("a")])
            .integers("number", vec![Some(1)])
            .categorical("second", vec![Some("b")])
            .categorical("third", vec![Some("c")])
            .build()
            .unwrap();

        let result = top_categories(&dataset, 2, 5).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.contains("first"));
        assert!(result.contains("second"));
        assert!(!result.contains("third"));
        assert!(!result.contains("number"));
    }

    #[test]
    fn test_zero_limits() {
        let dataset = Dataset::builder()
            .categorical("c", vec![Some("a"), Some("b")])
            .build()
            .unwrap();

        assert!(top_categories(&dataset, 0, 5).unwrap().is_empty());
        let result = top_categories(&dataset, 5, 0).unwrap();
        assert!(result.get("c").unwrap().is_empty());
    }

    #[test]
    fn test_all_missing_column_has_empty_table() {
        let dataset = Dataset::builder()
            .categorical::<String>("c", vec![None, None])
            .build()
            .unwrap();

        let result = top_categories(&dataset, 5, 5).unwrap();
        assert!(result.get("c").unwrap().is_empty());
    }
}
