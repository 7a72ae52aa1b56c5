//! Tests for the analysis core, exercised together on shared fixtures.

use super::*;
use crate::dataset::Dataset;
use crate::error::EdaError;
use crate::formatters::flatten_summary_for_print;

/// The three-column fixture with one missing value per non-height column.
fn sample_dataset() -> Dataset {
    Dataset::builder()
        .integers("age", vec![Some(10), Some(20), Some(30), None])
        .integers("height", vec![Some(140), Some(150), Some(160), Some(170)])
        .categorical("city", vec![Some("A"), Some("B"), Some("A"), None])
        .build()
        .unwrap()
}

fn flags_for(dataset: &Dataset) -> QualityFlags {
    let summary = summarize_dataset(dataset).unwrap();
    let missing = missing_table(dataset).unwrap();
    compute_quality_flags(&summary, &missing)
}

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[test]
    fn test_summarize_dataset_basic() {
        let summary = summarize_dataset(&sample_dataset()).unwrap();

        assert_eq!(summary.n_rows, 4);
        assert_eq!(summary.n_cols, 3);
        let names: Vec<&str> = summary.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["age", "height", "city"]);

        for column in &summary.columns {
            assert_eq!(column.count + column.missing_count, summary.n_rows);
        }
    }

    #[test]
    fn test_numeric_column_statistics() {
        let summary = summarize_dataset(&sample_dataset()).unwrap();
        let age = summary.column("age").unwrap();

        assert_eq!(age.kind, ColumnKind::Numeric);
        assert_eq!(age.dtype, "Int64");
        assert_eq!(age.count, 3);
        assert_eq!(age.missing_count, 1);
        assert_eq!(age.missing_share, 0.25);
        assert_eq!(age.n_unique, 3);
        assert_eq!(age.example_values, vec!["10", "20", "30"]);

        let stats = age.stats.as_ref().unwrap();
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.std, Some(10.0));
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.q25, 15.0);
        assert_eq!(stats.q50, 20.0);
        assert_eq!(stats.q75, 25.0);
    }

    #[test]
    fn test_categorical_column_has_no_stats() {
        let summary = summarize_dataset(&sample_dataset()).unwrap();
        let city = summary.column("city").unwrap();

        assert_eq!(city.kind, ColumnKind::Categorical);
        assert!(!city.is_numeric());
        assert_eq!(city.count, 3);
        assert_eq!(city.n_unique, 2);
        assert_eq!(city.example_values, vec!["A", "B"]);
        assert!(city.stats.is_none());
    }

    #[test]
    fn test_zero_row_dataset() {
        let dataset = Dataset::builder()
            .numeric("x", vec![])
            .categorical::<&str>("y", vec![])
            .build()
            .unwrap();

        let summary = summarize_dataset(&dataset).unwrap();
        assert_eq!(summary.n_rows, 0);
        for column in &summary.columns {
            assert_eq!(column.count, 0);
            assert_eq!(column.missing_count, 0);
            assert_eq!(column.missing_share, 0.0);
            assert!(column.stats.is_none());
        }

        let missing = missing_table(&dataset).unwrap();
        assert_eq!(missing.get("x").unwrap().missing_share, 0.0);
        let flags = compute_quality_flags(&summary, &missing);
        assert!((0.0..=1.0).contains(&flags.quality_score));
    }

    #[test]
    fn test_empty_dataset_is_rejected_everywhere() {
        let dataset = Dataset::new(vec![]).unwrap();
        assert!(matches!(
            summarize_dataset(&dataset),
            Err(EdaError::EmptyDataset)
        ));
        assert!(matches!(missing_table(&dataset), Err(EdaError::EmptyDataset)));
        assert!(matches!(
            correlation_matrix(&dataset),
            Err(EdaError::EmptyDataset)
        ));
        assert!(matches!(
            top_categories(&dataset, 5, 5),
            Err(EdaError::EmptyDataset)
        ));
    }
}

#[cfg(test)]
mod missing_tests {
    use super::*;

    #[test]
    fn test_missing_table_counts() {
        let missing = missing_table(&sample_dataset()).unwrap();

        assert_eq!(missing.len(), 3);
        assert_eq!(missing.get("age").unwrap().missing_count, 1);
        assert_eq!(missing.get("height").unwrap().missing_count, 0);
        assert_eq!(missing.get("city").unwrap().missing_share, 0.25);
        assert!(missing.get("nope").is_none());
    }

    #[test]
    fn test_missing_table_aggregates() {
        let dataset = Dataset::builder()
            .numeric("a", vec![None, None, Some(1.0), Some(2.0)])
            .numeric("b", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)])
            .categorical("c", vec![None, Some("x"), Some("y"), Some("z")])
            .build()
            .unwrap();

        let missing = missing_table(&dataset).unwrap();
        assert_eq!(missing.max_share(), 0.5);
        assert!((missing.mean_share() - 0.25).abs() < 1e-12);

        let order: Vec<&str> = missing
            .sorted_by_share()
            .iter()
            .map(|e| e.column.as_str())
            .collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }
}

#[cfg(test)]
mod correlation_tests {
    use super::*;

    #[test]
    fn test_correlation_on_sample() {
        let matrix = correlation_matrix(&sample_dataset()).unwrap();

        assert!(!matrix.is_empty());
        assert_eq!(matrix.columns, vec!["age", "height"]);
        // complete pairs are (10,140), (20,150), (30,160)
        assert!((matrix.get("age", "height").unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(matrix.get("age", "height"), matrix.get("height", "age"));
        assert!(matrix.get("city", "age").is_none());
    }
}

#[cfg(test)]
mod category_tests {
    use super::*;

    #[test]
    fn test_top_categories_on_sample() {
        let result = top_categories(&sample_dataset(), 5, 2).unwrap();

        assert!(result.contains("city"));
        assert!(!result.contains("age"));
        let city = result.get("city").unwrap();
        assert!(city.len() <= 2);
        assert_eq!(city.rows[0].value, "A");
        assert_eq!(city.rows[0].count, 2);
        assert_eq!(city.rows[1].value, "B");
    }
}

#[cfg(test)]
mod quality_tests {
    use super::*;

    #[test]
    fn test_quality_score_in_range_for_sample() {
        let flags = flags_for(&sample_dataset());
        assert!((0.0..=1.0).contains(&flags.quality_score));
        assert_eq!(flags.max_missing_share, 0.25);
        assert!(flags.too_few_rows);
        assert!(!flags.too_many_missing);
    }

    #[test]
    fn test_constant_column_is_flagged() {
        let dataset = Dataset::builder()
            .integers("id", vec![Some(1), Some(2), Some(3), Some(4), Some(5)])
            .integers("constant_col", vec![Some(1); 5])
            .integers("normal_col", vec![Some(10), Some(20), Some(30), Some(40), Some(50)])
            .build()
            .unwrap();

        let flags = flags_for(&dataset);
        assert!(flags.has_constant_columns);
        assert_eq!(flags.constant_columns_count, 1);
        assert!(flags.constant_columns_names.contains("constant_col"));
    }

    #[test]
    fn test_all_missing_column_is_constant() {
        let dataset = Dataset::builder()
            .integers("id", vec![Some(1), Some(2), Some(3)])
            .numeric("blank", vec![None, None, None])
            .build()
            .unwrap();

        let flags = flags_for(&dataset);
        assert!(flags.constant_columns_names.contains("blank"));
        assert!(flags.too_many_missing);
    }

    #[test]
    fn test_high_cardinality_column_is_flagged() {
        let labels: Vec<Option<String>> = (0..100).map(|i| Some(format!("value_{i}"))).collect();
        let mut normal: Vec<Option<i64>> = [1, 2, 3].repeat(33).into_iter().map(Some).collect();
        normal.push(Some(1));

        let dataset = Dataset::builder()
            .integers("id", (0..100).map(Some).collect())
            .categorical("high_card_col", labels)
            .integers("normal_col", normal)
            .build()
            .unwrap();

        let flags = flags_for(&dataset);
        assert!(flags.has_high_cardinality_categoricals);
        assert_eq!(flags.high_cardinality_columns_count, 1);
        assert!(flags.high_cardinality_columns_names.contains("high_card_col"));
    }

    #[test]
    fn test_small_categorical_is_not_high_cardinality() {
        let dataset = Dataset::builder()
            .categorical("c", vec![Some("a"), Some("b"), Some("c"), Some("a"), Some("b")])
            .build()
            .unwrap();

        let flags = flags_for(&dataset);
        assert!(!flags.has_high_cardinality_categoricals);
    }

    #[test]
    fn test_clean_dataset_scores_high() {
        let col1: Vec<Option<&str>> = ["A", "B", "C"]
            .iter()
            .cycle()
            .take(20)
            .map(|s| Some(*s))
            .collect();

        let dataset = Dataset::builder()
            .integers("id", (0..20).map(Some).collect())
            .categorical("col1", col1)
            .integers("col2", (20..40).map(Some).collect())
            .build()
            .unwrap();

        let flags = flags_for(&dataset);
        assert!(!flags.has_constant_columns);
        assert!(!flags.has_high_cardinality_categoricals);
        assert!(flags.quality_score > 0.7);
    }

    #[test]
    fn test_numeric_dataset_never_high_cardinality() {
        let dataset = Dataset::builder()
            .numeric("numeric1", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)])
            .numeric(
                "numeric2",
                vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0), Some(50.0)],
            )
            .build()
            .unwrap();

        let flags = flags_for(&dataset);
        assert!(!flags.has_high_cardinality_categoricals);
        assert!(flags.high_cardinality_columns_names.is_empty());
    }

    #[test]
    fn test_more_problems_lower_score() {
        let clean = Dataset::builder()
            .integers("id", (0..10).map(Some).collect())
            .build()
            .unwrap();
        let messy = Dataset::builder()
            .integers("id", (0..10).map(Some).collect())
            .integers("constant", vec![Some(7); 10])
            .categorical("label", (0..10).map(|i| Some(format!("l{i}"))).collect())
            .build()
            .unwrap();

        assert!(flags_for(&messy).quality_score < flags_for(&clean).quality_score);
    }
}

#[cfg(test)]
mod presentation_tests {
    use super::*;

    #[test]
    fn test_flatten_summary_for_print() {
        let summary = summarize_dataset(&sample_dataset()).unwrap();
        let table = flatten_summary_for_print(&summary);

        assert!(table.has_column("name"));
        assert!(table.has_column("missing_share"));
        assert_eq!(table.len(), summary.n_cols);
        assert_eq!(table.cell(0, "name"), Some("age"));
        assert_eq!(table.cell(2, "missing_share"), Some("0.250"));
        assert_eq!(table.cell(2, "mean"), Some(""));
    }
}
