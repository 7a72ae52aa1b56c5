//! End-to-end tests: Arrow batches in, report artifacts out.

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::fs;
use std::sync::Arc;
use term_eda::formatters::{HumanFormatter, JsonFormatter, MarkdownFormatter};
use term_eda::prelude::*;
use term_eda::report::ReportWriter;

fn customer_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("age", DataType::Int64, true),
        Field::new("income", DataType::Float64, true),
        Field::new("city", DataType::Utf8, true),
        Field::new("country", DataType::Utf8, true),
    ]));

    let ages: Vec<Option<i64>> = (0..40)
        .map(|i| if i % 10 == 0 { None } else { Some(20 + i) })
        .collect();
    let income: Vec<Option<f64>> = (0..40).map(|i| Some(1_000.0 + 50.0 * i as f64)).collect();
    let cities: Vec<Option<&str>> = (0..40)
        .map(|i| Some(["Paris", "Lyon", "Nice"][i % 3]))
        .collect();
    let country: Vec<Option<&str>> = vec![Some("FR"); 40];

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(ages)) as ArrayRef,
            Arc::new(Float64Array::from(income)) as ArrayRef,
            Arc::new(StringArray::from(cities)) as ArrayRef,
            Arc::new(StringArray::from(country)) as ArrayRef,
        ],
    )
    .unwrap()
}

#[test]
fn test_report_from_record_batch() {
    let dataset = Dataset::from_record_batch(&customer_batch()).unwrap();
    let report = EdaReport::build(&dataset, &ReportConfig::default().with_top_k(2)).unwrap();

    assert_eq!(report.summary.n_rows, 40);
    assert_eq!(report.summary.n_cols, 4);
    assert_eq!(report.missing.get("age").unwrap().missing_count, 4);
    assert!(report.correlation.get("age", "income").unwrap() > 0.99);
    assert_eq!(report.top_categories.get("city").unwrap().len(), 2);

    assert!(report.quality.has_constant_columns);
    assert!(report.quality.constant_columns_names.contains("country"));
    assert!(!report.quality.has_high_cardinality_categoricals);
    assert!(report.quality.too_few_rows);
    assert!((0.0..=1.0).contains(&report.quality.quality_score));
}

#[test]
fn test_writer_produces_every_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = Dataset::from_record_batch(&customer_batch()).unwrap();
    let report = EdaReport::build(&dataset, &ReportConfig::default().with_title("Customers")).unwrap();

    let out_dir = dir.path().join("nested").join("reports");
    let written = ReportWriter::new(&out_dir).write(&report).unwrap();

    for name in [
        "report.md",
        "summary.csv",
        "missing.csv",
        "correlation.csv",
        "quality.json",
    ] {
        assert!(out_dir.join(name).is_file(), "missing {name}");
    }
    assert!(out_dir.join("top_categories").join("city.csv").is_file());
    assert!(out_dir.join("top_categories").join("country.csv").is_file());
    assert_eq!(written.len(), 7);

    let markdown = fs::read_to_string(out_dir.join("report.md")).unwrap();
    assert!(markdown.contains("Customers"));

    let summary_csv = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary_csv.starts_with("name,dtype,kind"));
    assert_eq!(summary_csv.lines().count(), 5);

    let quality: QualityFlagsJson = serde_json::from_str(
        &fs::read_to_string(out_dir.join("quality.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(quality.quality_score, report.quality.quality_score);
}

#[derive(serde::Deserialize)]
struct QualityFlagsJson {
    quality_score: f64,
}

#[test]
fn test_formatters_render_the_same_report() {
    let dataset = Dataset::from_record_batch(&customer_batch()).unwrap();
    let report = EdaReport::build(&dataset, &ReportConfig::default()).unwrap();

    let human = HumanFormatter::new().format(&report).unwrap();
    assert!(human.contains("Rows: 40  Columns: 4"));

    let markdown = MarkdownFormatter::new().format(&report).unwrap();
    assert!(markdown.starts_with('#'));

    let json = JsonFormatter::new().format(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["n_rows"], 40);
}
