//! Integration tests for loading datasets from disk.

use std::fs;

use polars::prelude::DataType;
use tempfile::TempDir;

use tabstat_ingest::{IngestError, LoadSpec, NumericColumn, load_dataset};

fn write_csv(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn insurance_spec() -> LoadSpec {
    LoadSpec::new()
        .require(["age", "sex", "smoker"])
        .keys(["children", "charges"])
        .numeric(NumericColumn::integer("age"))
        .numeric(NumericColumn::integer("children"))
        .numeric(NumericColumn::float("charges"))
}

#[test]
fn test_load_insurance_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "insurance.csv",
        "age,sex,bmi,children,smoker,region,charges\n\
         19,female,27.9,0,yes,southwest,16884.924\n\
         18,male,33.77,1,no,southeast,1725.5523\n\
         28,male,33,,no,southeast,4449.462\n\
         33,male,22.705,0,no,northwest,n/a\n\
         32,male,28.88,zero,no,northwest,3866.8552\n",
    );

    let loaded = load_dataset(&path, &insurance_spec()).unwrap();

    assert_eq!(loaded.report.rows_read, 5);
    // Blank children and "n/a" charges both count as missing keys.
    assert_eq!(loaded.report.dropped_missing, 2);
    assert_eq!(loaded.report.dropped_uncoercible, 1);
    assert_eq!(loaded.report.rows_kept, 2);
    assert_eq!(loaded.frame.column("age").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn test_load_strips_header_whitespace() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "jeopardy.csv",
        "Show Number, Air Date, Round, Category, Value, Question, Answer\n\
         4680,2004-12-31,Jeopardy!,HISTORY,$200,\"This king ruled England\",Henry\n",
    );
    let spec = LoadSpec::new()
        .require(["Air Date", "Round", "Category", "Question", "Answer"])
        .numeric(NumericColumn::float("Value").into_column("Float Value"));

    let loaded = load_dataset(&path, &spec).unwrap();

    assert_eq!(loaded.report.rows_kept, 1);
    let value = loaded.frame.column("Float Value").unwrap().f64().unwrap().get(0);
    assert_eq!(value, Some(200.0));
}

#[test]
fn test_load_missing_file_is_data_load_error() {
    let dir = TempDir::new().unwrap();
    let err = load_dataset(&dir.path().join("visits.csv"), &LoadSpec::new()).unwrap_err();
    assert!(err.is_data_load());
}

#[test]
fn test_load_missing_required_column_is_schema_error() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "visits.csv", "user_id\nabc\n");
    let spec = LoadSpec::new().require(["user_id", "visit_time"]);

    let err = load_dataset(&path, &spec).unwrap_err();

    assert!(err.is_schema());
    assert!(matches!(err, IngestError::MissingColumns { ref columns, .. } if columns == &["visit_time"]));
}
