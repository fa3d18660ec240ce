//! Integration tests for CLI config loading, prompting and util helpers.

use std::io::{Cursor, Write};

use viroknn_classifiers::config::{DistanceMetric, RocScoreSource};
use viroknn_cli::classify::input::load_pipeline_config;
use viroknn_cli::classify::prompt::{parse_test_fraction, prompt_test_fraction};
use viroknn_cli::util::validate_tsv_or_csv_file;

// ---------------------------------------------------------------------------
// validate_tsv_or_csv_file
// ---------------------------------------------------------------------------

#[test]
fn validate_csv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(&path).is_ok());
}

#[test]
fn validate_accepts_tab_and_mixed_case() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["data.tab", "data.TSV", "data.Csv"] {
        let path = dir.path().join(name);
        std::fs::File::create(&path).unwrap();
        assert!(validate_tsv_or_csv_file(&path).is_ok(), "{} rejected", name);
    }
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(&path).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_tsv_or_csv_file("/nonexistent/path/data.tsv").is_err());
}

// ---------------------------------------------------------------------------
// Pipeline config files
// ---------------------------------------------------------------------------

#[test]
fn config_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"test_fraction": 0.2, "seed": 42, "metric": "chebyshev", "k": 5, "roc_scores": "vote_fraction"}}"#
    )
    .unwrap();

    let cfg = load_pipeline_config(file.path()).unwrap();
    assert_eq!(cfg.test_fraction, 0.2);
    assert_eq!(cfg.seed, 42);
    assert_eq!(cfg.metric, DistanceMetric::Chebyshev);
    assert_eq!(cfg.k, Some(5));
    assert_eq!(cfg.roc_scores, RocScoreSource::VoteFraction);
    assert_eq!(cfg.label_column, "label");
}

#[test]
fn invalid_field_keeps_default() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"seed": "not a number", "metric": "hamming"}}"#).unwrap();

    let cfg = load_pipeline_config(file.path()).unwrap();
    assert_eq!(cfg.seed, 1);
    assert_eq!(cfg.metric, DistanceMetric::Manhattan);
}

#[test]
fn malformed_json_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    assert!(load_pipeline_config(file.path()).is_err());
}

// ---------------------------------------------------------------------------
// Test fraction prompt
// ---------------------------------------------------------------------------

#[test]
fn parse_accepts_closed_unit_interval() {
    assert_eq!(parse_test_fraction("0"), Ok(0.0));
    assert_eq!(parse_test_fraction(" 1 \n"), Ok(1.0));
    assert_eq!(parse_test_fraction("0.3"), Ok(0.3));
    assert_eq!(
        parse_test_fraction("1.2"),
        Err("Error - Number not between 0 and 1".to_string())
    );
    assert_eq!(
        parse_test_fraction("thirty"),
        Err("Error - Please enter a number!".to_string())
    );
}

#[test]
fn prompt_retries_until_valid() {
    let mut input = Cursor::new("x\n-1\n0.4\n");
    let mut output = Vec::new();
    let value = prompt_test_fraction(&mut input, &mut output).unwrap();
    assert_eq!(value, 0.4);

    let shown = String::from_utf8(output).unwrap();
    assert_eq!(shown.matches("Please enter the split ratio").count(), 3);
    assert!(shown.contains("Error - Please enter a number!"));
    assert!(shown.contains("Error - Number not between 0 and 1"));
}

#[test]
fn prompt_fails_on_end_of_input() {
    let mut input = Cursor::new("nope\n");
    let mut output = Vec::new();
    assert!(prompt_test_fraction(&mut input, &mut output).is_err());
}
