//! End-to-end tests: split → fit → predict → evaluate.

use viroknn_classifiers::config::{PipelineConfig, RocScoreSource};
use viroknn_classifiers::data_handling::{Dataset, Label};
use viroknn_classifiers::math::{Array1, Array2};
use viroknn_classifiers::pipeline::{evaluate, run_pipeline};
use viroknn_classifiers::report::EvaluationReport;
use viroknn_classifiers::ClassifierError;

/// Two well separated clusters: H1N1 around the origin, SARS-CoV-2 around (10, 10).
fn clustered_dataset(n_per_class: usize) -> Dataset {
    let mut rows = Vec::new();
    let mut labels: Vec<Label> = Vec::new();
    for i in 0..n_per_class {
        let jitter = (i % 5) as f64 * 0.1;
        rows.push(vec![jitter, 0.5 - jitter]);
        labels.push(0);
        rows.push(vec![10.0 + jitter, 9.5 + jitter]);
        labels.push(1);
    }
    Dataset::new(Array2::from_rows(rows).unwrap(), Array1::from_vec(labels)).unwrap()
}

#[test]
fn separable_clusters_are_classified_perfectly() {
    let dataset = clustered_dataset(50);
    let config = PipelineConfig::default();
    let outcome = run_pipeline(&dataset, &config).unwrap();

    // k comes from the full dataset, not the training subset
    assert_eq!(outcome.k, 10);
    assert_eq!(outcome.split.n_train(), 70);
    assert_eq!(outcome.split.n_test(), 30);
    assert_eq!(outcome.predictions.len(), 30);
    assert_eq!(outcome.predictions, outcome.y_test().to_vec());

    let eval = &outcome.evaluation;
    assert_eq!(eval.accuracy, 1.0);
    assert_eq!(eval.mislabeled, 0);
    assert_eq!(eval.auc, 1.0);
    assert_eq!(eval.confusion_matrix.total(), 30);
}

#[test]
fn large_test_fraction_keeps_enough_training_rows() {
    // 100 samples at 0.9 leave exactly k = 10 training rows
    let dataset = clustered_dataset(50);
    let config = PipelineConfig {
        test_fraction: 0.9,
        ..PipelineConfig::default()
    };
    let outcome = run_pipeline(&dataset, &config).unwrap();
    assert_eq!(outcome.k, 10);
    assert_eq!(outcome.split.n_train(), 10);
    assert_eq!(outcome.split.n_test(), 90);
    assert_eq!(outcome.predictions.len(), 90);
}

#[test]
fn pipeline_is_deterministic() {
    let dataset = clustered_dataset(30);
    let config = PipelineConfig {
        test_fraction: 0.4,
        seed: 17,
        ..PipelineConfig::default()
    };
    let a = run_pipeline(&dataset, &config).unwrap();
    let b = run_pipeline(&dataset, &config).unwrap();
    assert_eq!(a.split.test_indices, b.split.test_indices);
    assert_eq!(a.predictions, b.predictions);
    assert_eq!(a.vote_fractions, b.vote_fractions);
}

#[test]
fn vote_fraction_scores_feed_the_roc_curve() {
    let dataset = clustered_dataset(30);
    let config = PipelineConfig {
        roc_scores: RocScoreSource::VoteFraction,
        ..PipelineConfig::default()
    };
    let outcome = run_pipeline(&dataset, &config).unwrap();
    for (&p, &score) in outcome.predictions.iter().zip(&outcome.vote_fractions) {
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(p, (score > 0.5) as Label);
    }
    let thresholds = outcome.evaluation.roc_curve.thresholds();
    assert!(thresholds[1..].iter().all(|t| outcome.vote_fractions.contains(t)));
}

#[test]
fn zero_test_fraction_gives_nan_metrics() {
    let dataset = clustered_dataset(10);
    let config = PipelineConfig {
        test_fraction: 0.0,
        ..PipelineConfig::default()
    };
    let outcome = run_pipeline(&dataset, &config).unwrap();
    assert!(outcome.predictions.is_empty());
    assert!(outcome.evaluation.accuracy.is_nan());
    assert!(outcome.evaluation.auc.is_nan());
}

#[test]
fn full_test_fraction_leaves_nothing_to_train_on() {
    let dataset = clustered_dataset(10);
    let config = PipelineConfig {
        test_fraction: 1.0,
        ..PipelineConfig::default()
    };
    assert!(matches!(
        run_pipeline(&dataset, &config),
        Err(ClassifierError::InvalidState(_))
    ));
}

#[test]
fn invalid_config_is_rejected_before_running() {
    let dataset = clustered_dataset(10);
    let config = PipelineConfig {
        test_fraction: 1.5,
        ..PipelineConfig::default()
    };
    assert!(matches!(
        run_pipeline(&dataset, &config),
        Err(ClassifierError::InvalidArgument(_))
    ));

    let config = PipelineConfig {
        k: Some(0),
        ..PipelineConfig::default()
    };
    assert!(run_pipeline(&dataset, &config).is_err());
}

#[test]
fn explicit_k_overrides_heuristic() {
    let dataset = clustered_dataset(20);
    let config = PipelineConfig {
        k: Some(3),
        ..PipelineConfig::default()
    };
    assert_eq!(run_pipeline(&dataset, &config).unwrap().k, 3);
}

#[test]
fn evaluate_collects_all_statistics() {
    let eval = evaluate(&[0, 1, 1, 0], &[0, 1, 0, 0], &[0.0, 1.0, 0.0, 0.0]).unwrap();
    assert_eq!(eval.accuracy, 0.75);
    assert_eq!(eval.mislabeled, 1);
    assert_eq!(eval.confusion_matrix.counts(), [[2, 0], [1, 1]]);
    assert_eq!(eval.roc_curve.points.len(), 3);
    // (0,0) -> (0, 0.5) -> (1, 1)
    assert!((eval.auc - 0.75).abs() < 1e-12);
    assert_eq!(eval.classification_report.classes[1].recall, 0.5);
}

#[test]
fn report_carries_run_parameters() {
    let dataset = clustered_dataset(20);
    let config = PipelineConfig::default();
    let outcome = run_pipeline(&dataset, &config).unwrap();
    let report = EvaluationReport::new(&outcome, &config);

    assert_eq!(report.k, 7);
    assert_eq!(report.metric, "manhattan");
    assert_eq!(report.n_train + report.n_test, 40);
    assert_eq!(report.true_labels.len(), report.predicted_labels.len());
    assert_eq!(report.target_names, ["H1N1".to_string(), "SARS-CoV-2".to_string()]);

    let text = report.to_text();
    assert!(text.contains("Prediction Accuracy, k=7"));
    assert!(text.contains("Number of mislabeled points out of a total 12 points"));
    assert!(text.contains("AUC (Area Under Curve)"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["k"], 7);
    assert!(json["classification_report"]["classes"].is_array());
}
