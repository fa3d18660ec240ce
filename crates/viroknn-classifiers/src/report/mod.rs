//! Plain data and plain text for the reporting side.
//!
//! `EvaluationReport` gathers what a run produced so it can be written as JSON;
//! its `Display` impl and the table wrappers render what is printed on the console.
use std::fmt;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data_handling::Label;
use crate::math::Array1;
use crate::metrics::{ClassMetrics, ClassificationReport, ConfusionMatrix, RocPoint};
use crate::pipeline::PipelineOutcome;

#[derive(Serialize, Debug, Clone)]
pub struct EvaluationReport {
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub classifier: String,
    pub k: usize,
    pub metric: String,
    pub test_fraction: f64,
    pub seed: u64,
    pub n_train: usize,
    pub n_test: usize,
    pub target_names: [String; 2],
    pub test_indices: Vec<usize>,
    pub predicted_labels: Vec<Label>,
    pub true_labels: Vec<Label>,
    pub accuracy: f64,
    pub mislabeled: usize,
    pub confusion_matrix: ConfusionMatrix,
    pub classification_report: ClassificationReport,
    pub roc_curve: Vec<RocPoint>,
    pub auc: f64,
}

impl EvaluationReport {
    pub fn new(outcome: &PipelineOutcome, config: &PipelineConfig) -> Self {
        let evaluation = &outcome.evaluation;
        EvaluationReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            classifier: "k-nearest-neighbors".to_string(),
            k: outcome.k,
            metric: config.metric.to_string(),
            test_fraction: config.test_fraction,
            seed: config.seed,
            n_train: outcome.split.n_train(),
            n_test: outcome.split.n_test(),
            target_names: config.target_names.clone(),
            test_indices: outcome.split.test_indices.clone(),
            predicted_labels: outcome.predictions.clone(),
            true_labels: outcome.y_test().to_vec(),
            accuracy: evaluation.accuracy,
            mislabeled: evaluation.mislabeled,
            confusion_matrix: evaluation.confusion_matrix,
            classification_report: evaluation.classification_report.clone(),
            roc_curve: evaluation.roc_curve.points.clone(),
            auc: evaluation.auc,
        }
    }

    /// Console rendering of the whole report.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [self.target_names[0].as_str(), self.target_names[1].as_str()];
        writeln!(
            f,
            "Predicted class labels (0 = {}, 1 = {}):\n{}\n",
            names[0],
            names[1],
            Array1::from_vec(self.predicted_labels.clone())
        )?;
        writeln!(
            f,
            "True class labels (0 = {}, 1 = {}):\n{}\n",
            names[0],
            names[1],
            Array1::from_vec(self.true_labels.clone())
        )?;
        writeln!(f, "Prediction Accuracy, k={}: {}\n", self.k, self.accuracy)?;
        writeln!(
            f,
            "Number of mislabeled points out of a total {} points: {}\n",
            self.n_test, self.mislabeled
        )?;
        writeln!(
            f,
            "Classification Report:\n\n{}",
            ClassificationTable::new(&self.classification_report, names)
        )?;
        writeln!(
            f,
            "Confusion Matrix, k = {}:\n\n{}",
            self.k,
            ConfusionTable::new(&self.confusion_matrix, names)
        )?;
        writeln!(f, "ROC curve (threshold, FPR, TPR):")?;
        for point in &self.roc_curve {
            writeln!(f, "  {:>8}  {:.4}  {:.4}", point.threshold, point.fpr, point.tpr)?;
        }
        writeln!(f, "\nAUC (Area Under Curve) = {}", self.auc)
    }
}

/// Per-class table followed by accuracy, macro and weighted averages.
pub struct ClassificationTable<'a> {
    report: &'a ClassificationReport,
    target_names: [&'a str; 2],
}

impl<'a> ClassificationTable<'a> {
    pub fn new(report: &'a ClassificationReport, target_names: [&'a str; 2]) -> Self {
        ClassificationTable {
            report,
            target_names,
        }
    }

    fn metrics_row(
        f: &mut fmt::Formatter<'_>,
        width: usize,
        name: &str,
        m: &ClassMetrics,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
            name,
            m.precision,
            m.recall,
            m.f1_score,
            m.support,
            width = width
        )
    }
}

impl fmt::Display for ClassificationTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .target_names
            .iter()
            .map(|n| n.len())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}\n",
            "",
            "precision",
            "recall",
            "f1-score",
            "support",
            width = width
        )?;
        for (name, metrics) in self.target_names.iter().zip(self.report.classes.iter()) {
            Self::metrics_row(f, width, name, metrics)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.report.accuracy,
            self.report.macro_avg.support,
            width = width
        )?;
        Self::metrics_row(f, width, "macro avg", &self.report.macro_avg)?;
        Self::metrics_row(f, width, "weighted avg", &self.report.weighted_avg)
    }
}

/// Confusion matrix with true labels as rows and predicted labels as columns.
pub struct ConfusionTable<'a> {
    matrix: &'a ConfusionMatrix,
    target_names: [&'a str; 2],
}

impl<'a> ConfusionTable<'a> {
    pub fn new(matrix: &'a ConfusionMatrix, target_names: [&'a str; 2]) -> Self {
        ConfusionTable {
            matrix,
            target_names,
        }
    }
}

impl fmt::Display for ConfusionTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.target_names;
        let width = names.iter().map(|n| n.len()).max().unwrap_or(0).max(6);
        writeln!(
            f,
            "{:>width$} | {:>width$} {:>width$}   [predicted]",
            "[true]",
            names[0],
            names[1],
            width = width
        )?;
        for (actual, name) in names.iter().enumerate() {
            writeln!(
                f,
                "{:>width$} | {:>width$} {:>width$}",
                name,
                self.matrix.get(actual as Label, 0),
                self.matrix.get(actual as Label, 1),
                width = width
            )?;
        }
        Ok(())
    }
}

pub fn format_classification_report(report: &ClassificationReport, target_names: [&str; 2]) -> String {
    ClassificationTable::new(report, target_names).to_string()
}

pub fn format_confusion_matrix(matrix: &ConfusionMatrix, target_names: [&str; 2]) -> String {
    ConfusionTable::new(matrix, target_names).to_string()
}
