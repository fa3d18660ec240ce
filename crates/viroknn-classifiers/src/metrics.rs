//! Evaluation suite for binary predictions.
//!
//! Every function takes aligned `(y_true, y_pred)` slices and is pure. Length
//! mismatches and non-binary labels are `InvalidArgument`; an empty input is
//! valid and yields NaN wherever a rate would divide by zero.
use serde::{Deserialize, Serialize};

use crate::data_handling::{validate_labels, Label, SARS_COV_2};
use crate::error::{ClassifierError, Result};

fn check_aligned<T>(y_true: &[Label], other: &[T], what: &str) -> Result<()> {
    if y_true.len() != other.len() {
        return Err(ClassifierError::invalid_argument(format!(
            "y_true has {} entries but {} has {}",
            y_true.len(),
            what,
            other.len()
        )));
    }
    validate_labels(y_true)
}

fn check_pair(y_true: &[Label], y_pred: &[Label]) -> Result<()> {
    check_aligned(y_true, y_pred, "y_pred")?;
    validate_labels(y_pred)
}

/// Share of positions where the prediction equals the truth. NaN when empty.
pub fn accuracy(y_true: &[Label], y_pred: &[Label]) -> Result<f64> {
    check_pair(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Number of positions where the prediction differs from the truth.
pub fn mislabeled_count(y_true: &[Label], y_pred: &[Label]) -> Result<usize> {
    check_pair(y_true, y_pred)?;
    Ok(y_true.iter().zip(y_pred).filter(|(t, p)| t != p).count())
}

/// 2x2 confusion matrix. Entry `[actual][predicted]` counts the samples whose
/// true label is `actual` and predicted label is `predicted`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_labels(y_true: &[Label], y_pred: &[Label]) -> Result<Self> {
        check_pair(y_true, y_pred)?;
        let mut counts = [[0usize; 2]; 2];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            counts[t as usize][p as usize] += 1;
        }
        Ok(ConfusionMatrix { counts })
    }

    pub fn counts(&self) -> [[usize; 2]; 2] {
        self.counts
    }

    pub fn get(&self, actual: Label, predicted: Label) -> usize {
        self.counts[actual as usize][predicted as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn true_positives(&self, class: Label) -> usize {
        self.get(class, class)
    }

    pub fn false_positives(&self, class: Label) -> usize {
        self.get(other(class), class)
    }

    pub fn false_negatives(&self, class: Label) -> usize {
        self.get(class, other(class))
    }

    pub fn true_negatives(&self, class: Label) -> usize {
        self.get(other(class), other(class))
    }

    /// Number of samples whose true label is `class` (row sum).
    pub fn support(&self, class: Label) -> usize {
        self.counts[class as usize].iter().sum()
    }

    pub fn accuracy(&self) -> f64 {
        (self.counts[0][0] + self.counts[1][1]) as f64 / self.total() as f64
    }
}

fn other(class: Label) -> Label {
    1 - class
}

pub fn confusion_matrix(y_true: &[Label], y_pred: &[Label]) -> Result<ConfusionMatrix> {
    ConfusionMatrix::from_labels(y_true, y_pred)
}

/// Precision, recall, F1 and support of one class (or of an average).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// `num / den`, or 0 when `den` is 0.
fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

impl ClassMetrics {
    fn for_class(matrix: &ConfusionMatrix, class: Label) -> Self {
        let tp = matrix.true_positives(class) as f64;
        let fp = matrix.false_positives(class) as f64;
        let fn_ = matrix.false_negatives(class) as f64;
        let precision = ratio_or_zero(tp, tp + fp);
        let recall = ratio_or_zero(tp, tp + fn_);
        ClassMetrics {
            precision,
            recall,
            f1_score: ratio_or_zero(2.0 * precision * recall, precision + recall),
            support: matrix.support(class),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    /// Indexed by label.
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    /// Unweighted mean over both classes.
    pub macro_avg: ClassMetrics,
    /// Mean weighted by class support; 0 when there is no support at all.
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_confusion_matrix(matrix: &ConfusionMatrix) -> Self {
        let classes = [
            ClassMetrics::for_class(matrix, 0),
            ClassMetrics::for_class(matrix, SARS_COV_2),
        ];
        let total = matrix.total();

        let macro_avg = ClassMetrics {
            precision: (classes[0].precision + classes[1].precision) / 2.0,
            recall: (classes[0].recall + classes[1].recall) / 2.0,
            f1_score: (classes[0].f1_score + classes[1].f1_score) / 2.0,
            support: total,
        };

        let weighted = |field: fn(&ClassMetrics) -> f64| {
            let sum: f64 = classes
                .iter()
                .map(|c| field(c) * c.support as f64)
                .sum();
            ratio_or_zero(sum, total as f64)
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1_score: weighted(|c| c.f1_score),
            support: total,
        };

        ClassificationReport {
            classes,
            accuracy: matrix.accuracy(),
            macro_avg,
            weighted_avg,
        }
    }
}

pub fn classification_report(y_true: &[Label], y_pred: &[Label]) -> Result<ClassificationReport> {
    let matrix = ConfusionMatrix::from_labels(y_true, y_pred)?;
    Ok(ClassificationReport::from_confusion_matrix(&matrix))
}

/// A single operating point of the ROC curve.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RocPoint {
    /// Samples with a score `>=` threshold are predicted positive.
    pub threshold: f64,
    /// FP / (FP + TN).
    pub fpr: f64,
    /// TP / (TP + FN).
    pub tpr: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RocCurve {
    /// Ordered by decreasing threshold, starting at `+inf` / (0, 0).
    pub points: Vec<RocPoint>,
}

impl RocCurve {
    pub fn fpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.fpr).collect()
    }

    pub fn tpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.tpr).collect()
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.threshold).collect()
    }

    pub fn auc(&self) -> Result<f64> {
        auc(&self.fpr(), &self.tpr())
    }
}

/// ROC curve of `scores` against the binary truth, class 1 being positive.
///
/// One point per distinct score, in decreasing score order, after a leading
/// `(0, 0)` point at threshold `+inf`. Feeding hard 0/1 predictions as scores
/// therefore gives `(0, 0)`, the single operating point, and `(1, 1)`.
/// A truth vector without negatives (positives) makes every FPR (TPR) NaN.
///
/// # Errors
///
/// `InvalidArgument` on a length mismatch, non-binary labels or NaN scores.
pub fn roc_curve(y_true: &[Label], scores: &[f64]) -> Result<RocCurve> {
    check_aligned(y_true, scores, "scores")?;
    let nan_count = scores.iter().filter(|s| s.is_nan()).count();
    if nan_count > 0 {
        return Err(ClassifierError::invalid_argument(format!(
            "found {} NaN values in scores",
            nan_count
        )));
    }

    let positives = y_true.iter().filter(|&&l| l == SARS_COV_2).count() as f64;
    let negatives = y_true.len() as f64 - positives;

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut points = vec![RocPoint {
        threshold: f64::INFINITY,
        fpr: 0.0 / negatives,
        tpr: 0.0 / positives,
    }];

    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if y_true[order[i]] == SARS_COV_2 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            threshold,
            fpr: fp as f64 / negatives,
            tpr: tp as f64 / positives,
        });
    }

    Ok(RocCurve { points })
}

/// Area under a curve by the trapezoidal rule.
///
/// `fpr` must be monotonic; a non-increasing sequence is integrated in reverse.
/// NaN coordinates propagate into the result.
///
/// # Errors
///
/// `InvalidArgument` when the slices differ in length, hold fewer than two
/// points, or `fpr` is neither non-decreasing nor non-increasing.
pub fn auc(fpr: &[f64], tpr: &[f64]) -> Result<f64> {
    if fpr.len() != tpr.len() {
        return Err(ClassifierError::invalid_argument(format!(
            "fpr has {} points but tpr has {}",
            fpr.len(),
            tpr.len()
        )));
    }
    if fpr.len() < 2 {
        return Err(ClassifierError::invalid_argument(format!(
            "at least 2 points are needed to compute an area, got {}",
            fpr.len()
        )));
    }
    if fpr.iter().chain(tpr).any(|v| v.is_nan()) {
        return Ok(f64::NAN);
    }

    let ascending = fpr.windows(2).all(|w| w[0] <= w[1]);
    let descending = fpr.windows(2).all(|w| w[0] >= w[1]);
    if !ascending && !descending {
        return Err(ClassifierError::invalid_argument(
            "fpr is not monotonic",
        ));
    }

    let area: f64 = fpr
        .windows(2)
        .zip(tpr.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
        .sum();
    Ok(if ascending { area } else { -area })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_labels_give_three_point_curve() {
        let y_true = [0, 0, 1, 1, 1, 0];
        let y_pred = [0, 1, 1, 1, 0, 0];
        let scores: Vec<f64> = y_pred.iter().map(|&l| l as f64).collect();
        let roc = roc_curve(&y_true, &scores).unwrap();

        assert_eq!(roc.thresholds(), vec![f64::INFINITY, 1.0, 0.0]);
        assert_eq!(roc.fpr(), vec![0.0, 1.0 / 3.0, 1.0]);
        assert_eq!(roc.tpr(), vec![0.0, 2.0 / 3.0, 1.0]);

        // (1/3 * 2/3) / 2 + (2/3) * (2/3 + 1) / 2
        let expected = (1.0 / 3.0) * (2.0 / 3.0) / 2.0 + (2.0 / 3.0) * (5.0 / 3.0) / 2.0;
        assert!((roc.auc().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn perfect_scores_have_unit_area() {
        let roc = roc_curve(&[0, 0, 1, 1], &[0.1, 0.2, 0.8, 0.9]).unwrap();
        assert_eq!(roc.auc().unwrap(), 1.0);
    }

    #[test]
    fn nan_scores_are_rejected() {
        assert!(roc_curve(&[0, 1], &[0.5, f64::NAN]).is_err());
    }

    #[test]
    fn single_class_truth_gives_nan_rates() {
        let roc = roc_curve(&[1, 1], &[1.0, 0.0]).unwrap();
        assert!(roc.fpr().iter().all(|v| v.is_nan()));
        assert_eq!(roc.tpr(), vec![0.0, 0.5, 1.0]);
        assert!(roc.auc().unwrap().is_nan());
    }

    #[test]
    fn auc_reverses_descending_input() {
        assert_eq!(auc(&[1.0, 0.0], &[1.0, 0.0]).unwrap(), 0.5);
        assert!(auc(&[0.0, 1.0, 0.5], &[0.0, 1.0, 1.0]).is_err());
        assert!(auc(&[0.0], &[0.0]).is_err());
    }

    #[test]
    fn confusion_matrix_cells() {
        let m = confusion_matrix(&[0, 0, 1, 1, 1], &[0, 1, 1, 0, 1]).unwrap();
        assert_eq!(m.counts(), [[1, 1], [1, 2]]);
        assert_eq!(m.true_positives(1), 2);
        assert_eq!(m.false_positives(1), 1);
        assert_eq!(m.false_negatives(1), 1);
        assert_eq!(m.true_negatives(1), 1);
    }
}
