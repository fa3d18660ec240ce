//! End-to-end run: split → fit → predict → evaluate.
use crate::config::{PipelineConfig, RocScoreSource};
use crate::data_handling::{Dataset, Label, Split};
use crate::error::Result;
use crate::metrics::{
    accuracy, mislabeled_count, ClassificationReport, ConfusionMatrix, RocCurve,
};
use crate::models::{ClassifierModel, KnnClassifier};

/// Every statistic the reporting side consumes for one set of predictions.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub accuracy: f64,
    pub mislabeled: usize,
    pub confusion_matrix: ConfusionMatrix,
    pub classification_report: ClassificationReport,
    pub roc_curve: RocCurve,
    /// NaN when the curve has fewer than two points (empty test set).
    pub auc: f64,
}

/// Score predictions against the truth. `scores` feeds the ROC curve.
pub fn evaluate(y_true: &[Label], y_pred: &[Label], scores: &[f64]) -> Result<Evaluation> {
    let confusion_matrix = ConfusionMatrix::from_labels(y_true, y_pred)?;
    let roc_curve = crate::metrics::roc_curve(y_true, scores)?;
    let auc = if roc_curve.points.len() < 2 {
        log::warn!("ROC curve has a single point; AUC is undefined");
        f64::NAN
    } else {
        roc_curve.auc()?
    };

    Ok(Evaluation {
        accuracy: accuracy(y_true, y_pred)?,
        mislabeled: mislabeled_count(y_true, y_pred)?,
        classification_report: ClassificationReport::from_confusion_matrix(&confusion_matrix),
        confusion_matrix,
        roc_curve,
        auc,
    })
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Neighborhood size, derived from the full dataset unless configured.
    pub k: usize,
    pub split: Split,
    /// Aligned with `split.test_indices`.
    pub predictions: Vec<Label>,
    /// Share of the k neighbors voting SARS-CoV-2, aligned with `predictions`.
    pub vote_fractions: Vec<f64>,
    pub evaluation: Evaluation,
}

impl PipelineOutcome {
    pub fn y_test(&self) -> &[Label] {
        self.split.y_test.as_slice()
    }
}

/// Run the whole classification pipeline on `dataset`.
///
/// `k` is resolved from the size of the full dataset before the split is
/// applied.
///
/// # Errors
///
/// Propagates the splitter, classifier and evaluation errors; for instance a
/// test fraction of 1 leaves no training data and fails with `InvalidState`.
pub fn run_pipeline(dataset: &Dataset, config: &PipelineConfig) -> Result<PipelineOutcome> {
    config.validate()?;
    dataset.log_summary();

    let k = config.resolve_k(dataset.n_samples());
    let mut model = KnnClassifier::new(k, config.metric)?;
    log::info!("k-NN classifier with k = {} and {} distance", k, config.metric);

    let split = dataset.split(config.test_fraction, config.seed)?;
    log::info!(
        "Training on {} samples, testing on {} samples",
        split.n_train(),
        split.n_test()
    );
    if split.n_test() == 0 {
        log::warn!("Test set is empty; accuracy and rates will be NaN");
    }

    model.fit(&split.x_train, &split.y_train)?;
    let (predictions, vote_fractions) = model.predict_with_fractions(&split.x_test)?;

    let roc_scores: Vec<f64> = match config.roc_scores {
        RocScoreSource::Labels => predictions.iter().map(|&l| l as f64).collect(),
        RocScoreSource::VoteFraction => vote_fractions.clone(),
    };
    let evaluation = evaluate(split.y_test.as_slice(), &predictions, &roc_scores)?;
    log::info!(
        "Accuracy {:.4}, AUC {:.4}, {} of {} test samples mislabeled",
        evaluation.accuracy,
        evaluation.auc,
        evaluation.mislabeled,
        split.n_test()
    );

    Ok(PipelineOutcome {
        k,
        split,
        predictions,
        vote_fractions,
        evaluation,
    })
}
