//! Dataset container and the seeded train/test splitter.
//!
//! A `Dataset` pairs the feature matrix with its binary label vector and is
//! immutable once built. `train_test_split` partitions it with a shuffle driven
//! by an explicitly seeded generator, so the same `(data, fraction, seed)`
//! always yields the same partition.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{ClassifierError, Result};
use crate::math::{Array1, Array2};

/// Binary class label. `0` is H1N1, `1` is SARS-CoV-2.
pub type Label = u8;

pub const H1N1: Label = 0;
pub const SARS_COV_2: Label = 1;

/// Display names of the two classes, indexed by label.
pub const DEFAULT_TARGET_NAMES: [&str; 2] = ["H1N1", "SARS-CoV-2"];

pub(crate) fn validate_labels(labels: &[Label]) -> Result<()> {
    if let Some((idx, label)) = labels
        .iter()
        .enumerate()
        .find(|(_, &label)| label != H1N1 && label != SARS_COV_2)
    {
        return Err(ClassifierError::invalid_argument(format!(
            "label {} at position {} is not binary (expected 0 or 1)",
            label, idx
        )));
    }
    Ok(())
}

pub(crate) fn validate_lengths(x: &Array2<f64>, y: &Array1<Label>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(ClassifierError::invalid_argument(format!(
            "feature matrix has {} rows but label vector has {} entries",
            x.nrows(),
            y.len()
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array1<Label>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Array1<Label>) -> Result<Self> {
        validate_lengths(&x, &y)?;
        validate_labels(y.as_slice())?;
        Ok(Dataset { x, y })
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<Label> {
        &self.y
    }

    pub fn n_samples(&self) -> usize {
        self.y.len()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Number of samples per class, indexed by label.
    pub fn class_counts(&self) -> [usize; 2] {
        let positives = self.y.iter().filter(|&&v| v == SARS_COV_2).count();
        [self.y.len() - positives, positives]
    }

    pub fn log_summary(&self) {
        let [h1n1, sars] = self.class_counts();
        log::info!(
            "{} samples ({} H1N1, {} SARS-CoV-2) with {} features",
            self.n_samples(),
            h1n1,
            sars,
            self.n_features()
        );
    }

    pub fn split(&self, test_fraction: f64, seed: u64) -> Result<Split> {
        train_test_split(&self.x, &self.y, test_fraction, seed)
    }
}

/// Train/test partition of a dataset. The index vectors refer to rows of the
/// original dataset and are disjoint.
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<Label>,
    pub y_test: Array1<Label>,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

impl Split {
    pub fn n_train(&self) -> usize {
        self.train_indices.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }

    /// `(x_train, x_test, y_train, y_test)`.
    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>, Array1<Label>, Array1<Label>) {
        (self.x_train, self.x_test, self.y_train, self.y_test)
    }
}

/// Number of training samples for `n_samples` rows and a test fraction:
/// `floor(n * (1 - f))`, computed as `n - ceil(n * f)`.
///
/// `n * f` is compared against the nearest integer with a tolerance of a few
/// ulps, so `0.1 * 30` counts as 3 test samples and not 4.
pub fn train_size(n_samples: usize, test_fraction: f64) -> usize {
    let n = n_samples as f64;
    let raw_test = n * test_fraction;
    let n_test = (raw_test - n * f64::EPSILON).ceil().max(0.0) as usize;
    n_samples - n_test.min(n_samples)
}

/// Split `x`/`y` into training and test subsets.
///
/// The row indices are shuffled with a `StdRng` seeded from `seed`; the first
/// `floor(n * (1 - test_fraction))` shuffled indices form the training set and
/// the remainder the test set. No stratification is applied.
///
/// # Errors
///
/// `InvalidArgument` when `test_fraction` is outside `[0, 1]` (or NaN) or when
/// `x` and `y` disagree on the number of samples. A fraction of exactly 0 or 1
/// is accepted and produces an empty test or training set.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<Label>,
    test_fraction: f64,
    seed: u64,
) -> Result<Split> {
    if !(0.0..=1.0).contains(&test_fraction) {
        return Err(ClassifierError::invalid_argument(format!(
            "test fraction must be within [0, 1], got {}",
            test_fraction
        )));
    }
    validate_lengths(x, y)?;

    let n_samples = y.len();
    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_train = train_size(n_samples, test_fraction);
    let test_indices = indices.split_off(n_train);
    let train_indices = indices;

    log::debug!(
        "Split {} samples into {} train / {} test (test fraction {}, seed {})",
        n_samples,
        train_indices.len(),
        test_indices.len(),
        test_fraction,
        seed
    );

    Ok(Split {
        x_train: x.select_rows(&train_indices),
        x_test: x.select_rows(&test_indices),
        y_train: y.select(&train_indices),
        y_test: y.select(&test_indices),
        train_indices,
        test_indices,
    })
}
