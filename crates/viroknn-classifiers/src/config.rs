use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::data_handling::DEFAULT_TARGET_NAMES;
use crate::error::{ClassifierError, Result};
use crate::models::knn::sqrt_heuristic_k;

pub use crate::models::distance::DistanceMetric;

/// Which per-sample score is fed to the ROC curve.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RocScoreSource {
    /// Hard 0/1 predictions. Gives the three point curve of a single operating point.
    #[default]
    Labels,
    /// Share of the k neighbors voting SARS-CoV-2.
    VoteFraction,
}

impl FromStr for RocScoreSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "labels" => Ok(RocScoreSource::Labels),
            "vote_fraction" => Ok(RocScoreSource::VoteFraction),
            _ => Err(format!(
                "Unknown ROC score source: {}. Expected labels or vote_fraction",
                s
            )),
        }
    }
}

/// Parameters of one classification run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Share of the samples held out for testing, within `[0, 1]`.
    pub test_fraction: f64,
    pub seed: u64,
    pub metric: DistanceMetric,
    /// Explicit neighborhood size. `None` uses `ceil(sqrt(n))` over the full dataset.
    pub k: Option<usize>,
    pub roc_scores: RocScoreSource,
    /// Column of the input table holding the 0/1 labels.
    pub label_column: String,
    pub target_names: [String; 2],
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.3,
            seed: 1,
            metric: DistanceMetric::Manhattan,
            k: None,
            roc_scores: RocScoreSource::Labels,
            label_column: "label".to_string(),
            target_names: DEFAULT_TARGET_NAMES.map(String::from),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.test_fraction) {
            return Err(ClassifierError::invalid_argument(format!(
                "test fraction must be within [0, 1], got {}",
                self.test_fraction
            )));
        }
        if self.k == Some(0) {
            return Err(ClassifierError::invalid_argument(
                "number of neighbors k must be at least 1",
            ));
        }
        Ok(())
    }

    /// Neighborhood size for a dataset of `n_samples` rows (before splitting).
    pub fn resolve_k(&self, n_samples: usize) -> usize {
        self.k.unwrap_or_else(|| sqrt_heuristic_k(n_samples))
    }
}
