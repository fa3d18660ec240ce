use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Distance between two feature vectors of equal length.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// L1: sum of absolute per-dimension differences.
    #[default]
    Manhattan,
    /// L2: square root of the summed squared differences.
    Euclidean,
    /// L-infinity: largest absolute per-dimension difference.
    Chebyshev,
}

impl DistanceMetric {
    /// Callers guarantee `a.len() == b.len()`.
    #[inline]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let diffs = a.iter().zip(b.iter()).map(|(p, q)| (p - q).abs());
        match self {
            DistanceMetric::Manhattan => diffs.sum(),
            DistanceMetric::Euclidean => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            DistanceMetric::Chebyshev => diffs.fold(0.0, f64::max),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Chebyshev => "chebyshev",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manhattan" | "l1" | "cityblock" => Ok(DistanceMetric::Manhattan),
            "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            "chebyshev" | "linf" => Ok(DistanceMetric::Chebyshev),
            _ => Err(format!(
                "Unknown distance metric: {}. Expected one of manhattan, euclidean, chebyshev",
                s
            )),
        }
    }
}
