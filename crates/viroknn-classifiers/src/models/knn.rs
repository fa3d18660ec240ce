//! k-nearest-neighbors classifier.
//!
//! The model is lazy: `fit` keeps an owned copy of the training set and all the
//! work happens in `predict`. For each query the training points are ordered by
//! `(distance, training index)`, the first `k` form the neighborhood and the
//! majority label wins. An even split of the vote goes to the label of the
//! nearest neighbor, so predictions never depend on iteration order.
use std::cmp::Ordering;

use rayon::prelude::*;

use crate::data_handling::{validate_labels, validate_lengths, Label, H1N1, SARS_COV_2};
use crate::error::{ClassifierError, Result};
use crate::math::{Array1, Array2};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::distance::DistanceMetric;

/// `ceil(sqrt(n))`, the neighborhood size used for a dataset of `n` samples.
///
/// The pipeline evaluates this on the full dataset, before splitting.
pub fn sqrt_heuristic_k(n_samples: usize) -> usize {
    (n_samples as f64).sqrt().ceil() as usize
}

/// One member of a query's neighborhood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row of the training set.
    pub index: usize,
    pub distance: f64,
    pub label: Label,
}

#[derive(Debug, Clone)]
struct TrainingSet {
    x: Array2<f64>,
    y: Array1<Label>,
}

#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    metric: DistanceMetric,
    training: Option<TrainingSet>,
}

impl KnnClassifier {
    pub fn new(k: usize, metric: DistanceMetric) -> Result<Self> {
        if k == 0 {
            return Err(ClassifierError::invalid_argument(
                "number of neighbors k must be at least 1",
            ));
        }
        Ok(KnnClassifier {
            k,
            metric,
            training: None,
        })
    }

    /// Classifier with `k = ceil(sqrt(n_samples))`.
    pub fn with_sqrt_heuristic(n_samples: usize, metric: DistanceMetric) -> Result<Self> {
        Self::new(sqrt_heuristic_k(n_samples), metric)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn is_fitted(&self) -> bool {
        self.training.is_some()
    }

    pub fn n_training_samples(&self) -> usize {
        self.training.as_ref().map_or(0, |t| t.y.len())
    }

    /// The `k` nearest training points of every row of `x`, nearest first.
    pub fn kneighbors(&self, x: &Array2<f64>) -> Result<Vec<Vec<Neighbor>>> {
        let training = self.ready_for(x)?;
        Ok(self.map_rows(x, |query| self.nearest(training, query)))
    }

    /// Hard labels and vote fractions from a single neighbor search.
    pub fn predict_with_fractions(&self, x: &Array2<f64>) -> Result<(Vec<Label>, Vec<f64>)> {
        let neighborhoods = self.kneighbors(x)?;
        Ok(neighborhoods
            .iter()
            .map(|neighbors| (vote(neighbors), vote_fraction(neighbors)))
            .unzip())
    }

    fn ready_for(&self, x: &Array2<f64>) -> Result<&TrainingSet> {
        let training = self.training.as_ref().ok_or_else(|| {
            ClassifierError::invalid_state("predict called before fit")
        })?;
        if training.y.is_empty() {
            return Err(ClassifierError::invalid_state(
                "cannot predict with an empty training set",
            ));
        }
        if x.nrows() > 0 && x.ncols() != training.x.ncols() {
            return Err(ClassifierError::invalid_argument(format!(
                "query has {} features but the model was fitted on {}",
                x.ncols(),
                training.x.ncols()
            )));
        }
        if self.k > training.y.len() {
            return Err(ClassifierError::invalid_argument(format!(
                "k = {} exceeds the {} available training samples",
                self.k,
                training.y.len()
            )));
        }
        Ok(training)
    }

    /// Apply `f` to every row of `x` in parallel; output order follows `x`.
    fn map_rows<T, F>(&self, x: &Array2<f64>, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&[f64]) -> T + Sync,
    {
        (0..x.nrows())
            .into_par_iter()
            .map(|row| f(x.row_slice(row)))
            .collect()
    }

    fn nearest(&self, training: &TrainingSet, query: &[f64]) -> Vec<Neighbor> {
        let mut candidates: Vec<Neighbor> = training
            .x
            .rows()
            .zip(training.y.iter())
            .enumerate()
            .map(|(index, (row, &label))| Neighbor {
                index,
                distance: self.metric.distance(query, row),
                label,
            })
            .collect();

        // (distance, index) is a strict total order, so partial selection
        // followed by a sort gives the same neighborhood as a full sort.
        if self.k < candidates.len() {
            candidates.select_nth_unstable_by(self.k - 1, by_distance_then_index);
            candidates.truncate(self.k);
        }
        candidates.sort_unstable_by(by_distance_then_index);
        candidates
    }
}

fn by_distance_then_index(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}

/// Majority label of a non-empty neighborhood ordered nearest first.
fn vote(neighbors: &[Neighbor]) -> Label {
    let positives = neighbors.iter().filter(|n| n.label == SARS_COV_2).count();
    let negatives = neighbors.len() - positives;
    match positives.cmp(&negatives) {
        Ordering::Greater => SARS_COV_2,
        Ordering::Less => H1N1,
        Ordering::Equal => neighbors[0].label,
    }
}

fn vote_fraction(neighbors: &[Neighbor]) -> f64 {
    let positives = neighbors.iter().filter(|n| n.label == SARS_COV_2).count();
    positives as f64 / neighbors.len() as f64
}

impl ClassifierModel for KnnClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<Label>) -> Result<()> {
        validate_lengths(x, y)?;
        validate_labels(y.as_slice())?;
        log::debug!(
            "Fitting k-NN (k = {}, metric = {}) on {} samples with {} features",
            self.k,
            self.metric,
            y.len(),
            x.ncols()
        );
        self.training = Some(TrainingSet {
            x: x.clone(),
            y: y.clone(),
        });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<Label>> {
        let training = self.ready_for(x)?;
        log::trace!("Predicting {} samples", x.nrows());
        Ok(self.map_rows(x, |query| vote(&self.nearest(training, query))))
    }

    /// Fraction of the `k` neighbors labelled SARS-CoV-2.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let training = self.ready_for(x)?;
        Ok(self.map_rows(x, |query| vote_fraction(&self.nearest(training, query))))
    }

    fn name(&self) -> &str {
        "k-nearest-neighbors"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor(index: usize, distance: f64, label: Label) -> Neighbor {
        Neighbor {
            index,
            distance,
            label,
        }
    }

    #[test]
    fn even_vote_falls_back_to_nearest_neighbor() {
        let neighbors = [
            neighbor(3, 0.5, SARS_COV_2),
            neighbor(0, 1.0, H1N1),
            neighbor(1, 1.0, H1N1),
            neighbor(2, 2.0, SARS_COV_2),
        ];
        assert_eq!(vote(&neighbors), SARS_COV_2);
        assert_eq!(vote(&neighbors[1..3]), H1N1);
        assert_eq!(vote_fraction(&neighbors), 0.5);
    }

    #[test]
    fn equal_distances_prefer_lower_training_index() {
        let x = Array2::from_rows(vec![
            vec![2.0],
            vec![0.0],
            vec![2.0],
            vec![0.0],
        ])
        .unwrap();
        let y = Array1::from_vec(vec![SARS_COV_2, H1N1, H1N1, SARS_COV_2]);
        let mut knn = KnnClassifier::new(2, DistanceMetric::Manhattan).unwrap();
        knn.fit(&x, &y).unwrap();

        let query = Array2::from_rows(vec![vec![1.0]]).unwrap();
        let neighbors = knn.kneighbors(&query).unwrap();
        let indices: Vec<usize> = neighbors[0].iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![0, 1]);
        // 1-1 vote, nearest in (distance, index) order is row 0
        assert_eq!(knn.predict(&query).unwrap(), vec![SARS_COV_2]);
    }

    #[test]
    fn single_search_matches_separate_calls() {
        let x = Array2::from_rows(vec![
            vec![0.0, 0.0],
            vec![0.5, 0.2],
            vec![1.0, 1.0],
            vec![4.0, 4.5],
            vec![5.0, 5.0],
            vec![5.5, 4.0],
        ])
        .unwrap();
        let y = Array1::from_vec(vec![H1N1, H1N1, SARS_COV_2, SARS_COV_2, SARS_COV_2, H1N1]);
        let mut knn = KnnClassifier::new(3, DistanceMetric::Manhattan).unwrap();
        knn.fit(&x, &y).unwrap();

        let query = Array2::from_rows(vec![vec![0.2, 0.1], vec![4.8, 4.6], vec![2.5, 2.5]]).unwrap();
        let (labels, fractions) = knn.predict_with_fractions(&query).unwrap();
        assert_eq!(labels, knn.predict(&query).unwrap());
        assert_eq!(fractions, knn.predict_proba(&query).unwrap());
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn k_zero_is_rejected() {
        assert!(matches!(
            KnnClassifier::new(0, DistanceMetric::Manhattan),
            Err(ClassifierError::InvalidArgument(_))
        ));
    }

    #[test]
    fn k_larger_than_training_set_is_rejected() {
        let x = Array2::from_rows(vec![vec![0.0], vec![1.0]]).unwrap();
        let y = Array1::from_vec(vec![H1N1, SARS_COV_2]);
        let mut knn = KnnClassifier::new(3, DistanceMetric::Manhattan).unwrap();
        knn.fit(&x, &y).unwrap();
        let err = knn.predict(&x).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidArgument(_)));
    }
}
