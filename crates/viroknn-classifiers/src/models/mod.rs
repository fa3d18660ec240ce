pub mod classifier_trait;
pub mod distance;
pub mod knn;

pub use classifier_trait::ClassifierModel;
pub use distance::DistanceMetric;
pub use knn::{sqrt_heuristic_k, KnnClassifier, Neighbor};
