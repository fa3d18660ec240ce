//! viroknn-classifiers: k-nearest-neighbors classification of viral genome
//! feature vectors (H1N1 vs SARS-CoV-2) and evaluation of the predictions.
//!
//! The crate is organised the way the pipeline runs: `data_handling` holds the
//! dataset and the seeded train/test splitter, `models` the lazy k-NN learner,
//! `metrics` the evaluation suite, and `pipeline` wires the three together.
//! `io` and `report` are thin adapters for the CLI (reading a prepared feature
//! table, producing text/JSON reports); no plotting happens here.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod math;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;

pub use error::{ClassifierError, Result};
