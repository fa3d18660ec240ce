//! Small ndarray-like containers used throughout the crate.
//!
//! `Array2` stores the feature matrix row-major (one row per sample) and
//! `Array1` the label vector. They only carry what the pipeline needs: shape
//! checks, row access and row selection for the splitter.
pub mod matrix;
pub mod vector;

pub use matrix::{Array2, ShapeError};
pub use vector::Array1;
