use crate::data_handling::Label;
use crate::error::Result;
use crate::math::{Array1, Array2};

/// Contract shared by the classifiers the pipeline can drive.
pub trait ClassifierModel {
    /// Fit the model. Labels follow the crate convention (0 = H1N1, 1 = SARS-CoV-2).
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<Label>) -> Result<()>;

    /// Predict hard labels, one per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<Label>>;

    /// Continuous score in `[0, 1]` for class 1, one per row of `x`.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
