use crate::data_handling::SparseDataset;
use crate::error::Result;
use crate::math::SparseVector;

/// A small trait abstraction for binary linear classifiers over sparse
/// examples, so callers can hold a model behind `Box<dyn ClassifierModel>`
/// without knowing how it was trained.
pub trait ClassifierModel: Send + Sync {
    /// Fit the model. Labels may be any two distinct integers.
    fn fit(&mut self, data: &SparseDataset) -> Result<()>;

    /// Raw score `w . x + b`.
    fn decision_function(&self, x: &SparseVector) -> Result<f64>;

    /// Predicted class in the label domain seen during `fit`.
    fn predict(&self, x: &SparseVector) -> Result<i32>;

    /// Probability of the larger class label, when the model has one.
    fn predict_proba(&self, x: &SparseVector) -> Result<f64>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
