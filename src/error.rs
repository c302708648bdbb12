use std::error::Error;
use std::fmt;

use crate::sgd::loss::LossFunction;

/// Errors raised while configuring, fitting or querying an SGD classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum SgdError {
    /// Unknown loss/penalty name or a hyper-parameter out of range.
    InvalidConfiguration(String),
    /// Training labels contain more than two distinct values.
    MulticlassNotSupported { n_classes: usize },
    /// `predict_proba` called for a loss without a probability interpretation.
    NotSupportedForLoss(LossFunction),
    /// Training data that cannot be fitted (empty set, single class, ...).
    InvalidData(String),
    DimensionMismatch { expected: usize, found: usize },
    /// Weights or intercept became NaN/inf during the given epoch.
    NumericalInstability { epoch: usize },
    NotFitted,
}

impl fmt::Display for SgdError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SgdError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            SgdError::MulticlassNotSupported { n_classes } => write!(
                f,
                "SGD supports binary classification only, found {} classes",
                n_classes
            ),
            SgdError::NotSupportedForLoss(loss) => write!(
                f,
                "Probability estimates are not available for loss '{}'",
                loss
            ),
            SgdError::InvalidData(msg) => write!(f, "Invalid training data: {}", msg),
            SgdError::DimensionMismatch { expected, found } => write!(
                f,
                "Dimension mismatch: expected {} features, found {}",
                expected, found
            ),
            SgdError::NumericalInstability { epoch } => write!(
                f,
                "Floating-point under-/overflow occurred during epoch {}",
                epoch
            ),
            SgdError::NotFitted => write!(f, "Model has not been fitted"),
        }
    }
}

impl Error for SgdError {}

pub type Result<T> = std::result::Result<T, SgdError>;
