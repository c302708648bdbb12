//! Loss functions for binary classification with labels in {-1, +1}.
//!
//! Each variant gives the loss of a raw prediction `p` against a label `y` and
//! its derivative with respect to `p`. The set is closed: the variant is picked
//! once from a name when the config is built, so the training loop only does a
//! `match`.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SgdError};

/// Beyond this margin `exp` is replaced by its asymptote.
const LOG_MARGIN_CUTOFF: f64 = 18.0;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LossFunction {
    /// `max(0, 1 - z)`, the SVM loss.
    Hinge,
    /// `log(1 + exp(-z))`, logistic regression.
    Log,
    /// Quadratically smoothed hinge, linear below `z = -1`.
    ModifiedHuber,
    /// `max(0, 1 - z)^2`.
    SquaredHinge,
    /// `(p - y)^2 / 2`, least squares on the ±1 labels.
    SquaredLoss,
}

impl LossFunction {
    pub fn name(&self) -> &'static str {
        match self {
            LossFunction::Hinge => "hinge",
            LossFunction::Log => "log",
            LossFunction::ModifiedHuber => "modifiedhuber",
            LossFunction::SquaredHinge => "squaredhinge",
            LossFunction::SquaredLoss => "squaredloss",
        }
    }

    pub fn loss(&self, p: f64, y: f64) -> f64 {
        let z = p * y;
        match self {
            LossFunction::Hinge => (1.0 - z).max(0.0),
            LossFunction::Log => {
                if z > LOG_MARGIN_CUTOFF {
                    (-z).exp()
                } else if z < -LOG_MARGIN_CUTOFF {
                    -z
                } else {
                    (-z).exp().ln_1p()
                }
            }
            LossFunction::ModifiedHuber => {
                if z >= 1.0 {
                    0.0
                } else if z >= -1.0 {
                    (1.0 - z) * (1.0 - z)
                } else {
                    -4.0 * z
                }
            }
            LossFunction::SquaredHinge => {
                let r = (1.0 - z).max(0.0);
                r * r
            }
            LossFunction::SquaredLoss => 0.5 * (p - y) * (p - y),
        }
    }

    /// Derivative of `loss` with respect to `p`.
    pub fn dloss(&self, p: f64, y: f64) -> f64 {
        let z = p * y;
        match self {
            // the subgradient at z == 1 is taken as 0
            LossFunction::Hinge => {
                if z < 1.0 {
                    -y
                } else {
                    0.0
                }
            }
            LossFunction::Log => {
                if z > LOG_MARGIN_CUTOFF {
                    -y * (-z).exp()
                } else if z < -LOG_MARGIN_CUTOFF {
                    -y
                } else {
                    -y / (z.exp() + 1.0)
                }
            }
            LossFunction::ModifiedHuber => {
                if z >= 1.0 {
                    0.0
                } else if z >= -1.0 {
                    -2.0 * y * (1.0 - z)
                } else {
                    -4.0 * y
                }
            }
            LossFunction::SquaredHinge => {
                if z < 1.0 {
                    -2.0 * y * (1.0 - z)
                } else {
                    0.0
                }
            }
            LossFunction::SquaredLoss => p - y,
        }
    }

    /// Whether the decision value has a probability reading.
    pub fn supports_proba(&self) -> bool {
        matches!(self, LossFunction::Log)
    }

    /// Probability of the positive class for a decision value.
    pub fn proba(&self, decision: f64) -> Result<f64> {
        match self {
            LossFunction::Log => Ok(sigmoid(decision)),
            other => Err(SgdError::NotSupportedForLoss(*other)),
        }
    }
}

/// Logistic function, evaluated without overflowing for large `|x|`.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

impl fmt::Display for LossFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LossFunction {
    type Err = SgdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hinge" => Ok(LossFunction::Hinge),
            "log" => Ok(LossFunction::Log),
            "modifiedhuber" => Ok(LossFunction::ModifiedHuber),
            "squaredhinge" => Ok(LossFunction::SquaredHinge),
            "squaredloss" => Ok(LossFunction::SquaredLoss),
            _ => Err(SgdError::InvalidConfiguration(format!(
                "Unknown loss: {}. Valid options are: hinge, log, modifiedhuber, squaredhinge, squaredloss",
                s
            ))),
        }
    }
}
