//! Hyper-parameters for the SGD classifier and their validation.
//!
//! `SgdConfig` is plain data (serde friendly) so it can be loaded from JSON;
//! nothing is trained until it has passed `SgdConfig::validate`.
use serde::{Deserialize, Serialize};

use crate::error::{Result, SgdError};
pub use crate::sgd::loss::LossFunction;
pub use crate::sgd::penalty::Penalty;

/// Default elastic-net mixing when the caller does not supply one.
pub const DEFAULT_ELASTICNET_RHO: f64 = 0.15;

/// Central configuration for the SGD classifier.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SgdConfig {
    pub loss: LossFunction,
    pub penalty: Penalty,
    /// Regularization strength, must be positive.
    pub alpha: f64,
    /// Elastic-net mixing. Ignored in favour of the preset for `l1` / `l2`.
    pub rho: Option<f64>,
    pub n_iter: usize,
    pub shuffle: bool,
    pub fit_intercept: bool,
    /// Initial learning rate. `None` derives it from `alpha` and the loss.
    pub eta0: Option<f64>,
    /// Seed for the shuffling generator. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Report epoch statistics at info level instead of debug.
    pub verbose: bool,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            loss: LossFunction::Hinge,
            penalty: Penalty::L2,
            alpha: 0.0001,
            rho: None,
            n_iter: 5,
            shuffle: false,
            fit_intercept: true,
            eta0: None,
            seed: None,
            verbose: false,
        }
    }
}

impl SgdConfig {
    pub fn new(loss: LossFunction, penalty: Penalty) -> Self {
        Self {
            loss,
            penalty,
            ..Default::default()
        }
    }

    /// Build a config from loss and penalty names, failing on unknown names.
    pub fn from_names(loss: &str, penalty: &str) -> Result<Self> {
        Ok(Self::new(loss.parse()?, penalty.parse()?))
    }

    /// Parse and validate a JSON document. Type errors in the document
    /// (e.g. a string for `shuffle`, a negative `n_iter`) are configuration errors.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SgdConfig = serde_json::from_str(json)
            .map_err(|e| SgdError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The elastic-net mixing actually used for training.
    pub fn effective_rho(&self) -> f64 {
        match self.penalty {
            Penalty::L2 => 1.0,
            Penalty::L1 => 0.0,
            Penalty::ElasticNet => self.rho.unwrap_or(DEFAULT_ELASTICNET_RHO),
        }
    }

    /// Check every hyper-parameter before training may start.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(SgdError::InvalidConfiguration(format!(
                "alpha must be positive and finite, got {}",
                self.alpha
            )));
        }
        if let Some(rho) = self.rho {
            if !(0.0..=1.0).contains(&rho) {
                return Err(SgdError::InvalidConfiguration(format!(
                    "rho must be in [0, 1], got {}",
                    rho
                )));
            }
            if self.penalty != Penalty::ElasticNet && rho != self.effective_rho() {
                log::warn!(
                    "rho={} is ignored for penalty '{}' (using {})",
                    rho,
                    self.penalty,
                    self.effective_rho()
                );
            }
        }
        if self.n_iter == 0 {
            return Err(SgdError::InvalidConfiguration(
                "n_iter must be at least 1".to_string(),
            ));
        }
        if let Some(eta0) = self.eta0 {
            if !(eta0.is_finite() && eta0 > 0.0) {
                return Err(SgdError::InvalidConfiguration(format!(
                    "eta0 must be positive and finite, got {}",
                    eta0
                )));
            }
        }
        Ok(())
    }
}
