//! Regularization penalties and the per-step shrinkage they apply.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SgdError};
use crate::math::{ScaledWeights, SparseVector};

/// Named penalties. `L2` and `L1` fix the elastic-net mixing `rho` to 1.0 and
/// 0.0; `ElasticNet` uses the caller's `rho`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Penalty {
    L1,
    L2,
    ElasticNet,
}

impl Penalty {
    pub fn name(&self) -> &'static str {
        match self {
            Penalty::L1 => "l1",
            Penalty::L2 => "l2",
            Penalty::ElasticNet => "elasticnet",
        }
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Penalty {
    type Err = SgdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "l1" => Ok(Penalty::L1),
            "l2" => Ok(Penalty::L2),
            "elasticnet" => Ok(Penalty::ElasticNet),
            _ => Err(SgdError::InvalidConfiguration(format!(
                "Unknown penalty: {}. Valid options are: l1, l2, elasticnet",
                s
            ))),
        }
    }
}

/// Shrinks the weights after each gradient step.
///
/// With mixing `rho`, a step of size `eta` decays all weights by
/// `1 - rho * eta * alpha` (lazily, see `ScaledWeights`) and grants each
/// weight `(1 - rho) * eta * alpha` more L1 truncation, which is applied to
/// the coordinates the current example touches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyUpdater {
    l2_strength: f64,
    l1_strength: f64,
}

impl PenaltyUpdater {
    pub fn new(alpha: f64, rho: f64) -> Self {
        Self {
            l2_strength: rho * alpha,
            l1_strength: (1.0 - rho) * alpha,
        }
    }

    pub fn has_l2(&self) -> bool {
        self.l2_strength > 0.0
    }

    pub fn has_l1(&self) -> bool {
        self.l1_strength > 0.0
    }

    pub fn apply(&self, weights: &mut ScaledWeights, x: &SparseVector, eta: f64) {
        if self.has_l2() {
            weights.decay(1.0 - self.l2_strength * eta);
        }
        if self.has_l1() {
            weights.accumulate_l1(self.l1_strength * eta);
            weights.apply_l1(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_l2_only_decays() {
        let updater = PenaltyUpdater::new(0.1, 1.0);
        assert!(updater.has_l2());
        assert!(!updater.has_l1());

        let mut w = ScaledWeights::from_vec(vec![1.0, -2.0]);
        let x = SparseVector::from_dense(&[1.0, 0.0]);
        updater.apply(&mut w, &x, 1.0);
        assert!((w.get(0) - 0.9).abs() < 1e-12);
        assert!((w.get(1) + 1.8).abs() < 1e-12);
    }

    #[test]
    fn pure_l1_only_clips_touched() {
        let updater = PenaltyUpdater::new(0.1, 0.0);
        assert!(!updater.has_l2());

        let mut w = ScaledWeights::from_vec(vec![1.0, -2.0]);
        let x = SparseVector::from_dense(&[1.0, 0.0]);
        updater.apply(&mut w, &x, 1.0);
        assert!((w.get(0) - 0.9).abs() < 1e-12);
        assert_eq!(w.get(1), -2.0);
    }

    #[test]
    fn elastic_net_mixes_both() {
        let updater = PenaltyUpdater::new(1.0, 0.5);
        let mut w = ScaledWeights::from_vec(vec![1.0]);
        let x = SparseVector::from_dense(&[1.0]);
        updater.apply(&mut w, &x, 0.1);
        // 1.0 * (1 - 0.05) - 0.05
        assert!((w.get(0) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn unknown_penalty_name_is_rejected() {
        assert!(matches!(
            "foobar".parse::<Penalty>(),
            Err(SgdError::InvalidConfiguration(_))
        ));
        assert_eq!("l1".parse::<Penalty>().unwrap(), Penalty::L1);
    }
}
