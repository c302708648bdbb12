//! The SGD epoch loop.
//!
//! A trainer is built from a validated `SgdConfig` and walks through
//! `Uninitialized -> Validated -> Training { epoch } -> Converged` on every
//! call to `train`. A fit that fails (bad label set, wrong dimensions,
//! diverging weights) drops back to `Uninitialized` and returns no weights.
use std::time::Instant;

use log::Level;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::SgdConfig;
use crate::data_handling::{BinaryLabels, SparseDataset};
use crate::error::{Result, SgdError};
use crate::math::vector::{all_finite, count_nonzero, l2_norm};
use crate::math::ScaledWeights;
use crate::sgd::loss::LossFunction;
use crate::sgd::penalty::PenaltyUpdater;
use crate::sgd::schedule::{LearningRate, INTERCEPT_DECAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    Uninitialized,
    /// Label set and dimensions checked, no step taken yet.
    Validated,
    Training {
        epoch: usize,
    },
    Converged,
}

/// Statistics reported at the end of each epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochSummary {
    pub epoch: usize,
    pub norm: f64,
    pub nnz: usize,
    pub intercept: f64,
    /// Global step count at the end of the epoch.
    pub steps: u64,
    pub avg_loss: f64,
}

/// Result of a successful `SgdTrainer::train` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOutput {
    pub weights: Vec<f64>,
    pub intercept: f64,
    pub labels: BinaryLabels,
    pub epochs: Vec<EpochSummary>,
}

/// Optional warm start for `SgdTrainer::train`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarmStart {
    pub coef: Option<Vec<f64>>,
    pub intercept: Option<f64>,
}

#[derive(Debug)]
pub struct SgdTrainer {
    config: SgdConfig,
    loss: LossFunction,
    penalty: PenaltyUpdater,
    schedule: LearningRate,
    rng: StdRng,
    state: TrainerState,
}

impl SgdTrainer {
    pub fn new(config: SgdConfig) -> Result<Self> {
        config.validate()?;
        let loss = config.loss;
        let penalty = PenaltyUpdater::new(config.alpha, config.effective_rho());
        let schedule = match config.eta0 {
            Some(eta0) => LearningRate::new(eta0, config.alpha),
            None => LearningRate::heuristic(loss, config.alpha),
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(SgdTrainer {
            config,
            loss,
            penalty,
            schedule,
            rng,
            state: TrainerState::Uninitialized,
        })
    }

    pub fn config(&self) -> &SgdConfig {
        &self.config
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    pub fn learning_rate(&self) -> &LearningRate {
        &self.schedule
    }

    /// Run `n_iter` epochs over `data` and return the final weights.
    pub fn train(&mut self, data: &SparseDataset, warm_start: WarmStart) -> Result<TrainOutput> {
        self.state = TrainerState::Uninitialized;
        let result = self.run(data, warm_start);
        if result.is_err() {
            self.state = TrainerState::Uninitialized;
        }
        result
    }

    fn run(&mut self, data: &SparseDataset, warm_start: WarmStart) -> Result<TrainOutput> {
        let labels = BinaryLabels::from_labels(data.labels())?;
        let n_features = data.n_features();

        let mut weights = match warm_start.coef {
            Some(coef) if coef.len() != n_features => {
                return Err(SgdError::DimensionMismatch {
                    expected: n_features,
                    found: coef.len(),
                });
            }
            Some(coef) => ScaledWeights::from_vec(coef),
            None => ScaledWeights::zeros(n_features),
        };
        let mut intercept = if self.config.fit_intercept {
            warm_start.intercept.unwrap_or(0.0)
        } else {
            0.0
        };
        let targets: Vec<f64> = data.labels().iter().map(|&l| labels.encode(l)).collect();
        self.state = TrainerState::Validated;

        let level = if self.config.verbose {
            Level::Info
        } else {
            Level::Debug
        };
        data.log_input_data_summary(level);
        log::debug!(
            "Training SGD (loss={}, penalty={}, alpha={}, rho={}, eta0={:.6}) on {} examples x {} features",
            self.loss,
            self.config.penalty,
            self.config.alpha,
            self.config.effective_rho(),
            self.schedule.eta0(),
            data.len(),
            n_features
        );

        let start = Instant::now();
        let mut order: Vec<usize> = (0..data.len()).collect();
        let mut epochs = Vec::with_capacity(self.config.n_iter);
        let mut t: u64 = 0;

        for epoch in 1..=self.config.n_iter {
            self.state = TrainerState::Training { epoch };
            if self.config.shuffle {
                order.shuffle(&mut self.rng);
            }

            let mut sum_loss = 0.0;
            for &i in &order {
                let x = data.row(i);
                let y = targets[i];
                let eta = self.schedule.eta(t);
                let p = weights.dot(x) + intercept;
                sum_loss += self.loss.loss(p, y);

                let update = eta * self.loss.dloss(p, y);
                if update != 0.0 {
                    weights.add_scaled(x, -update);
                    if self.config.fit_intercept {
                        intercept -= update * INTERCEPT_DECAY;
                    }
                }
                self.penalty.apply(&mut weights, x, eta);
                t += 1;
            }

            let current = weights.to_vec();
            let summary = EpochSummary {
                epoch,
                norm: l2_norm(&current),
                nnz: count_nonzero(&current),
                intercept,
                steps: t,
                avg_loss: sum_loss / data.len() as f64,
            };
            log::log!(
                level,
                "-- Epoch {}: norm {:.2}, nnz {}, bias {:.6}, steps {}, avg. loss {:.6}",
                summary.epoch,
                summary.norm,
                summary.nnz,
                summary.intercept,
                summary.steps,
                summary.avg_loss
            );
            epochs.push(summary);

            if !all_finite(&current) || !intercept.is_finite() {
                log::error!("Weights diverged during epoch {}", epoch);
                return Err(SgdError::NumericalInstability { epoch });
            }
        }

        log::log!(
            level,
            "Total training time: {:.2} seconds",
            start.elapsed().as_secs_f64()
        );

        self.state = TrainerState::Converged;
        Ok(TrainOutput {
            weights: weights.into_vec(),
            intercept,
            labels,
            epochs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Penalty;
    use crate::math::{Array2, SparseVector};

    fn separable() -> SparseDataset {
        let x = Array2::from_shape_vec(
            (6, 2),
            vec![-2.0, -1.0, -1.0, -1.0, -1.0, -2.0, 1.0, 1.0, 1.0, 2.0, 2.0, 1.0],
        )
        .unwrap();
        SparseDataset::from_dense(&x, &[1, 1, 1, 2, 2, 2]).unwrap()
    }

    fn config() -> SgdConfig {
        SgdConfig {
            alpha: 0.01,
            n_iter: 10,
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn walks_through_states() {
        let mut trainer = SgdTrainer::new(config()).unwrap();
        assert_eq!(trainer.state(), TrainerState::Uninitialized);
        let out = trainer.train(&separable(), WarmStart::default()).unwrap();
        assert_eq!(trainer.state(), TrainerState::Converged);
        assert_eq!(out.epochs.len(), 10);
        assert_eq!(out.epochs.last().unwrap().steps, 60);
        assert_eq!(out.labels.classes(), [1, 2]);
        assert!(out.weights[0] > 0.0 && out.weights[1] > 0.0);
    }

    #[test]
    fn learning_rate_follows_config() {
        let fixed = SgdTrainer::new(SgdConfig {
            eta0: Some(0.05),
            ..config()
        })
        .unwrap();
        assert_eq!(fixed.learning_rate().eta0(), 0.05);

        let derived = SgdTrainer::new(config()).unwrap();
        assert_eq!(
            *derived.learning_rate(),
            LearningRate::heuristic(LossFunction::Hinge, 0.01)
        );
    }

    #[test]
    fn failed_fit_leaves_trainer_uninitialized() {
        let mut trainer = SgdTrainer::new(config()).unwrap();
        let x = vec![
            SparseVector::from_dense(&[1.0]),
            SparseVector::from_dense(&[2.0]),
            SparseVector::from_dense(&[3.0]),
        ];
        let data = SparseDataset::new(x, vec![1, 2, 3], 1).unwrap();
        let err = trainer.train(&data, WarmStart::default()).unwrap_err();
        assert_eq!(err, SgdError::MulticlassNotSupported { n_classes: 3 });
        assert_eq!(trainer.state(), TrainerState::Uninitialized);
    }

    #[test]
    fn warm_start_dimension_is_checked() {
        let mut trainer = SgdTrainer::new(config()).unwrap();
        let warm = WarmStart {
            coef: Some(vec![0.0; 3]),
            intercept: None,
        };
        let err = trainer.train(&separable(), warm).unwrap_err();
        assert_eq!(
            err,
            SgdError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn intercept_stays_zero_when_not_fitted() {
        let cfg = SgdConfig {
            fit_intercept: false,
            ..config()
        };
        let mut trainer = SgdTrainer::new(cfg).unwrap();
        let warm = WarmStart {
            coef: None,
            intercept: Some(3.0),
        };
        let out = trainer.train(&separable(), warm).unwrap();
        assert_eq!(out.intercept, 0.0);
    }

    #[test]
    fn same_seed_same_weights() {
        let cfg = SgdConfig {
            shuffle: true,
            penalty: Penalty::ElasticNet,
            rho: Some(0.5),
            ..config()
        };
        let a = SgdTrainer::new(cfg.clone())
            .unwrap()
            .train(&separable(), WarmStart::default())
            .unwrap();
        let b = SgdTrainer::new(cfg)
            .unwrap()
            .train(&separable(), WarmStart::default())
            .unwrap();
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.intercept, b.intercept);
    }

    #[test]
    fn huge_learning_rate_is_reported_as_instability() {
        let cfg = SgdConfig {
            loss: LossFunction::SquaredLoss,
            eta0: Some(1e200),
            alpha: 1e-300,
            ..config()
        };
        let mut trainer = SgdTrainer::new(cfg).unwrap();
        let err = trainer.train(&separable(), WarmStart::default()).unwrap_err();
        assert!(matches!(err, SgdError::NumericalInstability { .. }));
        assert_eq!(trainer.state(), TrainerState::Uninitialized);
    }
}
