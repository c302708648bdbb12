use rayon::prelude::*;

use crate::config::{LossFunction, Penalty, SgdConfig};
use crate::data_handling::{BinaryLabels, SparseDataset};
use crate::error::{Result, SgdError};
use crate::math::SparseVector;
use crate::models::classifier_trait::ClassifierModel;
use crate::sgd::{EpochSummary, SgdTrainer, TrainerState, WarmStart};

/// Linear classifier fitted by stochastic gradient descent on sparse data.
///
/// The decision function is `coef . x + intercept`; `predict` maps its sign
/// back onto the two labels seen during `fit` (larger label on the positive
/// side).
#[derive(Debug)]
pub struct SgdClassifier {
    trainer: SgdTrainer,
    coef: Option<Vec<f64>>,
    sparse_coef: Option<SparseVector>,
    intercept: f64,
    labels: Option<BinaryLabels>,
    epochs: Vec<EpochSummary>,
}

impl SgdClassifier {
    /// Validate `config` and build an unfitted classifier.
    pub fn new(config: SgdConfig) -> Result<Self> {
        Ok(SgdClassifier {
            trainer: SgdTrainer::new(config)?,
            coef: None,
            sparse_coef: None,
            intercept: 0.0,
            labels: None,
            epochs: Vec::new(),
        })
    }

    pub fn config(&self) -> &SgdConfig {
        self.trainer.config()
    }

    pub fn loss(&self) -> LossFunction {
        self.config().loss
    }

    pub fn penalty(&self) -> Penalty {
        self.config().penalty
    }

    pub fn alpha(&self) -> f64 {
        self.config().alpha
    }

    /// Elastic-net mixing in effect (1.0 for `l2`, 0.0 for `l1`).
    pub fn rho(&self) -> f64 {
        self.config().effective_rho()
    }

    pub fn state(&self) -> TrainerState {
        self.trainer.state()
    }

    pub fn fit(&mut self, data: &SparseDataset) -> Result<&mut Self> {
        self.fit_with_init(data, None, None)
    }

    /// Fit starting from the given coefficients and intercept instead of zeros.
    pub fn fit_with_init(
        &mut self,
        data: &SparseDataset,
        coef_init: Option<Vec<f64>>,
        intercept_init: Option<f64>,
    ) -> Result<&mut Self> {
        let warm_start = WarmStart {
            coef: coef_init,
            intercept: intercept_init,
        };
        match self.trainer.train(data, warm_start) {
            Ok(out) => {
                self.set_coef(Some(out.weights));
                self.intercept = out.intercept;
                self.labels = Some(out.labels);
                self.epochs = out.epochs;
                Ok(self)
            }
            Err(e) => {
                log::debug!("Fit failed, clearing fitted state: {}", e);
                self.set_coef(None);
                self.intercept = 0.0;
                self.labels = None;
                self.epochs.clear();
                Err(e)
            }
        }
    }

    pub fn coef(&self) -> Option<&[f64]> {
        self.coef.as_deref()
    }

    /// Nonzero coefficients only; `None` after `set_coef(None)`.
    pub fn sparse_coef(&self) -> Option<&SparseVector> {
        self.sparse_coef.as_ref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Replace the coefficients. `None` resets them to the unset state.
    pub fn set_coef(&mut self, coef: Option<Vec<f64>>) {
        self.sparse_coef = coef.as_deref().map(SparseVector::from_dense);
        self.coef = coef;
    }

    pub fn set_intercept(&mut self, intercept: f64) {
        self.intercept = intercept;
    }

    /// The two labels seen during the last successful fit, negative first.
    pub fn classes(&self) -> Option<[i32; 2]> {
        self.labels.map(|l| l.classes())
    }

    /// Per-epoch statistics of the last successful fit.
    pub fn epochs(&self) -> &[EpochSummary] {
        &self.epochs
    }

    pub fn decision_function(&self, x: &SparseVector) -> Result<f64> {
        match &self.coef {
            None => Ok(self.intercept),
            Some(coef) => {
                if x.min_dim() > coef.len() {
                    return Err(SgdError::DimensionMismatch {
                        expected: coef.len(),
                        found: x.min_dim(),
                    });
                }
                Ok(x.dot(coef) + self.intercept)
            }
        }
    }

    pub fn predict(&self, x: &SparseVector) -> Result<i32> {
        let labels = self.labels.ok_or(SgdError::NotFitted)?;
        Ok(labels.decode(self.decision_function(x)?))
    }

    /// Probability of the positive (larger) label. Only the `log` loss has one.
    pub fn predict_proba(&self, x: &SparseVector) -> Result<f64> {
        let loss = self.loss();
        if !loss.supports_proba() {
            return Err(SgdError::NotSupportedForLoss(loss));
        }
        loss.proba(self.decision_function(x)?)
    }

    /// Decision values for every row, computed in parallel.
    pub fn decision_function_batch(&self, rows: &[SparseVector]) -> Result<Vec<f64>> {
        rows.par_iter().map(|x| self.decision_function(x)).collect()
    }

    pub fn predict_batch(&self, rows: &[SparseVector]) -> Result<Vec<i32>> {
        let labels = self.labels.ok_or(SgdError::NotFitted)?;
        Ok(self
            .decision_function_batch(rows)?
            .into_iter()
            .map(|d| labels.decode(d))
            .collect())
    }

    /// Fraction of `data` predicted correctly.
    pub fn score(&self, data: &SparseDataset) -> Result<f64> {
        if data.is_empty() {
            return Err(SgdError::InvalidData("cannot score an empty dataset".to_string()));
        }
        let predictions = self.predict_batch(data.rows())?;
        let correct = predictions
            .iter()
            .zip(data.labels())
            .filter(|(p, y)| p == y)
            .count();
        Ok(correct as f64 / data.len() as f64)
    }
}

impl ClassifierModel for SgdClassifier {
    fn fit(&mut self, data: &SparseDataset) -> Result<()> {
        SgdClassifier::fit(self, data).map(|_| ())
    }

    fn decision_function(&self, x: &SparseVector) -> Result<f64> {
        SgdClassifier::decision_function(self, x)
    }

    fn predict(&self, x: &SparseVector) -> Result<i32> {
        SgdClassifier::predict(self, x)
    }

    fn predict_proba(&self, x: &SparseVector) -> Result<f64> {
        SgdClassifier::predict_proba(self, x)
    }

    fn name(&self) -> &str {
        "sgd"
    }
}
