//! Learning-rate schedule.
//!
//! `eta(t) = eta0 / (1 + eta0 * alpha * t)`, i.e. `1 / (alpha * (t + t0))` with
//! `t0 = 1 / (eta0 * alpha)`. When no `eta0` is given it is derived from the
//! size of a typical weight, `typw = sqrt(1 / sqrt(alpha))`, so the first steps
//! neither stall nor explode. Losses whose slope at `-typw` exceeds 1 get a
//! proportionally smaller start.
use crate::sgd::loss::LossFunction;

/// Fraction of the weight learning rate used for the intercept.
pub const INTERCEPT_DECAY: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningRate {
    eta0: f64,
    alpha: f64,
}

impl LearningRate {
    pub fn new(eta0: f64, alpha: f64) -> Self {
        Self { eta0, alpha }
    }

    /// Schedule with `eta0` picked from `alpha` and the loss.
    pub fn heuristic(loss: LossFunction, alpha: f64) -> Self {
        let typw = (1.0 / alpha.sqrt()).sqrt();
        let eta0 = typw / loss.dloss(-typw, 1.0).abs().max(1.0);
        Self::new(eta0, alpha)
    }

    pub fn eta0(&self) -> f64 {
        self.eta0
    }

    /// Step size for global step `t` (0-based).
    #[inline]
    pub fn eta(&self, t: u64) -> f64 {
        self.eta0 / (1.0 + self.eta0 * self.alpha * t as f64)
    }
}
