//! Stochastic gradient descent for sparse linear classifiers.
//!
//! `loss` and `penalty` hold the closed sets of loss functions and
//! regularizers, `schedule` the step-size decay, and `trainer` the epoch loop
//! that ties them to a `ScaledWeights` vector.
pub mod loss;
pub mod penalty;
pub mod schedule;
pub mod trainer;

pub use loss::LossFunction;
pub use penalty::{Penalty, PenaltyUpdater};
pub use schedule::LearningRate;
pub use trainer::{EpochSummary, SgdTrainer, TrainOutput, TrainerState, WarmStart};
