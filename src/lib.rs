//! sparse-sgd: stochastic gradient descent linear classifiers for sparse data.
//!
//! This crate trains binary linear classifiers (hinge, log, modified-huber and
//! squared losses; L1, L2 and elastic-net penalties) one example at a time over
//! sparse feature vectors. L2 shrinkage is applied lazily through a global
//! scale and L1 truncation only to the coordinates an example touches, so a
//! step costs O(nnz) rather than O(d).
//!
//! The pieces are kept small and testable: `math` holds the sparse and weight
//! containers, `sgd` the losses, penalties, schedule and epoch loop, `models`
//! the fitted `SgdClassifier`, and `io` an svmlight reader.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod sgd;

pub use config::SgdConfig;
pub use data_handling::SparseDataset;
pub use error::SgdError;
pub use math::SparseVector;
pub use models::sgd::SgdClassifier;
