//! Small numeric containers used throughout the crate.
//!
//! `Array2` is a dense row-major matrix used to hand dense examples to the
//! crate, `SparseVector` is the compressed per-example representation the
//! trainer works on, and `ScaledWeights` is the dense weight vector with
//! lazily applied L2 decay and cumulative L1 truncation.
pub mod matrix;
pub mod sparse;
pub mod vector;
pub mod weights;

pub use matrix::{Array2, ShapeError};
pub use sparse::SparseVector;
pub use weights::ScaledWeights;
