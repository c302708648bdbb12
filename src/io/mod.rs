//! Dataset readers.
pub mod svmlight;
