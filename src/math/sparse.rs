//! Compressed sparse representation of a single example.

use std::fmt;

use crate::error::{Result, SgdError};

/// Nonzero `(index, value)` pairs of one example, indices strictly ascending.
///
/// A `SparseVector` is read-only once built; the trainer only ever walks its
/// nonzeros, so every operation here is O(nnz).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// The all-zero vector.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keep the nonzero entries of a dense row.
    pub fn from_dense(dense: &[f64]) -> Self {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for (idx, &value) in dense.iter().enumerate() {
            if value != 0.0 {
                indices.push(idx);
                values.push(value);
            }
        }
        Self { indices, values }
    }

    /// Build from arbitrary-order pairs. Explicit zeros are dropped; a repeated
    /// index or a non-finite value is rejected.
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Result<Self> {
        pairs.sort_unstable_by_key(|&(idx, _)| idx);
        let mut indices = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        let mut prev = None;
        for (idx, value) in pairs {
            if !value.is_finite() {
                return Err(SgdError::InvalidData(format!(
                    "non-finite value {} at feature {}",
                    value, idx
                )));
            }
            if prev == Some(idx) {
                return Err(SgdError::InvalidData(format!(
                    "duplicate feature index {}",
                    idx
                )));
            }
            prev = Some(idx);
            if value != 0.0 {
                indices.push(idx);
                values.push(value);
            }
        }
        Ok(Self { indices, values })
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Largest stored index, `None` for the all-zero vector.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Smallest dense length able to hold this vector.
    pub fn min_dim(&self) -> usize {
        self.max_index().map_or(0, |idx| idx + 1)
    }

    /// `sum(value_i * weights[index_i])`.
    ///
    /// Panics if an index falls outside `weights`; callers check dimensions
    /// before entering hot loops.
    #[inline]
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.iter().map(|(idx, value)| value * weights[idx]).sum()
    }
}

impl fmt::Display for SparseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (pos, (idx, value)) in self.iter().enumerate() {
            write!(f, "{}:{}", idx, value)?;
            if pos + 1 != self.nnz() {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}
