//! Training data: sparse examples with integer class labels.
//!
//! `SparseDataset` owns the rows and labels handed to the trainer and checks
//! that every row fits the declared feature dimensionality. `BinaryLabels`
//! maps the two class values of a dataset onto the {-1, +1} targets the loss
//! functions expect, and back.
use std::collections::BTreeSet;

use log::Level;

use crate::error::{Result, SgdError};
use crate::math::{Array2, SparseVector};

#[derive(Debug, Clone, PartialEq)]
pub struct SparseDataset {
    x: Vec<SparseVector>,
    y: Vec<i32>,
    n_features: usize,
}

impl SparseDataset {
    pub fn new(x: Vec<SparseVector>, y: Vec<i32>, n_features: usize) -> Result<Self> {
        if x.len() != y.len() {
            return Err(SgdError::InvalidData(format!(
                "{} examples but {} labels",
                x.len(),
                y.len()
            )));
        }
        if let Some(found) = x.iter().map(SparseVector::min_dim).max() {
            if found > n_features {
                return Err(SgdError::DimensionMismatch {
                    expected: n_features,
                    found,
                });
            }
        }
        Ok(SparseDataset { x, y, n_features })
    }

    /// Dimensionality taken from the largest index present.
    pub fn from_rows(x: Vec<SparseVector>, y: Vec<i32>) -> Result<Self> {
        let n_features = x.iter().map(SparseVector::min_dim).max().unwrap_or(0);
        Self::new(x, y, n_features)
    }

    /// Compress a dense matrix; the column count is the dimensionality.
    pub fn from_dense(x: &Array2<f64>, y: &[i32]) -> Result<Self> {
        let rows = x.rows().map(SparseVector::from_dense).collect();
        Self::new(rows, y.to_vec(), x.ncols())
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.x
    }

    pub fn labels(&self) -> &[i32] {
        &self.y
    }

    pub fn row(&self, idx: usize) -> &SparseVector {
        &self.x[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SparseVector, i32)> + '_ {
        self.x.iter().zip(self.y.iter().copied())
    }

    /// Distinct label values, ascending.
    pub fn classes(&self) -> Vec<i32> {
        self.y.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
    }

    pub fn nnz(&self) -> usize {
        self.x.iter().map(SparseVector::nnz).sum()
    }

    /// Report size, density and label set at `level`.
    pub fn log_input_data_summary(&self, level: Level) {
        let cells = self.len() * self.n_features;
        let density = if cells == 0 {
            0.0
        } else {
            self.nnz() as f64 / cells as f64
        };
        log::log!(
            level,
            "{} examples, {} features, {} nonzeros ({:.2}% dense), classes {:?}",
            self.len(),
            self.n_features,
            self.nnz(),
            density * 100.0,
            self.classes()
        );
    }
}

/// The two class values of a binary problem. The smaller value is the
/// negative class (-1), the larger the positive class (+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryLabels {
    pub negative: i32,
    pub positive: i32,
}

impl BinaryLabels {
    /// Inspect the label set; anything but exactly two classes is an error.
    pub fn from_labels(labels: &[i32]) -> Result<Self> {
        let classes: Vec<i32> = labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        match classes.as_slice() {
            [] => Err(SgdError::InvalidData("no training examples".to_string())),
            [only] => Err(SgdError::InvalidData(format!(
                "only one class present: {}",
                only
            ))),
            &[negative, positive] => Ok(BinaryLabels { negative, positive }),
            _ => Err(SgdError::MulticlassNotSupported {
                n_classes: classes.len(),
            }),
        }
    }

    pub fn classes(&self) -> [i32; 2] {
        [self.negative, self.positive]
    }

    #[inline]
    pub fn encode(&self, label: i32) -> f64 {
        if label == self.positive {
            1.0
        } else {
            -1.0
        }
    }

    /// Class for a decision value; ties go to the negative class.
    #[inline]
    pub fn decode(&self, decision: f64) -> i32 {
        if decision > 0.0 {
            self.positive
        } else {
            self.negative
        }
    }
}
