//! Dense weight vector with lazily applied L2 decay and cumulative L1 truncation.
//!
//! Shrinking every coordinate after every example costs O(d) per step and
//! throws away the benefit of sparse inputs. Instead the L2 decay is folded
//! into one global `scale`, and each coordinate remembers the value `scale`
//! had when it was last written (its stamp). The true weight is
//! `stored * scale / stamp`, and only coordinates touched by a nonzero feature
//! are brought up to date.
//!
//! L1 truncation cannot be expressed as a factor, so the penalty each weight
//! should have received so far is tracked as a running total `u`; when a
//! coordinate is touched it is clipped toward zero by the part of `u` it has
//! not absorbed yet (`q`). Coordinates that are never touched are never clipped.

use crate::math::sparse::SparseVector;

/// Below this the global scale is folded into the stored values.
const MIN_SCALE: f64 = 1e-9;

#[derive(Clone, Debug)]
pub struct ScaledWeights {
    stored: Vec<f64>,
    stamps: Vec<f64>,
    scale: f64,
    /// Total L1 penalty every weight could have received so far.
    l1_total: f64,
    /// L1 penalty actually applied to each weight.
    l1_applied: Vec<f64>,
}

impl ScaledWeights {
    pub fn zeros(dim: usize) -> Self {
        Self::from_vec(vec![0.0; dim])
    }

    pub fn from_vec(weights: Vec<f64>) -> Self {
        let dim = weights.len();
        Self {
            stored: weights,
            stamps: vec![1.0; dim],
            scale: 1.0,
            l1_total: 0.0,
            l1_applied: vec![0.0; dim],
        }
    }

    pub fn len(&self) -> usize {
        self.stored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// True value of coordinate `j`.
    #[inline]
    pub fn get(&self, j: usize) -> f64 {
        self.stored[j] * (self.scale / self.stamps[j])
    }

    #[inline]
    fn materialize(&mut self, j: usize) {
        if self.stamps[j] != self.scale {
            self.stored[j] *= self.scale / self.stamps[j];
            self.stamps[j] = self.scale;
        }
    }

    fn materialize_all(&mut self) {
        for j in 0..self.stored.len() {
            self.materialize(j);
        }
    }

    /// `w . x` without touching any stored value.
    #[inline]
    pub fn dot(&self, x: &SparseVector) -> f64 {
        x.iter().map(|(j, value)| value * self.get(j)).sum()
    }

    /// `w += c * x` over the nonzeros of `x`.
    pub fn add_scaled(&mut self, x: &SparseVector, c: f64) {
        for (j, value) in x.iter() {
            self.materialize(j);
            self.stored[j] += c * value;
        }
    }

    /// Multiply every weight by `factor` in O(1).
    ///
    /// A non-positive factor wipes the vector, since shrinkage can never flip
    /// a sign. The L1 bookkeeping restarts from zero with it.
    pub fn decay(&mut self, factor: f64) {
        if factor <= 0.0 {
            log::warn!(
                "L2 shrink factor {} <= 0, resetting weights to zero; consider a smaller eta0 or alpha",
                factor
            );
            self.stored.iter_mut().for_each(|w| *w = 0.0);
            self.stamps.iter_mut().for_each(|s| *s = 1.0);
            self.scale = 1.0;
            self.l1_total = 0.0;
            self.l1_applied.iter_mut().for_each(|q| *q = 0.0);
            return;
        }
        self.scale *= factor;
        if self.scale < MIN_SCALE {
            log::trace!("Weight scale {:e} below {:e}, rescaling", self.scale, MIN_SCALE);
            self.materialize_all();
            self.stamps.iter_mut().for_each(|s| *s = 1.0);
            self.scale = 1.0;
        }
    }

    /// Grow the L1 budget every weight is entitled to by `amount`.
    pub fn accumulate_l1(&mut self, amount: f64) {
        self.l1_total += amount;
    }

    /// Clip the coordinates touched by `x` toward zero by their outstanding L1
    /// budget, stopping at exactly zero.
    pub fn apply_l1(&mut self, x: &SparseVector) {
        for &j in x.indices() {
            self.materialize(j);
            let before = self.stored[j];
            if before > 0.0 {
                self.stored[j] = (before - (self.l1_total + self.l1_applied[j])).max(0.0);
            } else if before < 0.0 {
                self.stored[j] = (before + (self.l1_total - self.l1_applied[j])).min(0.0);
            }
            self.l1_applied[j] += self.stored[j] - before;
        }
    }

    /// True values of all coordinates, in O(d).
    pub fn to_vec(&self) -> Vec<f64> {
        (0..self.stored.len()).map(|j| self.get(j)).collect()
    }

    /// Apply any pending scale and hand back the plain weights.
    pub fn into_vec(mut self) -> Vec<f64> {
        self.materialize_all();
        self.stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x(dense: &[f64]) -> SparseVector {
        SparseVector::from_dense(dense)
    }

    #[test]
    fn decay_is_applied_on_read_without_touching_storage() {
        let mut w = ScaledWeights::from_vec(vec![2.0, 4.0]);
        w.decay(0.5);
        assert_eq!(w.stored, vec![2.0, 4.0]);
        assert_eq!(w.get(0), 1.0);
        assert_eq!(w.get(1), 2.0);
        assert_eq!(w.dot(&x(&[1.0, 1.0])), 3.0);
    }

    #[test]
    fn touched_coordinates_are_materialized() {
        let mut w = ScaledWeights::from_vec(vec![2.0, 4.0]);
        w.decay(0.5);
        w.add_scaled(&x(&[1.0, 0.0]), 1.0);
        assert_eq!(w.get(0), 2.0);
        assert_eq!(w.get(1), 2.0);
        w.decay(0.5);
        assert_eq!(w.get(0), 1.0);
        assert_eq!(w.get(1), 1.0);
        assert_eq!(w.into_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn underflowing_scale_is_folded_back() {
        let mut w = ScaledWeights::from_vec(vec![1.0]);
        for _ in 0..40 {
            w.decay(0.5);
        }
        assert!(w.scale() >= MIN_SCALE);
        let expected = 0.5f64.powi(40);
        assert!((w.get(0) - expected).abs() < 1e-20);
    }

    #[test]
    fn non_positive_decay_resets() {
        let mut w = ScaledWeights::from_vec(vec![1.0, -3.0]);
        w.decay(-0.1);
        assert_eq!(w.to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn reset_forgets_l1_budget() {
        let mut w = ScaledWeights::from_vec(vec![1.0, 1.0]);
        w.accumulate_l1(0.4);
        w.apply_l1(&x(&[1.0, 0.0]));
        w.decay(0.0);
        assert_eq!(w.l1_total, 0.0);
        assert_eq!(w.l1_applied, vec![0.0, 0.0]);

        w.add_scaled(&x(&[1.0, 1.0]), 1.0);
        w.accumulate_l1(0.1);
        w.apply_l1(&x(&[1.0, 1.0]));
        assert!((w.get(0) - 0.9).abs() < 1e-12);
        assert!((w.get(1) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn l1_clips_to_zero_without_crossing() {
        let mut w = ScaledWeights::from_vec(vec![0.3, -0.3, 1.0]);
        w.accumulate_l1(0.5);
        w.apply_l1(&x(&[1.0, 1.0, 1.0]));
        assert_eq!(w.to_vec(), vec![0.0, 0.0, 0.5]);
    }

    #[test]
    fn l1_catches_up_on_untouched_coordinates() {
        let mut w = ScaledWeights::from_vec(vec![1.0, 1.0]);
        w.accumulate_l1(0.1);
        w.apply_l1(&x(&[1.0, 0.0]));
        w.accumulate_l1(0.1);
        w.apply_l1(&x(&[1.0, 0.0]));
        assert!((w.get(0) - 0.8).abs() < 1e-12);
        assert_eq!(w.get(1), 1.0);

        // coordinate 1 gets the whole outstanding budget on its first touch
        w.apply_l1(&x(&[0.0, 1.0]));
        assert!((w.get(1) - 0.8).abs() < 1e-12);
    }
}
