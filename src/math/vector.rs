//! Dense `f64` slice helpers used when reporting on weight vectors.

pub fn dot(lhs: &[f64], rhs: &[f64]) -> f64 {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "Dot product requires equal length vectors"
    );
    lhs.iter().zip(rhs.iter()).map(|(a, b)| a * b).sum()
}

pub fn l2_norm(values: &[f64]) -> f64 {
    dot(values, values).sqrt()
}

pub fn count_nonzero(values: &[f64]) -> usize {
    values.iter().filter(|&&v| v != 0.0).count()
}

pub fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
