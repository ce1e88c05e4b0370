//! Cosine similarity between dense vectors.

use cinematch_core::{RecommendError, RecommendResult};
use ndarray::ArrayView1;

/// L2 norm of a vector.
pub fn norm(v: ArrayView1<'_, f64>) -> f64 {
    v.dot(&v).sqrt()
}

/// `dot(a, b) / (|a| * |b|)`.
///
/// Fails with [`RecommendError::DegenerateVector`] when either vector has zero
/// norm, and with [`RecommendError::DimensionMismatch`] when lengths differ.
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> RecommendResult<f64> {
    if a.len() != b.len() {
        return Err(RecommendError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let denominator = norm(a) * norm(b);
    if denominator == 0.0 {
        return Err(RecommendError::DegenerateVector);
    }

    let similarity = a.dot(&b) / denominator;
    if !similarity.is_finite() {
        return Err(RecommendError::DegenerateVector);
    }
    Ok(similarity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::aview1;

    #[test]
    fn test_identical() {
        let a = [1.0, 2.0, 3.0];
        let sim = cosine_similarity(aview1(&a), aview1(&a)).unwrap();
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_orthogonal() {
        let sim = cosine_similarity(aview1(&[1.0, 0.0]), aview1(&[0.0, 1.0])).unwrap();
        assert!(sim.abs() < 1e-12);
    }

    #[test]
    fn test_opposite() {
        let sim = cosine_similarity(aview1(&[0.0, -4.0]), aview1(&[0.0, 1.0])).unwrap();
        assert!((sim + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_overlap() {
        // [1,0] . [1,1] = 1, |a| = 1, |b| = sqrt(2)
        let sim = cosine_similarity(aview1(&[1.0, 0.0]), aview1(&[1.0, 1.0])).unwrap();
        assert!((sim - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric() {
        let a = [3.0, -1.0, 7.5];
        let b = [0.5, 2.0, 1.0];
        let ab = cosine_similarity(aview1(&a), aview1(&b)).unwrap();
        let ba = cosine_similarity(aview1(&b), aview1(&a)).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_zero_vector_is_degenerate() {
        let err = cosine_similarity(aview1(&[0.0, 0.0]), aview1(&[1.0, 1.0])).unwrap_err();
        assert!(matches!(err, RecommendError::DegenerateVector));
        let err = cosine_similarity(aview1(&[1.0, 1.0]), aview1(&[0.0, 0.0])).unwrap_err();
        assert!(matches!(err, RecommendError::DegenerateVector));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = cosine_similarity(aview1(&[1.0, 0.0]), aview1(&[1.0, 0.0, 2.0])).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::DimensionMismatch { left: 2, right: 3 }
        ));
    }

    #[test]
    fn test_norm() {
        assert_eq!(norm(aview1(&[3.0, 4.0])), 5.0);
        assert_eq!(norm(aview1(&[0.0, 0.0])), 0.0);
    }
}
