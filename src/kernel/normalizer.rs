use serde::{Deserialize, Serialize};

/// Which normalization to apply to raw kernel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizerKind {
    /// Raw kernel values.
    Identity,
    /// Divide by `sqrt(k(x, x) * k(y, y))`, putting 1.0 on the diagonal.
    SqrtDiag,
}

impl NormalizerKind {
    pub(crate) fn build(
        self,
        lhs_diag: &[f64],
        rhs_diag: &[f64],
    ) -> Box<dyn KernelNormalizer + Send + Sync> {
        match self {
            NormalizerKind::Identity => Box::new(IdentityNormalizer),
            NormalizerKind::SqrtDiag => {
                Box::new(SqrtDiagNormalizer::from_diagonals(lhs_diag, rhs_diag))
            }
        }
    }
}

/// Seam between raw kernel values and the values callers see.
pub trait KernelNormalizer {
    fn normalize(&self, value: f64, lhs_idx: usize, rhs_idx: usize) -> f64;
}

/// Leaves kernel values untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl KernelNormalizer for IdentityNormalizer {
    fn normalize(&self, value: f64, _lhs_idx: usize, _rhs_idx: usize) -> f64 {
        value
    }
}

/// Scales each value by the self-similarities of its two vectors.
#[derive(Debug, Clone)]
pub struct SqrtDiagNormalizer {
    sqrt_diag_lhs: Vec<f64>,
    sqrt_diag_rhs: Vec<f64>,
}

impl SqrtDiagNormalizer {
    fn from_diagonals(lhs_diag: &[f64], rhs_diag: &[f64]) -> Self {
        // zero self-similarity means an empty word vector
        let guard = |d: &f64| if *d > 0.0 { d.sqrt() } else { 1.0 };
        Self {
            sqrt_diag_lhs: lhs_diag.iter().map(guard).collect(),
            sqrt_diag_rhs: rhs_diag.iter().map(guard).collect(),
        }
    }
}

impl KernelNormalizer for SqrtDiagNormalizer {
    fn normalize(&self, value: f64, lhs_idx: usize, rhs_idx: usize) -> f64 {
        value / (self.sqrt_diag_lhs[lhs_idx] * self.sqrt_diag_rhs[rhs_idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_passes_values_through() {
        assert_eq!(IdentityNormalizer.normalize(7.5, 0, 3), 7.5);
    }

    #[test]
    fn sqrt_diag_scales_by_self_similarity() {
        let normalizer = SqrtDiagNormalizer::from_diagonals(&[4.0, 9.0], &[4.0, 9.0]);
        assert_eq!(normalizer.normalize(4.0, 0, 0), 1.0);
        assert_eq!(normalizer.normalize(6.0, 0, 1), 1.0);
        assert_eq!(normalizer.normalize(3.0, 1, 0), 0.5);
    }

    #[test]
    fn sqrt_diag_keeps_empty_vectors_finite() {
        let normalizer = SqrtDiagNormalizer::from_diagonals(&[0.0], &[4.0]);
        assert_eq!(normalizer.normalize(0.0, 0, 0), 0.0);
    }
}
