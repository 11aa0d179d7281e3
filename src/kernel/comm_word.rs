/// Common-word string kernel over sorted word features

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::matrix::KernelMatrix;
use super::normalizer::{KernelNormalizer, NormalizerKind};
use crate::features::WordFeatures;
use crate::{Result, StrandError};

/// Options for [`CommWordKernel::init`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommKernelOptions {
    /// Count each shared distinct word once instead of multiplying counts.
    pub use_sign: bool,
    pub normalizer: NormalizerKind,
}

impl Default for CommKernelOptions {
    fn default() -> Self {
        Self {
            use_sign: false,
            normalizer: NormalizerKind::SqrtDiag,
        }
    }
}

/// The common-word (spectrum) string kernel:
///
/// ```text
/// k(x, y) = sum over distinct words w of count_x(w) * count_y(w)
/// ```
///
/// computed with a single merge pass over two sorted word vectors. With
/// `use_sign` the counts collapse to 0/1 and the sum counts shared distinct
/// words instead.
pub struct CommWordKernel<'a> {
    lhs: &'a WordFeatures,
    rhs: &'a WordFeatures,
    use_sign: bool,
    normalizer: Box<dyn KernelNormalizer + Send + Sync>,
}

impl<'a> std::fmt::Debug for CommWordKernel<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommWordKernel")
            .field("lhs", &self.lhs)
            .field("rhs", &self.rhs)
            .field("use_sign", &self.use_sign)
            .field("normalizer", &"<dyn KernelNormalizer>")
            .finish()
    }
}

impl<'a> CommWordKernel<'a> {
    /// Validate both feature sets and precompute normalizer state.
    pub fn init(
        lhs: &'a WordFeatures,
        rhs: &'a WordFeatures,
        options: CommKernelOptions,
    ) -> Result<Self> {
        if !lhs.is_sorted() || !rhs.is_sorted() {
            return Err(StrandError::UnsortedFeatures);
        }
        if lhs.order() != rhs.order() || lhs.num_words() != rhs.num_words() {
            return Err(StrandError::IncompatibleFeatures(format!(
                "order {} vs {}, {} vs {} distinct words",
                lhs.order(),
                rhs.order(),
                lhs.num_words(),
                rhs.num_words()
            )));
        }

        let lhs_diag: Vec<f64> = lhs
            .vectors()
            .iter()
            .map(|v| merge_count(v, v, options.use_sign))
            .collect();
        let rhs_diag: Vec<f64> = if std::ptr::eq(lhs, rhs) {
            lhs_diag.clone()
        } else {
            rhs.vectors()
                .iter()
                .map(|v| merge_count(v, v, options.use_sign))
                .collect()
        };
        let normalizer = options.normalizer.build(&lhs_diag, &rhs_diag);

        Ok(Self {
            lhs,
            rhs,
            use_sign: options.use_sign,
            normalizer,
        })
    }

    /// Normalized kernel value between lhs vector `i` and rhs vector `j`.
    pub fn kernel(&self, i: usize, j: usize) -> f64 {
        let raw = merge_count(&self.lhs.vectors()[i], &self.rhs.vectors()[j], self.use_sign);
        self.normalizer.normalize(raw, i, j)
    }

    /// The full `lhs.len() x rhs.len()` kernel matrix.
    ///
    /// Rows are filled in parallel; when both sides are the same feature set
    /// only the upper triangle is computed and the rest is mirrored.
    pub fn matrix(&self) -> KernelMatrix {
        let rows = self.lhs.len();
        let cols = self.rhs.len();
        let symmetric = std::ptr::eq(self.lhs, self.rhs);

        let mut values = vec![0.0f64; rows * cols];
        values
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(i, row)| {
                let first = if symmetric { i } else { 0 };
                for (j, cell) in row.iter_mut().enumerate().skip(first) {
                    *cell = self.kernel(i, j);
                }
            });

        if symmetric {
            for i in 0..rows {
                for j in 0..i {
                    values[i * cols + j] = values[j * cols + i];
                }
            }
        }

        KernelMatrix::from_values(rows, cols, values)
    }
}

/// Merge two ascending word vectors, accumulating matched counts.
fn merge_count(a: &[u16], b: &[u16], use_sign: bool) -> f64 {
    let mut left = 0;
    let mut right = 0;
    let mut result = 0.0;

    while left < a.len() && right < b.len() {
        if a[left] == b[right] {
            let word = a[left];
            let left_from = left;
            let right_from = right;
            while left < a.len() && a[left] == word {
                left += 1;
            }
            while right < b.len() && b[right] == word {
                right += 1;
            }
            if use_sign {
                result += 1.0;
            } else {
                result += (left - left_from) as f64 * (right - right_from) as f64;
            }
        } else if a[left] < b[right] {
            left += 1;
        } else {
            right += 1;
        }
    }
    result
}
