use super::Preprocessor;
use crate::features::WordFeatures;
use crate::{Result, StrandError};

/// Sorts every word vector ascending.
///
/// Sorted vectors are what let the kernel count shared words in a single
/// merge pass instead of hashing.
#[derive(Debug, Default)]
pub struct SortWordString {
    fitted: bool,
}

impl SortWordString {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preprocessor for SortWordString {
    fn fit(&mut self, features: &WordFeatures) -> Result<()> {
        if features.is_empty() {
            return Err(StrandError::EmptyFeatures);
        }
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, mut features: WordFeatures) -> Result<WordFeatures> {
        if !self.fitted {
            return Err(StrandError::NotFitted);
        }
        for vector in features.vectors_mut() {
            vector.sort_unstable();
        }
        features.set_sorted(true);
        Ok(features)
    }
}
