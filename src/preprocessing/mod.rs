pub mod sort_word;

pub use sort_word::SortWordString;

use crate::features::WordFeatures;
use crate::Result;

/// Fit/transform protocol for feature preprocessors.
pub trait Preprocessor {
    /// Inspect the features a transform will be applied to.
    fn fit(&mut self, features: &WordFeatures) -> Result<()>;

    /// Consume features and return the transformed collection.
    fn transform(&self, features: WordFeatures) -> Result<WordFeatures>;
}
