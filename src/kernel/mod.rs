pub mod comm_word;
pub mod matrix;
pub mod normalizer;

pub use comm_word::{CommKernelOptions, CommWordKernel};
pub use matrix::KernelMatrix;
pub use normalizer::{KernelNormalizer, NormalizerKind};
