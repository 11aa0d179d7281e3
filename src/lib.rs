pub mod bio;
pub mod cli;
pub mod features;
pub mod kernel;
pub mod memcheck;
pub mod preprocessing;

pub use crate::features::{CharFeatures, WordFeatures};
pub use crate::kernel::{CommKernelOptions, CommWordKernel, KernelMatrix};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid symbol {symbol:?} at position {position} in sequence {index}")]
    InvalidSymbol {
        index: usize,
        position: usize,
        symbol: char,
    },

    #[error("empty feature collection")]
    EmptyFeatures,

    #[error("words of order {order} need {required} bits but word storage is 16-bit")]
    WordOverflow { order: usize, required: u32 },

    #[error("word features must be sorted before kernel initialization")]
    UnsortedFeatures,

    #[error("preprocessor applied before fit")]
    NotFitted,

    #[error("incompatible feature sets: {0}")]
    IncompatibleFeatures(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("memory probe failed: {0}")]
    MemoryProbe(String),
}

pub type Result<T> = std::result::Result<T, StrandError>;
