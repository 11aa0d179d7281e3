/// Memory regression check for repeated feature/kernel construction
///
/// Builds the same char features, word features, sort preprocessor, and
/// common-word kernel over and over, dropping everything between iterations,
/// and watches the process resident set. A healthy stack settles after the
/// first pass; steady growth across iterations is the regression this module
/// exists to catch.

pub mod probe;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bio::Alphabet;
use crate::features::{CharFeatures, WordFeatures};
use crate::kernel::{CommKernelOptions, CommWordKernel, KernelMatrix, NormalizerKind};
use crate::preprocessing::{Preprocessor, SortWordString};
use crate::{Result, StrandError};

/// Parameters for the regression check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemcheckConfig {
    /// How many times the 4-base motif repeats in every corpus sequence.
    pub repeat: usize,
    /// Word order (k-mer length).
    pub order: usize,
    /// Symbols skipped in the middle of each word window.
    pub gap: usize,
    /// Pack word windows right-to-left.
    pub reversed: bool,
    /// Build/compute/drop cycles to run.
    pub iterations: usize,
    /// Tolerated RSS growth after the warmup iteration, in bytes.
    pub tolerance_bytes: u64,
}

impl Default for MemcheckConfig {
    fn default() -> Self {
        Self {
            repeat: 10,
            order: 7,
            gap: 0,
            reversed: false,
            iterations: 10,
            tolerance_bytes: 32 * 1024 * 1024,
        }
    }
}

impl MemcheckConfig {
    /// Load a config from a TOML file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw).map_err(|e| StrandError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.repeat == 0 {
            return Err(StrandError::Config("repeat must be at least 1".into()));
        }
        if self.order == 0 {
            return Err(StrandError::Config("order must be at least 1".into()));
        }
        if self.iterations == 0 {
            return Err(StrandError::Config("iterations must be at least 1".into()));
        }
        Ok(())
    }
}

/// The corpus every iteration is built from: two identical 141-sequence
/// blocks (60 ACGT-motif repeats, 21 TTGT-motif repeats, 60 more ACGT),
/// 282 sequences in total.
pub fn leak_check_corpus(repeat: usize) -> Vec<Vec<u8>> {
    let half: Vec<Vec<u8>> = [("ACGT", 60), ("TTGT", 21), ("ACGT", 60)]
        .iter()
        .flat_map(|&(motif, count)| {
            let sequence = motif.repeat(repeat).into_bytes();
            std::iter::repeat(sequence).take(count)
        })
        .collect();

    let mut corpus = half.clone();
    corpus.extend(half);
    corpus
}

/// RSS reading taken after one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemorySample {
    pub iteration: usize,
    pub rss_bytes: u64,
}

/// Outcome of a full check.
#[derive(Debug, Clone, Serialize)]
pub struct MemcheckReport {
    pub config: MemcheckConfig,
    pub started_at: DateTime<Utc>,
    pub system_total_bytes: u64,
    pub system_available_bytes: u64,
    pub samples: Vec<MemorySample>,
    /// RSS after the first (warmup) iteration.
    pub baseline_rss: u64,
    pub final_rss: u64,
    pub growth_bytes: i64,
    pub passed: bool,
}

/// Runs the check; see the module docs.
pub struct Memcheck {
    config: MemcheckConfig,
    progress_callback: Option<Box<dyn Fn(usize, u64) + Send + Sync>>,
}

/// Report plus the kernel matrix from the final iteration.
pub struct MemcheckOutcome {
    pub report: MemcheckReport,
    pub matrix: KernelMatrix,
}

impl Memcheck {
    pub fn new(config: MemcheckConfig) -> Self {
        Self {
            config,
            progress_callback: None,
        }
    }

    /// Called after every iteration with `(iteration, rss_bytes)`.
    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, u64) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    pub fn run(&self) -> Result<MemcheckOutcome> {
        self.config.validate()?;

        let started_at = Utc::now();
        let system = probe::system_memory();
        let corpus = leak_check_corpus(self.config.repeat);
        info!(
            sequences = corpus.len(),
            iterations = self.config.iterations,
            order = self.config.order,
            "starting memory regression check"
        );

        let mut samples = Vec::with_capacity(self.config.iterations);
        let mut last_matrix = None;

        for iteration in 1..=self.config.iterations {
            let matrix = self.build_once(&corpus)?;
            let rss = probe::process_rss()?;
            debug!(iteration, rss_bytes = rss, "iteration complete");

            if let Some(callback) = &self.progress_callback {
                callback(iteration, rss);
            }
            samples.push(MemorySample {
                iteration,
                rss_bytes: rss,
            });
            last_matrix = Some(matrix);
        }

        let matrix = last_matrix.ok_or_else(|| {
            StrandError::Config("iterations must be at least 1".into())
        })?;

        let baseline_rss = samples[0].rss_bytes;
        let final_rss = samples[samples.len() - 1].rss_bytes;
        let growth_bytes = final_rss as i64 - baseline_rss as i64;
        let passed = growth_bytes <= self.config.tolerance_bytes as i64;
        info!(
            baseline_rss,
            final_rss, growth_bytes, passed, "memory regression check finished"
        );

        Ok(MemcheckOutcome {
            report: MemcheckReport {
                config: self.config.clone(),
                started_at,
                system_total_bytes: system.total,
                system_available_bytes: system.available,
                samples,
                baseline_rss,
                final_rss,
                growth_bytes,
                passed,
            },
            matrix,
        })
    }

    /// One full construction cycle; everything but the matrix drops on return.
    fn build_once(&self, corpus: &[Vec<u8>]) -> Result<KernelMatrix> {
        let config = &self.config;

        let chars = CharFeatures::new(Alphabet::Dna, corpus.to_vec())?;
        let words = WordFeatures::from_char(
            &chars,
            config.order - 1,
            config.order,
            config.gap,
            config.reversed,
        )?;

        let mut sorter = SortWordString::new();
        sorter.fit(&words)?;
        let words = sorter.transform(words)?;

        let kernel = CommWordKernel::init(
            &words,
            &words,
            CommKernelOptions {
                use_sign: false,
                normalizer: NormalizerKind::Identity,
            },
        )?;
        Ok(kernel.matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn corpus_has_the_fixed_block_layout() {
        let corpus = leak_check_corpus(10);
        assert_eq!(corpus.len(), 282);

        let acgt = "ACGT".repeat(10).into_bytes();
        let ttgt = "TTGT".repeat(10).into_bytes();
        assert_eq!(corpus[0], acgt);
        assert_eq!(corpus[59], acgt);
        assert_eq!(corpus[60], ttgt);
        assert_eq!(corpus[80], ttgt);
        assert_eq!(corpus[81], acgt);
        assert_eq!(corpus[140], acgt);

        // the second block mirrors the first
        assert_eq!(&corpus[141..], &corpus[..141]);
    }

    #[test]
    fn corpus_scales_with_repeat() {
        let corpus = leak_check_corpus(3);
        assert!(corpus.iter().all(|s| s.len() == 12));
    }

    #[test]
    fn config_rejects_zero_fields() {
        for config in [
            MemcheckConfig {
                repeat: 0,
                ..Default::default()
            },
            MemcheckConfig {
                order: 0,
                ..Default::default()
            },
            MemcheckConfig {
                iterations: 0,
                ..Default::default()
            },
        ] {
            assert!(matches!(config.validate(), Err(StrandError::Config(_))));
        }
    }

    #[test]
    fn default_config_matches_the_regression_parameters() {
        let config = MemcheckConfig::default();
        assert_eq!(config.repeat, 10);
        assert_eq!(config.order, 7);
        assert_eq!(config.gap, 0);
        assert!(!config.reversed);
        assert_eq!(config.iterations, 10);
    }
}
