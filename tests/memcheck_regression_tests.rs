/// The object-churn memory regression check, end to end
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use strand::memcheck::{leak_check_corpus, Memcheck, MemcheckConfig};

#[test]
fn repeated_construction_does_not_grow_memory() {
    let outcome = Memcheck::new(MemcheckConfig::default())
        .run()
        .expect("check runs");
    let report = &outcome.report;

    assert_eq!(report.samples.len(), 10);
    assert_eq!(report.samples[0].iteration, 1);
    assert_eq!(report.samples[9].iteration, 10);
    assert!(report.baseline_rss > 0);
    assert!(
        report.passed,
        "resident set grew by {} bytes over {} iterations",
        report.growth_bytes, report.config.iterations
    );
}

#[test]
fn final_matrix_has_the_expected_block_structure() {
    let config = MemcheckConfig {
        iterations: 1,
        ..Default::default()
    };
    let outcome = Memcheck::new(config).run().expect("check runs");
    let matrix = &outcome.matrix;

    assert_eq!(matrix.rows(), 282);
    assert_eq!(matrix.cols(), 282);

    // every sequence has 34 7-mers over 4 distinct words, in counts 9/9/8/8:
    // self-similarity 81 + 81 + 64 + 64 = 290
    assert_eq!(matrix.get(0, 0), 290.0);
    assert_eq!(matrix.get(60, 60), 290.0);

    // same-motif pairs match fully, cross-motif pairs share no words
    assert_eq!(matrix.get(0, 59), 290.0);
    assert_eq!(matrix.get(0, 60), 0.0);
    assert_eq!(matrix.get(60, 80), 290.0);
    assert_eq!(matrix.get(0, 141), 290.0);
    assert_eq!(matrix.get(60, 201), 290.0);

    assert!(matrix.is_symmetric(0.0));
}

#[test]
fn progress_callback_fires_once_per_iteration() {
    let config = MemcheckConfig {
        iterations: 3,
        repeat: 2,
        order: 3,
        ..Default::default()
    };
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    Memcheck::new(config)
        .with_progress_callback(move |_, rss| {
            assert!(rss > 0);
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .run()
        .expect("check runs");

    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn corpus_feeds_every_iteration_identically() {
    let corpus = leak_check_corpus(2);
    assert_eq!(corpus.len(), 282);
    assert!(corpus.iter().all(|s| s.len() == 8));
}

#[test]
fn config_loads_from_toml_with_defaults_for_missing_keys() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "order = 5").expect("write");
    writeln!(file, "iterations = 2").expect("write");

    let config = MemcheckConfig::from_file(file.path()).expect("config parses");
    assert_eq!(config.order, 5);
    assert_eq!(config.iterations, 2);
    assert_eq!(config.repeat, 10);
    assert_eq!(config.gap, 0);
}

#[test]
fn config_file_with_zero_iterations_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "iterations = 0").expect("write");
    assert!(MemcheckConfig::from_file(file.path()).is_err());
}
