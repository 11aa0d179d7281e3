use clap::Args;
use colored::*;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use crate::memcheck::{Memcheck, MemcheckConfig, MemcheckReport};

#[derive(Args)]
pub struct MemcheckArgs {
    /// TOML config file with check parameters
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Build/compute/drop cycles to run
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Word order (k-mer length)
    #[arg(long)]
    pub order: Option<usize>,

    /// Symbols skipped in the middle of each word window
    #[arg(long)]
    pub gap: Option<usize>,

    /// Pack word windows right-to-left
    #[arg(long)]
    pub reversed: bool,

    /// Motif repeats per corpus sequence
    #[arg(long)]
    pub repeat: Option<usize>,

    /// Tolerated RSS growth in mebibytes
    #[arg(long, value_name = "MIB")]
    pub tolerance_mb: Option<u64>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

pub fn run(args: MemcheckArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => MemcheckConfig::from_file(path)?,
        None => MemcheckConfig::default(),
    };
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(order) = args.order {
        config.order = order;
    }
    if let Some(gap) = args.gap {
        config.gap = gap;
    }
    if args.reversed {
        config.reversed = true;
    }
    if let Some(repeat) = args.repeat {
        config.repeat = repeat;
    }
    if let Some(mb) = args.tolerance_mb {
        config.tolerance_bytes = mb * 1024 * 1024;
    }

    let progress = ProgressBar::new(config.iterations as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} iterations ({msg})")
            .unwrap()
            .progress_chars("=>-"),
    );

    let bar = progress.clone();
    let outcome = Memcheck::new(config)
        .with_progress_callback(move |_, rss| {
            bar.set_message(format_size(rss, BINARY));
            bar.inc(1);
        })
        .run()?;
    progress.finish_and_clear();

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome.report)?),
        _ => print_text_report(&outcome.report, outcome.matrix.rows()),
    }

    if !outcome.report.passed {
        anyhow::bail!(
            "resident set grew by {} (tolerance {})",
            format_growth(outcome.report.growth_bytes),
            format_size(outcome.report.config.tolerance_bytes, BINARY)
        );
    }
    Ok(())
}

fn print_text_report(report: &MemcheckReport, matrix_dim: usize) {
    println!("{}", "Memory Regression Check".bold());
    println!("  started:  {}", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "  system:   {} total / {} available",
        format_size(report.system_total_bytes, BINARY),
        format_size(report.system_available_bytes, BINARY)
    );
    println!(
        "  corpus:   {0} sequences, order {1}, matrix {0} x {0}",
        matrix_dim, report.config.order
    );
    println!();

    for sample in &report.samples {
        println!(
            "  iteration {:>3}: {}",
            sample.iteration,
            format_size(sample.rss_bytes, BINARY)
        );
    }
    println!();

    let growth = format_growth(report.growth_bytes);
    let tolerance = format_size(report.config.tolerance_bytes, BINARY);
    if report.passed {
        println!(
            "  {} growth {} within tolerance {}",
            "PASS".green().bold(),
            growth,
            tolerance
        );
    } else {
        println!(
            "  {} growth {} exceeds tolerance {}",
            "FAIL".red().bold(),
            growth,
            tolerance
        );
    }
}

fn format_growth(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_size(bytes.unsigned_abs(), BINARY))
    } else {
        format_size(bytes as u64, BINARY)
    }
}
