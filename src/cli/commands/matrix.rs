use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::bio::Alphabet;
use crate::features::{CharFeatures, WordFeatures};
use crate::kernel::{CommKernelOptions, CommWordKernel, KernelMatrix, NormalizerKind};
use crate::preprocessing::{Preprocessor, SortWordString};

#[derive(Args)]
pub struct MatrixArgs {
    /// Input file with one sequence per line ('#' lines are skipped)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Sequence alphabet (dna, rna, protein)
    #[arg(long, default_value = "dna")]
    pub alphabet: String,

    /// Word order (k-mer length)
    #[arg(long, default_value = "7")]
    pub order: usize,

    /// Symbols skipped in the middle of each word window
    #[arg(long, default_value = "0")]
    pub gap: usize,

    /// Pack word windows right-to-left
    #[arg(long)]
    pub reversed: bool,

    /// Count each shared distinct word once instead of multiplying counts
    #[arg(long)]
    pub use_sign: bool,

    /// Kernel normalization (identity, sqrt-diag)
    #[arg(long, default_value = "sqrt-diag")]
    pub normalizer: String,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: MatrixArgs) -> anyhow::Result<()> {
    let alphabet = match args.alphabet.as_str() {
        "dna" => Alphabet::Dna,
        "rna" => Alphabet::Rna,
        "protein" => Alphabet::Protein,
        other => anyhow::bail!("unknown alphabet: {other}"),
    };
    let normalizer = match args.normalizer.as_str() {
        "identity" => NormalizerKind::Identity,
        "sqrt-diag" => NormalizerKind::SqrtDiag,
        other => anyhow::bail!("unknown normalizer: {other}"),
    };
    if args.order == 0 {
        anyhow::bail!("order must be at least 1");
    }

    let raw = fs::read_to_string(&args.input)?;
    let sequences: Vec<Vec<u8>> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.as_bytes().to_vec())
        .collect();

    let chars = CharFeatures::new(alphabet, sequences)?;
    let words = WordFeatures::from_char(&chars, args.order - 1, args.order, args.gap, args.reversed)?;

    let mut sorter = SortWordString::new();
    sorter.fit(&words)?;
    let words = sorter.transform(words)?;

    let kernel = CommWordKernel::init(
        &words,
        &words,
        CommKernelOptions {
            use_sign: args.use_sign,
            normalizer,
        },
    )?;
    let matrix = kernel.matrix();

    let rendered = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&matrix)?,
        _ => render_text(&matrix),
    };

    match args.output {
        Some(path) => fs::write(path, rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn render_text(matrix: &KernelMatrix) -> String {
    let mut out = String::new();
    for i in 0..matrix.rows() {
        let row: Vec<String> = matrix.row(i).iter().map(|v| format!("{v:.6}")).collect();
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}
