pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "strand",
    version,
    about = "Word-kernel computation over biological string features",
    long_about = "Strand derives word-encoded features from DNA, RNA, or protein sequences \
                  and computes common-word string-kernel matrices. It also ships a memory \
                  regression check that repeatedly builds and drops the whole feature/kernel \
                  stack while watching the process resident set."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Repeatedly build features and kernels and check for memory growth
    Memcheck(commands::memcheck::MemcheckArgs),

    /// Compute a word-kernel matrix for sequences from a file
    Matrix(commands::matrix::MatrixArgs),
}
