// src/cli/mod.rs — CLI definition (clap derive)

pub mod chain;
pub mod progress;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "collapser",
    about = "Generate a chain of images by iteratively editing the previous output",
    version
)]
pub struct Cli {
    /// Path to the base image
    #[arg(short, long)]
    pub image: String,

    /// Edit instruction applied at every step
    #[arg(short, long)]
    pub prompt: String,

    /// Number of iterations
    #[arg(short, long)]
    pub n: usize,

    /// Automatic retries per failed iteration. If omitted, prompts on failure
    #[arg(short, long)]
    pub retries: Option<u32>,

    /// Color-correct each generated image and use it as the next input
    #[arg(long)]
    pub correct: bool,

    /// Directory in which the run workspace is created
    #[arg(short, long)]
    pub output: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    /// Suppress progress output (only print the artifact list)
    #[arg(long)]
    pub quiet: bool,

    /// Log at info level (RUST_LOG still wins)
    #[arg(short, long)]
    pub verbose: bool,
}
