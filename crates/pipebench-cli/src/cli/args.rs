use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pipebench",
    version,
    about = "Benchmarks a log-processing engine's filter pipeline against a sample input file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the benchmark and print one result per iteration
    Run(RunArgs),
    /// Synthesize and print the pipeline config without running the engine
    Genconfig(GenconfigArgs),
}

/// Flags shared by `run` and `genconfig`.
#[derive(clap::Args, Clone)]
pub struct BenchFlags {
    /// Codec the engine should apply to the input
    #[arg(short = 'c', long, default_value = "json")]
    pub input_codec: String,

    /// Path to the input source file
    #[arg(short = 's', long, default_value = "./input.log")]
    pub source_file_path: PathBuf,

    /// Readable and writable directory for per-run temporary workspaces
    #[arg(short = 't', long, default_value = "/tmp")]
    pub temp_dir_path: PathBuf,

    /// Path to the filter file under test
    #[arg(short = 'f', long, default_value = "./filter.conf")]
    pub filter_file_path: PathBuf,
}

#[derive(clap::Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub bench: BenchFlags,

    /// Number of workers to start the engine with
    #[arg(short = 'w', long = "number-of-workers", default_value_t = 1)]
    pub workers: u32,

    /// Number of times the benchmark should be run
    #[arg(short = 'i', long = "number-of-iterations", default_value_t = 1)]
    pub iterations: u32,

    /// Path to the engine executable
    #[arg(
        short = 'e',
        long,
        default_value = "/usr/share/logstash/bin/logstash"
    )]
    pub engine_path: PathBuf,

    /// Abort a run that has not completed within this many seconds
    #[arg(long, default_value_t = 300)]
    pub timeout_secs: u64,

    /// Interval in milliseconds at which run completion is polled
    #[arg(long, default_value_t = 1000)]
    pub poll_ms: u64,

    /// Show run details on stderr
    #[arg(short = 'd', long)]
    pub details: bool,
}

#[derive(clap::Args, Clone)]
pub struct GenconfigArgs {
    #[command(flatten)]
    pub bench: BenchFlags,
}
