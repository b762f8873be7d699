//! Run configuration and pipeline-config synthesis.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::filter;

/// Immutable description of one benchmark run, constructed once by the
/// caller and passed by value. The core never mutates it.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Codec the engine applies to the input file (e.g. "json").
    pub input_codec: String,
    /// Sample file the engine tails.
    pub source_file: PathBuf,
    /// Root under which per-run workspaces are created.
    pub temp_dir: PathBuf,
    /// Engine worker (pipeline thread) count.
    pub workers: u32,
    /// How many times the benchmark is run sequentially.
    pub iterations: u32,
    /// Path to the engine binary.
    pub engine_path: PathBuf,
    /// Filter file under test.
    pub filter_file: PathBuf,
    /// Upper bound on one run's supervision phase.
    pub timeout: Duration,
    /// Interval at which the sincedb file is polled for completion.
    pub poll_interval: Duration,
}

/// Build the input stanza: a tailed file source read from the beginning,
/// tracking consumption in `sincedb_path`.
pub fn build_input(codec: &str, source: &Path, sincedb: &Path) -> String {
    format!(
        r#"input {{file {{codec => "{}" mode => "tail" path => "{}" sincedb_path => "{}" start_position => "beginning"}} }}"#,
        codec,
        source.display(),
        sincedb.display()
    )
}

/// Build the output stanza: newline-delimited records appended to `output`.
pub fn build_output(output: &Path) -> String {
    format!(r#"output {{file {{path => "{}"}} }}"#, output.display())
}

/// Synthesize the full pipeline configuration: input stanza, instrumented
/// filter stanza, output stanza, in that order. The only fallible step is
/// reading the filter file; nothing partial is produced on error.
pub fn build_config(
    codec: &str,
    source: &Path,
    output: &Path,
    filter_file: &Path,
    sincedb: &Path,
) -> Result<String> {
    let input = build_input(codec, source, sincedb);
    let output = build_output(output);
    let filter = filter::instrument_file(filter_file)?;

    Ok(format!("{} {} {}", input, filter, output))
}
