use anyhow::Context;
use pipebench_core::config::build_config;

use crate::cli::args::GenconfigArgs;
use crate::exit_codes;

/// Print the config a run would use, with output and sincedb paths placed
/// under the temp directory. Nothing is executed.
pub fn run(args: GenconfigArgs) -> anyhow::Result<i32> {
    let output = args.bench.temp_dir_path.join("output.log");
    let sincedb = args.bench.temp_dir_path.join("sincedb.log");

    let doc = build_config(
        &args.bench.input_codec,
        &args.bench.source_file_path,
        &output,
        &args.bench.filter_file_path,
        &sincedb,
    )
    .context("failed to build config")?;

    println!("{doc}");
    Ok(exit_codes::SUCCESS)
}
