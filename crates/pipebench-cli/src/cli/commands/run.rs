use std::time::Duration;

use anyhow::Context;
use pipebench_core::RunConfig;

use crate::cli::args::RunArgs;
use crate::exit_codes;

pub async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let cfg = RunConfig {
        input_codec: args.bench.input_codec,
        source_file: args.bench.source_file_path,
        temp_dir: args.bench.temp_dir_path,
        workers: args.workers,
        iterations: args.iterations,
        engine_path: args.engine_path,
        filter_file: args.bench.filter_file_path,
        timeout: Duration::from_secs(args.timeout_secs),
        poll_interval: Duration::from_millis(args.poll_ms),
    };

    // Sequential runs, one printed result each. No aggregation.
    for iteration in 1..=cfg.iterations {
        tracing::info!(iteration, total = cfg.iterations, "starting run");
        let result = pipebench_core::execute(&cfg)
            .await
            .with_context(|| format!("run {iteration} of {}", cfg.iterations))?;
        println!("{}", result.render());
    }

    Ok(exit_codes::SUCCESS)
}
