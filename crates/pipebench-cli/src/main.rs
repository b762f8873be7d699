use clap::Parser;

mod cli;
pub mod exit_codes;

use cli::args::{Cli, Command};
use cli::commands::dispatch;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    init_tracing(matches!(&cli.cmd, Command::Run(args) if args.details));

    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_codes::RUN_FAILED
        }
    };
    std::process::exit(code);
}

/// Run details go to stderr so stdout stays reserved for results and the
/// generated config. RUST_LOG wins over the --details toggle when set.
fn init_tracing(details: bool) {
    let default = if details { "info" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
