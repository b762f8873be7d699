//! Core benchmark runner for logstash-style filter pipelines.
//!
//! One run synthesizes an instrumented pipeline configuration, launches the
//! external engine against a tailed sample file, waits for the engine's
//! sincedb file to signal full consumption, and derives latency and
//! size-change metrics from the first output record.

pub mod config;
pub mod error;
pub mod filter;
pub mod monitor;
pub mod result;
pub mod run;
pub mod workspace;

pub use config::RunConfig;
pub use error::{BenchError, Result};
pub use result::RunResult;
pub use run::execute;
