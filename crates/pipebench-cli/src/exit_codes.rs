//! Process exit codes. These are part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const RUN_FAILED: i32 = 1; // Benchmark run or config synthesis failed
pub const USAGE_ERROR: i32 = 2; // Argument parsing failed (emitted by clap)
