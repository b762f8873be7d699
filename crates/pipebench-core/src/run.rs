//! Run orchestration.
//!
//! One call to [`execute`] owns a complete run life cycle: workspace
//! allocation, config synthesis and persistence, engine supervision, and
//! result assembly. Two concurrent activities exist per run — the
//! supervision flow awaiting the engine subprocess, and the completion
//! monitor polling the sincedb file. They coordinate only through the
//! monitor's single-shot signal; on any exit the monitor is cancelled and
//! the workspace directory removed.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::process::{Child, Command};

use crate::config::{self, RunConfig};
use crate::error::{BenchError, Result};
use crate::monitor::CompletionMonitor;
use crate::result::{Metrics, RunResult};
use crate::workspace::RunWorkspace;

/// The one field the first output record must expose.
#[derive(Debug, Deserialize)]
struct OutputRecord {
    processed_at: DateTime<Utc>,
}

/// Execute one benchmark run and return its result. The run is abandoned on
/// the first failure; nothing is retried and no partial result is returned.
/// The workspace is removed on every exit path.
pub async fn execute(cfg: &RunConfig) -> Result<RunResult> {
    let ws = RunWorkspace::create(&cfg.temp_dir)?;

    // The engine rejects relative paths, so every path it sees is absolute.
    let source = absolutize(&cfg.source_file)?;
    let output = absolutize(&ws.output_path())?;
    let sincedb = absolutize(&ws.sincedb_path())?;

    let doc = config::build_config(&cfg.input_codec, &source, &output, &cfg.filter_file, &sincedb)?;
    let config_path = ws.config_path();
    std::fs::write(&config_path, &doc)
        .map_err(|e| BenchError::io("writing pipeline config", &config_path, e))?;
    tracing::info!(path = %config_path.display(), "pipeline config written");

    if cfg.workers > 1 {
        // Results read only the first output line; with several workers the
        // first line is not guaranteed to carry the earliest processed_at.
        tracing::warn!(
            workers = cfg.workers,
            "first-record timestamp may not be the earliest with multiple workers"
        );
    }

    let mut child = Command::new(&cfg.engine_path)
        .arg("-f")
        .arg(&config_path)
        .arg("-w")
        .arg(cfg.workers.to_string())
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| BenchError::Process {
            path: cfg.engine_path.clone(),
            source: e,
        })?;
    tracing::info!(engine = %cfg.engine_path.display(), workers = cfg.workers, "engine started");

    let mut monitor = CompletionMonitor::spawn(sincedb, cfg.poll_interval);

    let supervised = tokio::time::timeout(
        cfg.timeout,
        supervise(&mut child, &mut monitor, &cfg.engine_path),
    )
    .await;
    let completed_at = Utc::now();
    monitor.shutdown().await;

    match supervised {
        Ok(res) => res?,
        Err(_) => {
            stop_engine(&mut child).await;
            return Err(BenchError::Timeout(cfg.timeout));
        }
    }
    tracing::info!("engine has stopped processing");

    let output_size = stat_len("stat output file", &output)?;
    let first_processed_at = read_first_processed_at(&output)?;
    let input_size = stat_len("stat source file", &source)?;

    let metrics = Metrics::compute(first_processed_at, completed_at, input_size, output_size)?;

    Ok(RunResult {
        filter_file: cfg.filter_file.clone(),
        first_processed_at,
        completed_at,
        duration: metrics.duration,
        input_size,
        output_size,
        percent_change: metrics.percent_change,
    })
}

/// Block until the engine exits, either on its own or because the monitor
/// signalled full consumption and we stopped it.
async fn supervise(child: &mut Child, monitor: &mut CompletionMonitor, engine: &Path) -> Result<()> {
    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|e| BenchError::Process {
                path: engine.to_path_buf(),
                source: e,
            })?;
            tracing::info!(%status, "engine exited on its own");
        }
        fired = monitor.completed() => {
            fired?;
            tracing::info!("stopping engine");
            stop_engine(child).await;
        }
    }
    Ok(())
}

async fn stop_engine(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        tracing::warn!(error = %e, "failed to kill engine");
    }
    if let Err(e) = child.wait().await {
        tracing::warn!(error = %e, "failed to reap engine");
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| BenchError::io("resolving absolute path for", path, e))
}

fn stat_len(op: &'static str, path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)
        .map_err(|e| BenchError::io(op, path, e))?
        .len())
}

/// Read only the first newline-delimited record of the output file, strip a
/// trailing carriage return, and parse its `processed_at` timestamp.
fn read_first_processed_at(output: &Path) -> Result<DateTime<Utc>> {
    let file =
        std::fs::File::open(output).map_err(|e| BenchError::io("opening output file", output, e))?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|e| BenchError::io("reading output file", output, e))?;

    let record = line.trim_end_matches('\n').trim_end_matches('\r');
    if record.is_empty() {
        return Err(BenchError::EmptyOutput);
    }

    let record: OutputRecord = serde_json::from_str(record)?;
    Ok(record.processed_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn first_line_parse_accepts_crlf() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("output.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            "{{\"processed_at\":\"2024-01-02T03:04:05.000Z\",\"message\":\"a\"}}\r\n{{\"bad\":1}}\n"
        )
        .unwrap();

        let ts = read_first_processed_at(&path).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn missing_processed_at_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("output.json");
        std::fs::write(&path, "{\"message\":\"no timestamp\"}\n").unwrap();

        let err = read_first_processed_at(&path).unwrap_err();
        assert!(matches!(err, BenchError::Parse(_)));
    }

    #[test]
    fn empty_output_is_its_own_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("output.json");
        std::fs::write(&path, "").unwrap();

        let err = read_first_processed_at(&path).unwrap_err();
        assert!(matches!(err, BenchError::EmptyOutput));
    }
}
