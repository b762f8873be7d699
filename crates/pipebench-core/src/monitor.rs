//! Completion detection via the engine's sincedb file.
//!
//! The engine offers no push notification when a tailed input is fully
//! consumed; the sincedb (progress) file it persists is the only externally
//! observable side effect. The monitor polls that file and fires a
//! single-shot signal the first time it exists with nonzero size. The
//! orchestrator owns the monitor's lifetime: it reacts to the signal (by
//! stopping the engine) and cancels the task on every exit path, so no
//! polling outlives a run.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{BenchError, Result};

/// Handle to a spawned sincedb polling task.
#[derive(Debug)]
pub struct CompletionMonitor {
    done: oneshot::Receiver<u64>,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl CompletionMonitor {
    /// Spawn a task polling `sincedb` every `poll_interval`.
    pub fn spawn(sincedb: PathBuf, poll_interval: Duration) -> Self {
        let (done_tx, done_rx) = oneshot::channel();
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::debug!(path = %sincedb.display(), "watching for sincedb file");

            loop {
                tokio::select! {
                    _ = &mut cancel_rx => {
                        tracing::debug!("completion monitor cancelled");
                        return;
                    }
                    _ = ticker.tick() => {}
                }

                // Existence alone is not enough: the engine creates the file
                // before recording any consumed offset.
                if let Ok(meta) = tokio::fs::metadata(&sincedb).await {
                    if meta.len() > 0 {
                        tracing::info!(size = meta.len(), "sincedb is nonzero, input fully consumed");
                        let _ = done_tx.send(meta.len());
                        return;
                    }
                }
            }
        });

        Self {
            done: done_rx,
            cancel: Some(cancel_tx),
            task,
        }
    }

    /// Wait for the edge-triggered completion signal. Fires at most once;
    /// errors if the polling task died without signalling.
    pub async fn completed(&mut self) -> Result<u64> {
        (&mut self.done).await.map_err(|_| BenchError::MonitorDied)
    }

    /// Cancel the polling task and wait for it to finish. Safe to call
    /// whether or not the signal already fired.
    pub async fn shutdown(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        let _ = self.task.await;
    }
}
