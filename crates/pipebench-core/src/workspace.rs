//! Per-run scratch directory.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{BenchError, Result};

/// A uniquely named directory owned by exactly one run. It holds the
/// synthesized pipeline config, the engine's output file, and the sincedb
/// file. Dropping the workspace removes the directory recursively, so the
/// scratch space is released on every exit path, success or failure.
#[derive(Debug)]
pub struct RunWorkspace {
    id: Uuid,
    root: PathBuf,
}

impl RunWorkspace {
    /// Create a fresh workspace under `temp_dir`, named by a random v4 UUID.
    /// Distinct runs get distinct directories without any locking.
    pub fn create(temp_dir: &Path) -> Result<Self> {
        let id = Uuid::new_v4();
        let root = temp_dir.join(id.to_string());
        fs::create_dir_all(&root).map_err(|e| BenchError::Workspace {
            path: root.clone(),
            source: e,
        })?;
        tracing::info!(run_id = %id, path = %root.display(), "created run workspace");
        Ok(Self { id, root })
    }

    /// The run's 128-bit random identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Workspace directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the synthesized pipeline config is written to.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("pipeline.conf")
    }

    /// Path the engine writes its output records to.
    pub fn output_path(&self) -> PathBuf {
        self.root.join("output.json")
    }

    /// Path of the engine's sincedb (progress) file, the completion
    /// side channel.
    pub fn sincedb_path(&self) -> PathBuf {
        self.root.join("sincedb.db")
    }
}

impl Drop for RunWorkspace {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.root) {
            tracing::warn!(
                path = %self.root.display(),
                error = %e,
                "failed to remove run workspace"
            );
        }
    }
}
