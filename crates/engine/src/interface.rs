//! Run-scoped shared resources handed to every module worker.

use crate::error::{EngineError, ResourceStage};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::debug;

/// Shared resource manager for one run: a temp workspace plus a named lock
/// table. Acquired before any worker starts and released exactly once after
/// every worker has terminated. All operations are safe under concurrent use
/// by all workers of the run.
pub struct GlobalModuleInterface {
    workspace: Mutex<Option<TempDir>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl GlobalModuleInterface {
    pub fn acquire() -> Result<Self, EngineError> {
        let workspace = TempDir::new().map_err(|e| EngineError::GlobalResource {
            stage: ResourceStage::Acquire,
            message: e.to_string(),
        })?;
        debug!(path = %workspace.path().display(), "acquired run workspace");
        Ok(Self {
            workspace: Mutex::new(Some(workspace)),
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Scratch directory private to one module, created on first use.
    pub fn scratch_dir(&self, module: &str) -> Result<PathBuf, EngineError> {
        let guard = self.workspace.lock();
        let workspace = guard.as_ref().ok_or_else(|| EngineError::GlobalResource {
            stage: ResourceStage::Acquire,
            message: "workspace already released".to_string(),
        })?;
        let dir = workspace.path().join(module);
        std::fs::create_dir_all(&dir).map_err(|e| EngineError::GlobalResource {
            stage: ResourceStage::Acquire,
            message: format!("scratch dir for {module}: {e}"),
        })?;
        Ok(dir)
    }

    /// Named mutual exclusion shared across workers. The same name always
    /// maps to the same lock within a run.
    pub fn named_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Tear down the workspace. Idempotent; a second call is a no-op.
    /// Cleanup failures surface instead of being swallowed.
    pub fn release(&self) -> Result<(), EngineError> {
        let taken = self.workspace.lock().take();
        match taken {
            Some(workspace) => {
                debug!("releasing run workspace");
                workspace.close().map_err(|e| EngineError::GlobalResource {
                    stage: ResourceStage::Release,
                    message: e.to_string(),
                })
            }
            None => Ok(()),
        }
    }
}
