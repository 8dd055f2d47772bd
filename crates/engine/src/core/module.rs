//! Module capability trait and descriptor record.
//!
//! A module is registered under a fixed contract instead of being discovered
//! through runtime introspection: the code implements [`ScanModule`] and a
//! descriptor record carries the per-deployment knobs (enabled, replacement
//! path). The engine owns iteration over the file list so that dependency
//! inheritance, path replacement and per-file failure isolation behave the
//! same for every module.

use crate::cancel::CancelToken;
use crate::core::result::{FileValue, ModuleMetadata, ModuleResult};
use crate::interface::GlobalModuleInterface;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Capability contract every pluggable scan module implements.
///
/// Implementations must be stateless across runs (`Send + Sync`); anything
/// run-scoped comes through the [`ModuleContext`].
pub trait ScanModule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Coarse category reported in metadata, e.g. "Metadata" or "Detection".
    fn module_type(&self) -> &'static str;

    /// Whether this module's per-file values are merged into the unified
    /// per-file report or kept alongside it.
    fn include(&self) -> bool {
        true
    }

    fn enabled_by_default(&self) -> bool {
        true
    }

    /// Names of modules whose published results this module consumes.
    fn requires(&self) -> &'static [&'static str] {
        &[]
    }

    /// Compute the value for one file. `path` is the path after any
    /// replacement-path rewrite; the engine keys the result by the original
    /// path. Errors are isolated to this file's entry.
    fn scan_file(&self, path: &str, ctx: &ModuleContext<'_>) -> Result<FileValue>;
}

/// Run-scoped view handed to a module while it scans: its dependencies'
/// published results plus the shared global interface.
pub struct ModuleContext<'a> {
    pub(crate) module: &'a str,
    pub(crate) iface: &'a GlobalModuleInterface,
    pub(crate) deps: &'a BTreeMap<String, Arc<ModuleResult>>,
    pub(crate) cancel: &'a CancelToken,
}

impl<'a> ModuleContext<'a> {
    /// Published result of a required module, if it was scheduled.
    pub fn dependency(&self, name: &str) -> Option<&ModuleResult> {
        self.deps.get(name).map(Arc::as_ref)
    }

    /// Scratch directory private to this module, inside the run's temp
    /// workspace.
    pub fn scratch_dir(&self) -> Result<PathBuf> {
        Ok(self.iface.scratch_dir(self.module)?)
    }

    /// Named mutual exclusion shared across all workers of the run.
    pub fn named_lock(&self, name: &str) -> Arc<parking_lot::Mutex<()>> {
        self.iface.named_lock(name)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// One module's entry in the active set: the capability handle plus the
/// deployment-configurable flags.
#[derive(Clone)]
pub struct ModuleDescriptor {
    pub name: String,
    pub module_type: String,
    pub include: bool,
    pub enabled: bool,
    pub requires: Vec<String>,
    pub replacement_path: Option<String>,
    pub handle: Arc<dyn ScanModule>,
}

impl ModuleDescriptor {
    /// Descriptor with the handle's compiled-in defaults.
    pub fn from_handle(handle: Arc<dyn ScanModule>) -> Self {
        Self {
            name: handle.name().to_string(),
            module_type: handle.module_type().to_string(),
            include: handle.include(),
            enabled: handle.enabled_by_default(),
            requires: handle.requires().iter().map(|s| s.to_string()).collect(),
            replacement_path: None,
            handle,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_replacement_path(mut self, path: impl Into<String>) -> Self {
        self.replacement_path = Some(path.into());
        self
    }

    pub fn metadata(&self) -> ModuleMetadata {
        ModuleMetadata {
            name: self.name.clone(),
            module_type: self.module_type.clone(),
            include: self.include,
        }
    }
}

impl std::fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .field("module_type", &self.module_type)
            .field("include", &self.include)
            .field("enabled", &self.enabled)
            .field("requires", &self.requires)
            .field("replacement_path", &self.replacement_path)
            .finish()
    }
}
