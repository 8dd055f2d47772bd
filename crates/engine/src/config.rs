//! Engine configuration: run-level knobs plus per-module overrides sourced
//! from an external JSON file.

use crate::core::module::ModuleDescriptor;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Overall run timeout; also the bound on every dependency wait. The
    /// graph builder guarantees scheduled dependencies eventually publish,
    /// so this only guards against a hung per-file computation.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Granularity of dependency waits; cancellation is re-checked every
    /// slice.
    #[serde(default = "default_wait_slice_ms")]
    pub wait_slice_ms: u64,

    /// Per-module overrides keyed by module name. Unknown names are ignored.
    #[serde(default)]
    pub modules: HashMap<String, ModuleOverrides>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(rename = "replacement path", skip_serializing_if = "Option::is_none")]
    pub replacement_path: Option<String>,
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_wait_slice_ms() -> u64 {
    50
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            wait_slice_ms: default_wait_slice_ms(),
            modules: HashMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn wait_slice(&self) -> Duration {
        Duration::from_millis(self.wait_slice_ms)
    }

    /// Apply this config's overrides to a descriptor in place.
    pub fn apply(&self, descriptor: &mut ModuleDescriptor) {
        if let Some(overrides) = self.modules.get(&descriptor.name) {
            if let Some(enabled) = overrides.enabled {
                descriptor.enabled = enabled;
            }
            if let Some(ref path) = overrides.replacement_path {
                descriptor.replacement_path = Some(path.clone());
            }
        }
    }
}
