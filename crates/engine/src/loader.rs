//! Descriptor loading and discovery.
//!
//! A module ships as compiled code registered in a [`ModuleRegistry`]; a
//! JSON descriptor file in the modules directory switches it on and carries
//! its deployment knobs. `load` returns `None` for an unknown name: the
//! not-found sentinel is part of the contract, never an error. Structural
//! problems in a file that *was* found are real load errors.

use crate::core::module::ModuleDescriptor;
use crate::core::registry::ModuleRegistry;
use crate::error::EngineError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct DescriptorFile {
    module: String,

    #[serde(default = "default_enabled")]
    enabled: bool,

    #[serde(rename = "replacement path", default)]
    replacement_path: Option<String>,
}

fn default_enabled() -> bool {
    true
}

/// Load one module descriptor by name, searching `search_paths` in order for
/// `<name>.json`. `Ok(None)` means not found anywhere; `Err` is reserved for
/// a found file that fails validation.
pub fn load(
    name: &str,
    search_paths: &[&Path],
    registry: &ModuleRegistry,
) -> Result<Option<ModuleDescriptor>, EngineError> {
    for dir in search_paths {
        let candidate = dir.join(format!("{name}.json"));
        if candidate.is_file() {
            return load_file(&candidate, registry).map(Some);
        }
    }
    debug!(module = name, "descriptor not found in search paths");
    Ok(None)
}

/// Enumerate every valid descriptor in `dir`. Non-descriptor files are
/// skipped silently; descriptors naming unregistered modules are skipped
/// with a warning. Returned in file-name order so discovery is
/// deterministic.
pub fn discover(dir: &Path, registry: &ModuleRegistry) -> Vec<ModuleDescriptor> {
    let mut found = Vec::new();
    let mut entries: Vec<_> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
        .map(|entry| entry.into_path())
        .collect();
    entries.sort();

    for path in entries {
        match load_file(&path, registry) {
            Ok(descriptor) => found.push(descriptor),
            Err(e) => {
                // Tolerant by design: a directory may hold unrelated files.
                debug!(path = %path.display(), error = %e, "skipping non-descriptor file");
            }
        }
    }
    found
}

fn load_file(path: &Path, registry: &ModuleRegistry) -> Result<ModuleDescriptor, EngineError> {
    let raw = std::fs::read_to_string(path).map_err(|e| EngineError::InvalidDescriptor {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let file: DescriptorFile =
        serde_json::from_str(&raw).map_err(|e| EngineError::InvalidDescriptor {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let Some(handle) = registry.get(&file.module) else {
        warn!(module = %file.module, path = %path.display(), "descriptor names unregistered module");
        return Err(EngineError::UnknownModule {
            path: path.display().to_string(),
            module: file.module,
        });
    };

    let mut descriptor = ModuleDescriptor::from_handle(handle).with_enabled(file.enabled);
    if let Some(replacement) = file.replacement_path {
        descriptor = descriptor.with_replacement_path(replacement);
    }
    Ok(descriptor)
}
