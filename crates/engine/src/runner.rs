//! Worker body for a single module.
//!
//! The runner owns everything the engine guarantees uniformly across
//! modules: skip-on-missing-dependency, blocking dependency reads, marker
//! inheritance, replacement-path rewriting, per-file failure isolation and
//! publish-once.

use crate::cancel::CancelToken;
use crate::core::module::{ModuleContext, ModuleDescriptor};
use crate::core::result::{FileValue, ModuleResult, ModuleStatus};
use crate::interface::GlobalModuleInterface;
use crate::table::ResultTable;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Execute one module over the file list and publish its result.
///
/// Returns the published result. Exactly one publication happens per call
/// on every path, including skip, cancellation and timeout; the skip result
/// is published too so that dependents of a skipped module unblock.
pub fn run_module(
    descriptor: &ModuleDescriptor,
    files: &[String],
    table: &ResultTable,
    iface: &GlobalModuleInterface,
    cancel: &CancelToken,
    deadline: Instant,
    wait_slice: Duration,
) -> Arc<ModuleResult> {
    // A dependency absent from the active set never publishes; resolve to
    // "no result" immediately instead of blocking.
    let missing: Vec<&String> = descriptor
        .requires
        .iter()
        .filter(|name| !table.contains(name))
        .collect();
    if !missing.is_empty() {
        debug!(
            module = %descriptor.name,
            missing = ?missing,
            "required dependency not in active set, skipping"
        );
        return table.publish(&descriptor.name, ModuleResult::skipped(descriptor.metadata()));
    }

    let mut deps: BTreeMap<String, Arc<ModuleResult>> = BTreeMap::new();
    for name in &descriptor.requires {
        // Scheduled dependencies are guaranteed to publish eventually (the
        // graph was validated acyclic), so the bound only guards external
        // stalls.
        match table.wait(name, deadline, wait_slice, cancel) {
            Some(result) => {
                deps.insert(name.clone(), result);
            }
            None => {
                let status = if cancel.is_cancelled() {
                    ModuleStatus::Cancelled
                } else {
                    warn!(module = %descriptor.name, dependency = %name, "dependency wait timed out");
                    ModuleStatus::Failed
                };
                let result = ModuleResult::new(Vec::new(), descriptor.metadata()).with_status(status);
                return table.publish(&descriptor.name, result);
            }
        }
    }

    let ctx = ModuleContext {
        module: &descriptor.name,
        iface,
        deps: &deps,
        cancel,
    };

    let mut entries = Vec::with_capacity(files.len());
    let mut status = ModuleStatus::Finished;

    for file in files {
        if cancel.is_cancelled() || Instant::now() >= deadline {
            status = ModuleStatus::Cancelled;
            break;
        }

        // A definitive marker from a direct dependency passes through
        // unchanged; replacement policy never overrides an inherited value.
        if let Some(inherited) = inherited_value(descriptor, &deps, file) {
            entries.push((file.clone(), inherited));
            continue;
        }

        let scan_path = match descriptor.replacement_path.as_deref() {
            Some(replacement) => replace_directory(file, replacement),
            None => file.clone(),
        };

        match descriptor.handle.scan_file(&scan_path, &ctx) {
            Ok(value) => entries.push((file.clone(), value)),
            Err(e) => {
                // Isolated to this file; the module and the run keep going.
                warn!(module = %descriptor.name, file = %file, error = %e, "per-file scan failed");
                entries.push((file.clone(), FileValue::Error(e.to_string())));
            }
        }
    }

    let result = ModuleResult::new(entries, descriptor.metadata()).with_status(status);
    table.publish(&descriptor.name, result)
}

fn inherited_value(
    descriptor: &ModuleDescriptor,
    deps: &BTreeMap<String, Arc<ModuleResult>>,
    file: &str,
) -> Option<FileValue> {
    for name in &descriptor.requires {
        if let Some(value) = deps.get(name).and_then(|result| result.value_for(file)) {
            if value.is_definitive() {
                return Some(value.clone());
            }
        }
    }
    None
}

/// Rewrite the directory component of `path` to `replacement`, keeping the
/// base name. The separator convention comes from the replacement string
/// itself, not from the original path's platform style. Paths whose
/// directory already equals the replacement are left untouched.
pub fn replace_directory(path: &str, replacement: &str) -> String {
    let base = base_name(path);
    let dir = path[..path.len() - base.len()].trim_end_matches(['/', '\\']);
    if dir == replacement.trim_end_matches(['/', '\\']) {
        return path.to_string();
    }

    let sep = if replacement.contains('\\') { '\\' } else { '/' };
    if replacement.ends_with(['/', '\\']) {
        format!("{replacement}{base}")
    } else {
        format!("{replacement}{sep}{base}")
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
