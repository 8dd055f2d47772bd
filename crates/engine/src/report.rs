//! Post-run aggregation: merge every module's published result into a
//! report keyed first by original file path, then by module name.

use crate::core::result::{FileValue, ModuleMetadata, ModuleResult, ModuleStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Outcome of one run: the per-module result map plus timing. Pure data;
/// aggregation is synchronous and happens after every worker has joined.
#[derive(Debug)]
pub struct RunReport {
    files: Vec<String>,
    results: BTreeMap<String, Arc<ModuleResult>>,
    started: DateTime<Utc>,
    finished: DateTime<Utc>,
}

impl RunReport {
    pub(crate) fn new(
        files: Vec<String>,
        results: HashMap<String, Arc<ModuleResult>>,
        started: DateTime<Utc>,
    ) -> Self {
        Self {
            files,
            results: results.into_iter().collect(),
            started,
            finished: Utc::now(),
        }
    }

    /// Per-module results, keyed by module name. Every scheduled module has
    /// an entry, skipped ones included.
    pub fn results(&self) -> &BTreeMap<String, Arc<ModuleResult>> {
        &self.results
    }

    pub fn module(&self, name: &str) -> Option<&ModuleResult> {
        self.results.get(name).map(Arc::as_ref)
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn started(&self) -> DateTime<Utc> {
        self.started
    }

    pub fn finished(&self) -> DateTime<Utc> {
        self.finished
    }

    /// Unified view keyed by original file path, then module name. Only
    /// include-flagged modules are merged here; the rest stay visible
    /// through [`Self::results`].
    pub fn by_file(&self) -> BTreeMap<&str, BTreeMap<&str, &FileValue>> {
        let mut merged: BTreeMap<&str, BTreeMap<&str, &FileValue>> = BTreeMap::new();
        for file in &self.files {
            merged.entry(file.as_str()).or_default();
        }
        for result in self.results.values() {
            if !result.metadata.include {
                continue;
            }
            for (file, value) in &result.entries {
                merged
                    .entry(file.as_str())
                    .or_default()
                    .insert(result.metadata.name.as_str(), value);
            }
        }
        merged
    }

    /// Module statuses, for callers that persist run state.
    pub fn statuses(&self) -> BTreeMap<&str, &ModuleStatus> {
        self.results
            .iter()
            .map(|(name, result)| (name.as_str(), &result.status))
            .collect()
    }

    pub fn metadata(&self) -> Vec<&ModuleMetadata> {
        self.results.values().map(|r| &r.metadata).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        let modules: BTreeMap<_, _> = self
            .results
            .iter()
            .map(|(name, result)| {
                (
                    name.as_str(),
                    json!({
                        "metadata": &result.metadata,
                        "status": &result.status,
                        "entries": &result.entries,
                    }),
                )
            })
            .collect();
        let report = json!({
            "started": self.started.to_rfc3339(),
            "finished": self.finished.to_rfc3339(),
            "files": self.by_file(),
            "modules": modules,
        });
        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Scanned {} files with {} modules in {}ms\n",
            self.files.len(),
            self.results.len(),
            (self.finished - self.started).num_milliseconds()
        ));
        for (name, result) in &self.results {
            let errors = result
                .entries
                .iter()
                .filter(|(_, value)| value.is_error())
                .count();
            out.push_str(&format!(
                "  {name}: {:?}, {} entries, {} errors\n",
                result.status,
                result.entries.len(),
                errors
            ));
        }
        out
    }
}
