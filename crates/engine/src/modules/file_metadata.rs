use crate::core::module::{ModuleContext, ScanModule};
use crate::core::result::FileValue;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::json;

/// Filesystem metadata for each input file.
pub struct FileMetadataModule;

impl FileMetadataModule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileMetadataModule {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanModule for FileMetadataModule {
    fn name(&self) -> &'static str {
        "file_metadata"
    }

    fn module_type(&self) -> &'static str {
        "Metadata"
    }

    fn scan_file(&self, path: &str, _ctx: &ModuleContext<'_>) -> Result<FileValue> {
        let meta = std::fs::metadata(path).with_context(|| format!("stat {path}"))?;
        let modified = meta
            .modified()
            .ok()
            .map(|time| DateTime::<Utc>::from(time).to_rfc3339());
        Ok(FileValue::Data(json!({
            "size": meta.len(),
            "is_dir": meta.is_dir(),
            "modified": modified,
        })))
    }
}
