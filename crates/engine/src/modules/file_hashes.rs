use crate::core::module::{ModuleContext, ScanModule};
use crate::core::result::FileValue;
use anyhow::{Context, Result};
use serde_json::json;
use sha2::{Digest, Sha256};

/// SHA-256 digest of each input file.
pub struct FileHashesModule;

impl FileHashesModule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileHashesModule {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanModule for FileHashesModule {
    fn name(&self) -> &'static str {
        "file_hashes"
    }

    fn module_type(&self) -> &'static str {
        "Metadata"
    }

    fn scan_file(&self, path: &str, _ctx: &ModuleContext<'_>) -> Result<FileValue> {
        let contents = std::fs::read(path).with_context(|| format!("reading {path}"))?;
        let digest = Sha256::digest(&contents);
        Ok(FileValue::Data(json!({
            "sha256": hex::encode(digest),
            "size": contents.len(),
        })))
    }
}
