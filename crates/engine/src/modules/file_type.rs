use crate::core::module::{ModuleContext, ScanModule};
use crate::core::result::FileValue;
use anyhow::{Context, Result};

/// Magic-byte file type guess.
pub struct FileTypeModule;

impl FileTypeModule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileTypeModule {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanModule for FileTypeModule {
    fn name(&self) -> &'static str {
        "file_type"
    }

    fn module_type(&self) -> &'static str {
        "Metadata"
    }

    fn scan_file(&self, path: &str, _ctx: &ModuleContext<'_>) -> Result<FileValue> {
        let guessed = infer::get_from_path(path).with_context(|| format!("reading {path}"))?;
        Ok(match guessed {
            Some(kind) => FileValue::Text(kind.mime_type().to_string()),
            None => FileValue::Text("unknown".to_string()),
        })
    }
}
