use serde::{Deserialize, Serialize};

/// Ordered batch of input paths. Entries may mix posix, windows-drive-letter
/// and relative styles within one batch; the engine only rewrites paths the
/// replacement policy owns.
pub type FileList = Vec<String>;

/// Per-file output of one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FileValue {
    /// Boolean verdict. The only kind that inherits through to dependent
    /// modules untouched.
    Match(bool),
    Text(String),
    Data(serde_json::Value),
    /// Isolated per-file failure; the module and the run keep going.
    Error(String),
}

impl FileValue {
    /// A definitive marker value: dependents pass it through unchanged
    /// instead of computing their own, and replacement-path rewriting never
    /// applies to it.
    pub fn is_definitive(&self) -> bool {
        matches!(self, FileValue::Match(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FileValue::Error(_))
    }
}

/// Static module metadata, identical on every run regardless of inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub module_type: String,
    pub include: bool,
}

/// Terminal state of one module within one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    Finished,
    /// A required dependency was absent from the active set; the module
    /// body never ran.
    Skipped,
    /// The run was cancelled or timed out; entries cover a prefix of the
    /// file list.
    Cancelled,
    Failed,
}

/// One module's published output: per-file values in file-list order plus
/// static metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleResult {
    pub entries: Vec<(String, FileValue)>,
    pub metadata: ModuleMetadata,
    pub status: ModuleStatus,
}

impl ModuleResult {
    pub fn new(entries: Vec<(String, FileValue)>, metadata: ModuleMetadata) -> Self {
        Self {
            entries,
            metadata,
            status: ModuleStatus::Finished,
        }
    }

    pub fn skipped(metadata: ModuleMetadata) -> Self {
        Self {
            entries: Vec::new(),
            metadata,
            status: ModuleStatus::Skipped,
        }
    }

    pub fn with_status(mut self, status: ModuleStatus) -> Self {
        self.status = status;
        self
    }

    /// The published value for one original path, if any.
    pub fn value_for(&self, path: &str) -> Option<&FileValue> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == path)
            .map(|(_, value)| value)
    }

    pub fn is_skipped(&self) -> bool {
        self.status == ModuleStatus::Skipped
    }
}
