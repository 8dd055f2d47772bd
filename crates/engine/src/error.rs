use thiserror::Error;

/// Fatal engine failures. Anything survivable (an unknown module name at
/// load, a missing dependency, a single file that fails to scan) is handled
/// in place and never reaches this enum.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("dependency cycle among modules: {}", modules.join(" -> "))]
    DependencyCycle { modules: Vec<String> },

    #[error("global module interface {stage}: {message}")]
    GlobalResource {
        stage: ResourceStage,
        message: String,
    },

    #[error("invalid module descriptor {path}: {message}")]
    InvalidDescriptor { path: String, message: String },

    #[error("descriptor {path} names unregistered module {module}")]
    UnknownModule { path: String, module: String },
}

impl EngineError {
    /// The stage a caller should report for a fatal run failure.
    pub fn stage(&self) -> &'static str {
        match self {
            EngineError::DependencyCycle { .. } => "graph build",
            EngineError::GlobalResource { .. } => "global resource",
            EngineError::InvalidDescriptor { .. } | EngineError::UnknownModule { .. } => "load",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStage {
    Acquire,
    Release,
}

impl std::fmt::Display for ResourceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceStage::Acquire => write!(f, "acquisition failed"),
            ResourceStage::Release => write!(f, "release failed"),
        }
    }
}
