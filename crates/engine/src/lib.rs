//! Multiscan Engine - Concurrent Module Execution
//!
//! This crate provides a pluggable module execution engine for batch file
//! scanning: given a file list and an active set of scan modules, it
//! validates the dependency graph, runs one worker per module, lets
//! consumers block-read their dependencies' published results, applies
//! replacement-path normalization to freshly computed values, isolates
//! per-file failures, and aggregates everything into a per-file report.

pub mod cancel;
pub mod config;
pub mod core;
pub mod error;
pub mod graph;
pub mod interface;
pub mod loader;
pub mod modules;
pub mod report;
pub mod runner;
pub mod scheduler;
pub mod table;

pub use crate::cancel::CancelToken;
pub use crate::config::{EngineConfig, ModuleOverrides};
pub use crate::core::{
    FileList, FileValue, ModuleContext, ModuleDescriptor, ModuleMetadata, ModuleRegistry,
    ModuleRegistryBuilder, ModuleResult, ModuleStatus, ScanModule,
};
pub use crate::error::{EngineError, ResourceStage};
pub use crate::graph::ExecutionPlan;
pub use crate::interface::GlobalModuleInterface;
pub use crate::report::RunReport;
pub use crate::scheduler::ScanEngine;
pub use crate::table::ResultTable;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
