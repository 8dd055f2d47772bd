//! Core abstractions of the execution engine: the module capability trait,
//! descriptor records, result types and the handle registry.

pub mod module;
pub mod registry;
pub mod result;

pub use module::{ModuleContext, ModuleDescriptor, ScanModule};
pub use registry::{ModuleRegistry, ModuleRegistryBuilder};
pub use result::{FileList, FileValue, ModuleMetadata, ModuleResult, ModuleStatus};
