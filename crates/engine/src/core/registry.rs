use crate::core::module::{ModuleDescriptor, ScanModule};
use std::collections::HashMap;
use std::sync::Arc;

/// Compiled-in module handles, keyed by module name. Loading a descriptor
/// file resolves its `module` field against this registry.
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn ScanModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in modules.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::modules::FileHashesModule::new());
        registry.register(crate::modules::FileTypeModule::new());
        registry.register(crate::modules::FileMetadataModule::new());
        registry
    }

    pub fn register<M: ScanModule + 'static>(&mut self, module: M) {
        let name = module.name().to_string();
        self.modules.insert(name, Arc::new(module));
    }

    pub fn register_arc(&mut self, module: Arc<dyn ScanModule>) {
        let name = module.name().to_string();
        self.modules.insert(name, module);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ScanModule>> {
        self.modules.get(name).cloned()
    }

    /// Descriptors for every registered module, with compiled-in defaults.
    pub fn descriptors(&self) -> Vec<ModuleDescriptor> {
        let mut all: Vec<_> = self
            .modules
            .values()
            .map(|handle| ModuleDescriptor::from_handle(handle.clone()))
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.modules.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ModuleRegistryBuilder {
    registry: ModuleRegistry,
}

impl ModuleRegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: ModuleRegistry::new(),
        }
    }

    pub fn with_module<M: ScanModule + 'static>(mut self, module: M) -> Self {
        self.registry.register(module);
        self
    }

    pub fn with_defaults(mut self) -> Self {
        for descriptor in ModuleRegistry::with_defaults().descriptors() {
            self.registry.register_arc(descriptor.handle);
        }
        self
    }

    pub fn build(self) -> ModuleRegistry {
        self.registry
    }
}

impl Default for ModuleRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
