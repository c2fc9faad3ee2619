use super::Module;
use std::collections::HashMap;

/// Link-time registration entry for a module implementation.
///
/// Crates providing modules submit one of these so the manager can discover
/// them without an explicit registration call:
///
/// ```ignore
/// inventory::submit! {
///     ModuleDefine { name: "storage", factory: || Box::new(StorageModule::new()) }
/// }
/// ```
pub struct ModuleDefine {
    pub name: &'static str,
    pub factory: fn() -> Box<dyn Module>,
}

inventory::collect!(ModuleDefine);

/// Registry of available module implementations, keyed by name.
///
/// Populated either from the inventory of [`ModuleDefine`] submissions or by
/// explicit [`ModuleRegistry::register`] calls (the latter is what tests use).
pub struct ModuleRegistry {
    factories: HashMap<String, Box<dyn Fn() -> Box<dyn Module> + Send + Sync>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Collect every `ModuleDefine` submitted across the linked crates
    pub fn from_inventory() -> Self {
        let mut registry = Self::new();
        for define in inventory::iter::<ModuleDefine> {
            registry.register(define.name, define.factory);
        }
        registry
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Module> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    /// Create a fresh instance of the named module, if known
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Module>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
