use super::{ApplicationConfig, Module, ModuleError, ModulePhase, ModuleRegistry};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

struct LoadedModule {
    /// The instance itself; locked only for the phased lifecycle calls
    instance: Mutex<Box<dyn Module>>,
    /// Written by the manager between phases, readable by anyone
    phase: RwLock<ModulePhase>,
}

impl LoadedModule {
    fn phase(&self) -> ModulePhase {
        *self.phase.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, phase: ModulePhase) {
        *self.phase.write().unwrap_or_else(|e| e.into_inner()) = phase;
    }
}

/// Read-only view of one loaded module, returned by [`ModuleManager::find`].
pub struct ModuleHandle<'a> {
    name: &'a str,
    slot: &'a LoadedModule,
    manager: &'a ModuleManager,
}

impl std::fmt::Debug for ModuleHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("name", &self.name)
            .field("phase", &self.phase())
            .finish()
    }
}

impl ModuleHandle<'_> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn phase(&self) -> ModulePhase {
        self.slot.phase()
    }

    /// Look up a service this module registered during `prepare`
    pub fn service<T>(&self, service: &str) -> Result<Arc<T>, ModuleError>
    where
        T: Send + Sync + 'static,
    {
        self.manager.service(self.name, service)
    }
}

/// Boot-time orchestrator for the configured module set.
///
/// `init` resolves every configured name against the registry, then drives
/// the whole cohort through `prepare` → `start` → `notify_after_completed`
/// with a barrier between phases. The loaded-module map is mutated only
/// inside `init`; all later lookups are plain reads.
pub struct ModuleManager {
    loaded: HashMap<String, Arc<LoadedModule>>,
    /// Configuration order, used for every phase loop
    boot_order: Vec<String>,
    services: RwLock<HashMap<(String, String), Arc<dyn Any + Send + Sync>>>,
}

impl ModuleManager {
    pub fn new() -> Self {
        Self {
            loaded: HashMap::new(),
            boot_order: Vec::new(),
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve, instantiate and boot every module named in `config`.
    ///
    /// Fails with [`ModuleError::ModuleNotFound`] listing *all* configured
    /// names the registry cannot satisfy. Any boot-phase failure is fatal:
    /// no partial module set is left serving traffic.
    pub async fn init(
        &mut self,
        config: &ApplicationConfig,
        registry: &ModuleRegistry,
    ) -> Result<(), ModuleError> {
        let mut missing = Vec::new();
        let mut resolved = Vec::new();
        for entry in &config.modules {
            match registry.instantiate(&entry.name) {
                Some(instance) => resolved.push((entry.name.clone(), instance)),
                None => missing.push(entry.name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(ModuleError::ModuleNotFound { names: missing });
        }
        for (name, instance) in resolved {
            self.loaded.insert(
                name.clone(),
                Arc::new(LoadedModule {
                    instance: Mutex::new(instance),
                    phase: RwLock::new(ModulePhase::Unloaded),
                }),
            );
            self.boot_order.push(name);
        }

        let timeout = config.boot_timeout();

        for name in self.boot_order.clone() {
            let slot = self.slot(&name)?;
            let module_config = self.module_config(config, &name);
            {
                let mut instance = slot.instance.lock().await;
                Self::run_hook(
                    &name,
                    ModulePhase::Prepared,
                    timeout,
                    instance.prepare(self, &module_config),
                )
                .await?;
            }
            slot.set_phase(ModulePhase::Prepared);
            info!(module = %name, "module prepared");
        }

        self.check_providers().await?;

        for name in self.boot_order.clone() {
            let slot = self.slot(&name)?;
            let module_config = self.module_config(config, &name);
            {
                let mut instance = slot.instance.lock().await;
                Self::run_hook(
                    &name,
                    ModulePhase::Started,
                    timeout,
                    instance.start(self, &module_config),
                )
                .await?;
            }
            slot.set_phase(ModulePhase::Started);
            info!(module = %name, "module started");
        }

        for name in self.boot_order.clone() {
            let slot = self.slot(&name)?;
            {
                let mut instance = slot.instance.lock().await;
                Self::run_hook(
                    &name,
                    ModulePhase::Completed,
                    timeout,
                    instance.notify_after_completed(),
                )
                .await?;
            }
            slot.set_phase(ModulePhase::Completed);
            debug!(module = %name, "module completed");
        }

        info!(modules = self.boot_order.len(), "module boot finished");
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    pub fn find(&self, name: &str) -> Result<ModuleHandle<'_>, ModuleError> {
        match self.loaded.get_key_value(name) {
            Some((key, slot)) => Ok(ModuleHandle {
                name: key.as_str(),
                slot,
                manager: self,
            }),
            None => Err(ModuleError::ModuleNotFound {
                names: vec![name.to_string()],
            }),
        }
    }

    pub fn phase(&self, name: &str) -> Option<ModulePhase> {
        self.loaded.get(name).map(|slot| slot.phase())
    }

    /// Names of loaded modules in boot (configuration) order
    pub fn module_list(&self) -> Vec<&str> {
        self.boot_order.iter().map(String::as_str).collect()
    }

    /// Expose a service handle under `(module, service)`. Called by modules
    /// from their `prepare` hook.
    pub fn register_service<T>(&self, module: &str, service: &str, handle: Arc<T>)
    where
        T: Send + Sync + 'static,
    {
        debug!(module = %module, service = %service, "service registered");
        let mut services = self.services.write().unwrap_or_else(|e| e.into_inner());
        services.insert((module.to_string(), service.to_string()), handle);
    }

    /// Look up a service registered by `module`. Fails with
    /// [`ModuleError::ServiceNotProvided`] when the service is absent or was
    /// registered under a different type.
    pub fn service<T>(&self, module: &str, service: &str) -> Result<Arc<T>, ModuleError>
    where
        T: Send + Sync + 'static,
    {
        let services = self.services.read().unwrap_or_else(|e| e.into_inner());
        services
            .get(&(module.to_string(), service.to_string()))
            .and_then(|handle| Arc::clone(handle).downcast::<T>().ok())
            .ok_or_else(|| ModuleError::ServiceNotProvided {
                module: module.to_string(),
                service: service.to_string(),
            })
    }

    fn slot(&self, name: &str) -> Result<Arc<LoadedModule>, ModuleError> {
        self.loaded
            .get(name)
            .cloned()
            .ok_or_else(|| ModuleError::ModuleNotFound {
                names: vec![name.to_string()],
            })
    }

    fn module_config(&self, config: &ApplicationConfig, name: &str) -> Value {
        config.module_config(name).cloned().unwrap_or(Value::Null)
    }

    /// Verify every `requires()` declaration against the loaded set
    async fn check_providers(&self) -> Result<(), ModuleError> {
        for name in &self.boot_order {
            let slot = self.slot(name)?;
            let required = slot.instance.lock().await.requires();
            for provider in required {
                if !self.has(provider) {
                    return Err(ModuleError::ProviderNotFound {
                        module: name.clone(),
                        provider: provider.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    async fn run_hook<F>(
        name: &str,
        entering: ModulePhase,
        timeout: Option<Duration>,
        hook: F,
    ) -> Result<(), ModuleError>
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, hook).await.map_err(|_| {
                ModuleError::PhaseTimeout {
                    module: name.to_string(),
                    phase: entering,
                    seconds: limit.as_secs(),
                }
            })?,
            None => hook.await,
        };
        outcome.map_err(|source| ModuleError::Lifecycle {
            module: name.to_string(),
            phase: entering,
            source,
        })
    }
}

impl Default for ModuleManager {
    fn default() -> Self {
        Self::new()
    }
}
