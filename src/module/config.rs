use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Configuration entry for one module: its name plus an opaque JSON config
/// handed to the module's lifecycle hooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,

    #[serde(default)]
    pub config: Value,
}

/// Boot configuration: the ordered list of required modules and an optional
/// per-module phase timeout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// When set, each lifecycle hook must finish within this many seconds
    /// or boot fails. Unset means a hung module blocks boot indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_timeout_secs: Option<u64>,

    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

impl ApplicationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).context("invalid application configuration")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid application configuration in {}", path.display()))
    }

    /// Add one module entry, keeping declaration order
    pub fn with_module(mut self, name: impl Into<String>, config: Value) -> Self {
        self.modules.push(ModuleConfig {
            name: name.into(),
            config,
        });
        self
    }

    pub fn with_boot_timeout_secs(mut self, seconds: u64) -> Self {
        self.boot_timeout_secs = Some(seconds);
        self
    }

    /// Configured module names, in declaration order
    pub fn module_list(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn module_config(&self, name: &str) -> Option<&Value> {
        self.modules
            .iter()
            .find(|m| m.name == name)
            .map(|m| &m.config)
    }

    pub fn boot_timeout(&self) -> Option<Duration> {
        self.boot_timeout_secs.map(Duration::from_secs)
    }
}
