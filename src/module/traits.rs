use super::ModuleManager;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A pluggable subsystem with a three-phase boot contract.
///
/// The manager drives every configured module through
/// `prepare` → `start` → `notify_after_completed`, with a barrier between
/// phases across the whole cohort.
#[async_trait]
pub trait Module: Send + Sync {
    /// Unique name this module is configured and looked up by
    fn name(&self) -> &'static str;

    /// Names of modules this one depends on. Verified after `prepare`;
    /// a missing entry fails boot with provider-not-found.
    fn requires(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// First phase. Register the services this module will expose via
    /// [`ModuleManager::register_service`]. No other module is started yet,
    /// so peers must not be looked up here.
    async fn prepare(&mut self, manager: &ModuleManager, config: &Value) -> Result<()>;

    /// Second phase. Every configured module is prepared by now; peers may
    /// be looked up through the manager. Activate the module here: open
    /// listeners, spawn workers, build processing graphs.
    async fn start(&mut self, manager: &ModuleManager, config: &Value) -> Result<()>;

    /// Final synchronization hook, called once every module has started.
    async fn notify_after_completed(&mut self) -> Result<()> {
        Ok(())
    }
}
