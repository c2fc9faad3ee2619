use anyhow::{ensure, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use telegraph::module::{
    ApplicationConfig, Module, ModuleError, ModuleManager, ModulePhase, ModuleRegistry,
};

type EventLog = Arc<Mutex<Vec<String>>>;

/// Test module recording every lifecycle call into a shared log
struct TracingModule {
    name: &'static str,
    requires: Vec<&'static str>,
    events: EventLog,
}

impl TracingModule {
    fn factory(
        name: &'static str,
        requires: Vec<&'static str>,
        events: &EventLog,
    ) -> impl Fn() -> Box<dyn Module> + Send + Sync + 'static {
        let events = Arc::clone(events);
        move || {
            Box::new(TracingModule {
                name,
                requires: requires.clone(),
                events: Arc::clone(&events),
            })
        }
    }

    fn record(&self, phase: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, phase));
    }
}

#[async_trait]
impl Module for TracingModule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn requires(&self) -> Vec<&'static str> {
        self.requires.clone()
    }

    async fn prepare(&mut self, _manager: &ModuleManager, _config: &Value) -> Result<()> {
        self.record("prepare");
        Ok(())
    }

    async fn start(&mut self, manager: &ModuleManager, _config: &Value) -> Result<()> {
        // Every peer must be at least prepared by now
        for peer in &self.requires {
            ensure!(manager.has(peer), "peer {peer} not loaded during start");
            let phase = manager.phase(peer);
            ensure!(
                phase != Some(ModulePhase::Unloaded) && phase.is_some(),
                "peer {peer} still unloaded during start"
            );
        }
        self.record("start");
        Ok(())
    }

    async fn notify_after_completed(&mut self) -> Result<()> {
        self.record("notify");
        Ok(())
    }
}

struct FailingModule;

#[async_trait]
impl Module for FailingModule {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn prepare(&mut self, _manager: &ModuleManager, _config: &Value) -> Result<()> {
        anyhow::bail!("broken on purpose")
    }

    async fn start(&mut self, _manager: &ModuleManager, _config: &Value) -> Result<()> {
        Ok(())
    }
}

struct HangingModule;

#[async_trait]
impl Module for HangingModule {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn prepare(&mut self, _manager: &ModuleManager, _config: &Value) -> Result<()> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn start(&mut self, _manager: &ModuleManager, _config: &Value) -> Result<()> {
        Ok(())
    }
}

struct ServiceModule;

#[async_trait]
impl Module for ServiceModule {
    fn name(&self) -> &'static str {
        "provider"
    }

    async fn prepare(&mut self, manager: &ModuleManager, _config: &Value) -> Result<()> {
        manager.register_service(self.name(), "answer", Arc::new(42usize));
        Ok(())
    }

    async fn start(&mut self, _manager: &ModuleManager, _config: &Value) -> Result<()> {
        Ok(())
    }
}

fn config_for(names: &[&str]) -> ApplicationConfig {
    names.iter().fold(ApplicationConfig::new(), |config, name| {
        config.with_module(*name, Value::Null)
    })
}

#[tokio::test]
async fn boots_all_configured_modules() {
    let events = EventLog::default();
    let mut registry = ModuleRegistry::new();
    registry.register("a", TracingModule::factory("a", vec![], &events));
    registry.register("b", TracingModule::factory("b", vec!["a"], &events));

    let mut manager = ModuleManager::new();
    assert!(!manager.has("a"));
    assert!(manager.find("a").is_err());

    manager
        .init(&config_for(&["a", "b"]), &registry)
        .await
        .unwrap();

    assert!(manager.has("a"));
    assert!(manager.has("b"));
    assert_eq!(manager.phase("a"), Some(ModulePhase::Completed));
    assert_eq!(manager.phase("b"), Some(ModulePhase::Completed));
    assert_eq!(manager.module_list(), vec!["a", "b"]);

    let err = manager.find("c").unwrap_err();
    assert!(matches!(err, ModuleError::ModuleNotFound { names } if names == vec!["c"]));
}

#[tokio::test]
async fn phases_are_barrier_synchronized() {
    let events = EventLog::default();
    let mut registry = ModuleRegistry::new();
    registry.register("a", TracingModule::factory("a", vec![], &events));
    registry.register("b", TracingModule::factory("b", vec![], &events));

    let mut manager = ModuleManager::new();
    manager
        .init(&config_for(&["a", "b"]), &registry)
        .await
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            "a:prepare",
            "b:prepare",
            "a:start",
            "b:start",
            "a:notify",
            "b:notify"
        ]
    );
}

#[tokio::test]
async fn missing_modules_are_reported_together() {
    let events = EventLog::default();
    let mut registry = ModuleRegistry::new();
    registry.register("a", TracingModule::factory("a", vec![], &events));

    let mut manager = ModuleManager::new();
    let err = manager
        .init(&config_for(&["a", "b", "c"]), &registry)
        .await
        .unwrap_err();

    match err {
        ModuleError::ModuleNotFound { names } => assert_eq!(names, vec!["b", "c"]),
        other => panic!("unexpected error: {other}"),
    }
    // No prepare ran for the resolvable module either: boot is all-or-nothing
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_provider_fails_boot() {
    let events = EventLog::default();
    let mut registry = ModuleRegistry::new();
    registry.register(
        "b",
        TracingModule::factory("b", vec!["not-configured"], &events),
    );

    let mut manager = ModuleManager::new();
    let err = manager.init(&config_for(&["b"]), &registry).await.unwrap_err();

    match err {
        ModuleError::ProviderNotFound { module, provider } => {
            assert_eq!(module, "b");
            assert_eq!(provider, "not-configured");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn dependent_module_observes_peer_during_start() {
    let events = EventLog::default();
    let mut registry = ModuleRegistry::new();
    registry.register("a", TracingModule::factory("a", vec![], &events));
    // b's start asserts: a loaded and past Unloaded
    registry.register("b", TracingModule::factory("b", vec!["a"], &events));

    let mut manager = ModuleManager::new();
    manager
        .init(&config_for(&["b", "a"]), &registry)
        .await
        .unwrap();
}

#[tokio::test]
async fn lifecycle_failure_is_fatal_and_attributed() {
    let mut registry = ModuleRegistry::new();
    registry.register("failing", || Box::new(FailingModule));

    let mut manager = ModuleManager::new();
    let err = manager
        .init(&config_for(&["failing"]), &registry)
        .await
        .unwrap_err();

    match err {
        ModuleError::Lifecycle { module, phase, .. } => {
            assert_eq!(module, "failing");
            assert_eq!(phase, ModulePhase::Prepared);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn hung_module_fails_boot_after_timeout() {
    let mut registry = ModuleRegistry::new();
    registry.register("hanging", || Box::new(HangingModule));

    let config = config_for(&["hanging"]).with_boot_timeout_secs(2);
    let mut manager = ModuleManager::new();
    let err = manager.init(&config, &registry).await.unwrap_err();

    match err {
        ModuleError::PhaseTimeout {
            module,
            phase,
            seconds,
        } => {
            assert_eq!(module, "hanging");
            assert_eq!(phase, ModulePhase::Prepared);
            assert_eq!(seconds, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn services_are_typed_and_scoped_to_their_module() {
    let mut registry = ModuleRegistry::new();
    registry.register("provider", || Box::new(ServiceModule));

    let mut manager = ModuleManager::new();
    manager
        .init(&config_for(&["provider"]), &registry)
        .await
        .unwrap();

    let answer: Arc<usize> = manager.service("provider", "answer").unwrap();
    assert_eq!(*answer, 42);

    let handle = manager.find("provider").unwrap();
    assert_eq!(handle.phase(), ModulePhase::Completed);
    let answer: Arc<usize> = handle.service("answer").unwrap();
    assert_eq!(*answer, 42);

    // Unknown service name
    let err = manager.service::<usize>("provider", "question").unwrap_err();
    assert!(matches!(err, ModuleError::ServiceNotProvided { .. }));

    // Right name, wrong type
    let err = manager.service::<String>("provider", "answer").unwrap_err();
    assert!(matches!(err, ModuleError::ServiceNotProvided { .. }));
}
