use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use telegraph::core::TraceSegment;
use telegraph::graph::{Graph, Node};
use telegraph::module::{
    ApplicationConfig, Module, ModuleDefine, ModuleManager, ModuleRegistry,
};
use telegraph::nodes::{MinDurationFilter, RecordMergeSink, RecordStore, SegmentDurationMapper};
use telegraph::schema::{segment_duration_schema, RecordSchema};

/// Ingest facade registered during `prepare` and wired once the trace
/// module's graph is built during `start`.
struct SegmentIngest {
    entry: OnceLock<Arc<Node<MinDurationFilter>>>,
}

impl SegmentIngest {
    fn new() -> Self {
        Self {
            entry: OnceLock::new(),
        }
    }

    fn push(&self, segment: &TraceSegment) -> Result<()> {
        let entry = self
            .entry
            .get()
            .ok_or_else(|| anyhow::anyhow!("trace pipeline not built yet"))?;
        entry.execute(segment)
    }
}

/// Owns the record store and the segment-duration schema
struct StorageModule;

#[async_trait]
impl Module for StorageModule {
    fn name(&self) -> &'static str {
        "storage"
    }

    async fn prepare(&mut self, manager: &ModuleManager, _config: &Value) -> Result<()> {
        let schema = Arc::new(segment_duration_schema()?);
        manager.register_service(self.name(), "segment-schema", schema);
        manager.register_service(self.name(), "segment-store", Arc::new(RecordStore::new()));
        Ok(())
    }

    async fn start(&mut self, _manager: &ModuleManager, _config: &Value) -> Result<()> {
        Ok(())
    }
}

/// Builds the segment-duration pipeline on top of the storage module
struct TraceModule {
    graph: Option<Graph>,
}

#[async_trait]
impl Module for TraceModule {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn requires(&self) -> Vec<&'static str> {
        vec!["storage"]
    }

    async fn prepare(&mut self, manager: &ModuleManager, _config: &Value) -> Result<()> {
        manager.register_service(self.name(), "segment-ingest", Arc::new(SegmentIngest::new()));
        Ok(())
    }

    async fn start(&mut self, manager: &ModuleManager, config: &Value) -> Result<()> {
        let schema: Arc<RecordSchema> = manager.service("storage", "segment-schema")?;
        let store: Arc<RecordStore> = manager.service("storage", "segment-store")?;
        let threshold_ms = config["min_duration_ms"].as_u64().unwrap_or(0);

        let graph = Graph::new("segment-duration");
        let entry = graph.create_node(MinDurationFilter::new(threshold_ms))?;
        entry
            .add_next(SegmentDurationMapper::new(Arc::clone(&schema)))?
            .add_next(RecordMergeSink::with_store(schema, 0, store))?;
        graph.close();

        let ingest: Arc<SegmentIngest> = manager.service(self.name(), "segment-ingest")?;
        let _ = ingest.entry.set(entry);
        self.graph = Some(graph);
        Ok(())
    }

    async fn notify_after_completed(&mut self) -> Result<()> {
        if let Some(graph) = &self.graph {
            tracing::info!(
                graph = graph.name(),
                nodes = graph.node_count(),
                "trace pipeline ready"
            );
        }
        Ok(())
    }
}

inventory::submit! {
    ModuleDefine { name: "storage", factory: || Box::new(StorageModule) }
}

inventory::submit! {
    ModuleDefine { name: "trace", factory: || Box::new(TraceModule { graph: None }) }
}

fn sample_segment(id: &str, start: u64, end: u64, is_error: bool) -> TraceSegment {
    let mut segment = TraceSegment::new(id, 1);
    segment.service_name = "order-service".to_string();
    segment.start_time = start;
    segment.end_time = end;
    segment.is_error = is_error;
    segment
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let config = ApplicationConfig::from_json(serde_json::json!({
        "boot_timeout_secs": 10,
        "modules": [
            {"name": "storage"},
            {"name": "trace", "config": {"min_duration_ms": 5}}
        ]
    }))?;

    let registry = ModuleRegistry::from_inventory();
    let mut manager = ModuleManager::new();
    manager.init(&config, &registry).await?;

    let ingest: Arc<SegmentIngest> = manager.service("trace", "segment-ingest")?;
    ingest.push(&sample_segment("seg-1", 1_000, 1_250, false))?;
    ingest.push(&sample_segment("seg-2", 2_000, 2_003, false))?; // below threshold
    ingest.push(&sample_segment("seg-1", 1_000, 1_400, true))?; // same key, merged

    let store: Arc<RecordStore> = manager.service("storage", "segment-store")?;
    println!("merged records: {}", store.len());
    for (key, record) in store.snapshot() {
        println!("  {key}: {record:?}");
    }

    Ok(())
}
