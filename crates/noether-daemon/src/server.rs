//! Daemon assembly and serving
//!
//! Wires the registry, store, and scheduler together, hydrates state from
//! the latest snapshots, resumes a run that was active at shutdown, and
//! serves the REST/SSE surface.

use crate::config::DaemonConfig;
use crate::router::create_router;
use crate::state::AppState;
use noether_engine::{EvolutionScheduler, RunMarker};
use noether_knowledge::{JsonFileStore, KnowledgeStore};
use noether_mutate::MutatorConfig;
use noether_registry::Registry;
use noether_types::ControlCommand;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the scheduler stack from configuration
pub fn build_scheduler(config: &DaemonConfig) -> Arc<EvolutionScheduler> {
    let registry = Arc::new(Registry::standard());
    let persistence = Arc::new(JsonFileStore::new(&config.data_dir));
    let store = Arc::new(KnowledgeStore::new(persistence, config.snapshot_interval));

    match store.load_from_snapshots() {
        Ok(restored) if restored > 0 => info!(restored, "Restored entries from snapshots"),
        Ok(_) => {}
        Err(err) => warn!(error = %err, "Snapshot hydration failed; starting empty"),
    }

    let marker = RunMarker::new(config.data_dir.join("engine.running"));
    Arc::new(EvolutionScheduler::new(
        config.engine_config(),
        MutatorConfig::default(),
        registry,
        store,
        Some(marker),
    ))
}

/// Run the daemon until the process is terminated
pub async fn run(config: DaemonConfig) -> anyhow::Result<()> {
    let scheduler = build_scheduler(&config);

    // A marker left behind by a previous process means the engine was
    // running when it died; pick up where it left off
    let marker = RunMarker::new(config.data_dir.join("engine.running"));
    if config.resume && marker.is_set() {
        info!("Run marker present; resuming evolution loop");
        scheduler.handle(ControlCommand::Start)?;
    }

    let state = AppState::new(scheduler);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!(addr = %config.listen, "noetherd listening");
    axum::serve(listener, router).await?;
    Ok(())
}
