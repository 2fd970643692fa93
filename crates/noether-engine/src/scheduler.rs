//! Evolution scheduler
//!
//! The scheduler owns the pipeline: select template, mutate, gate on the
//! complexity ceiling, verify, classify, then emit events. The loop is a
//! single spawned task guarded by an atomic flag; `start` while running is
//! a no-op, `stop` prevents the next iteration but never interrupts one in
//! flight, and `reset` clears the collections without touching the run
//! state. The cooperative pause between iterations is the loop's only
//! suspension point.

use crate::broadcaster::EventBroadcaster;
use crate::classifier::Classifier;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::marker::RunMarker;
use noether_knowledge::KnowledgeStore;
use noether_mutate::{Mutator, MutatorConfig};
use noether_registry::Registry;
use noether_types::{CollectionKind, ControlCommand, EngineEvent, EngineStats, Outcome, RunState};
use noether_verify::Verifier;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Default)]
struct Counters {
    ticks: u64,
    redundant: u64,
    scanned: u64,
}

struct SchedulerShared {
    config: EngineConfig,
    store: Arc<KnowledgeStore>,
    mutator: Mutator,
    verifier: Verifier,
    classifier: Classifier,
    broadcaster: EventBroadcaster,
    running: AtomicBool,
    generation: AtomicU64,
    counters: Mutex<Counters>,
    marker: Option<RunMarker>,
}

/// Drives the generate-mutate-verify-classify-persist-broadcast pipeline
pub struct EvolutionScheduler {
    shared: Arc<SchedulerShared>,
}

impl EvolutionScheduler {
    pub fn new(
        config: EngineConfig,
        mutator_config: MutatorConfig,
        registry: Arc<Registry>,
        store: Arc<KnowledgeStore>,
        marker: Option<RunMarker>,
    ) -> Self {
        let broadcaster = EventBroadcaster::new(
            config.event_channel_capacity,
            config.event_history_capacity,
        );
        let classifier = Classifier::new(
            registry.clone(),
            config.speculative_acceptance,
            config.structure_boost,
        );
        Self {
            shared: Arc::new(SchedulerShared {
                mutator: Mutator::new(registry.clone(), mutator_config),
                verifier: Verifier::new(registry),
                classifier,
                broadcaster,
                store,
                running: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                counters: Mutex::new(Counters::default()),
                marker,
                config,
            }),
        }
    }

    /// Apply a control command and report the resulting run state
    pub fn handle(&self, command: ControlCommand) -> EngineResult<RunState> {
        match command {
            ControlCommand::Start => {
                if self.shared.running.swap(true, Ordering::SeqCst) {
                    // Already running; at most one loop may be active
                    return Ok(RunState::Running);
                }
                self.shared.set_marker(true);
                let shared = self.shared.clone();
                tokio::spawn(async move {
                    run_loop(shared).await;
                });
                info!("Evolution loop started");
                Ok(RunState::Running)
            }
            ControlCommand::Stop => {
                if self.shared.running.swap(false, Ordering::SeqCst) {
                    self.shared.set_marker(false);
                    info!("Evolution loop stopping");
                }
                Ok(RunState::Idle)
            }
            ControlCommand::Reset => {
                self.shared.store.purge()?;
                info!("Collections reset");
                Ok(self.current_state())
            }
        }
    }

    pub fn current_state(&self) -> RunState {
        if self.shared.running.load(Ordering::SeqCst) {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    /// Run one pipeline iteration synchronously. The loop uses this; tests
    /// can drive it directly for deterministic replay.
    pub fn run_tick(&self, rng: &mut dyn RngCore) -> EngineResult<Outcome> {
        self.shared.tick(rng)
    }

    pub fn broadcaster(&self) -> &EventBroadcaster {
        &self.shared.broadcaster
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.shared.store
    }

    /// Current counters combined with collection sizes
    pub fn stats(&self) -> EngineResult<EngineStats> {
        self.shared.stats()
    }
}

impl SchedulerShared {
    fn tick(&self, rng: &mut dyn RngCore) -> EngineResult<Outcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst);

        let knowledge = self.store.statements(CollectionKind::Proven)?;
        let speculative = self.store.statements(CollectionKind::Speculative)?;
        let template = self.mutator.select_template(rng, &knowledge, &speculative);
        let candidate = self.mutator.mutate(rng, &template, generation);

        if let Ok(mut counters) = self.counters.lock() {
            counters.ticks += 1;
        }

        // The ceiling keeps verification bounded; rejection is a normal
        // outcome, not an error
        if self.mutator.exceeds_ceiling(&candidate) {
            self.bump_scanned();
            self.broadcaster.emit(EngineEvent::Discovery {
                text: format!("scanning (over complexity ceiling): {}", candidate.statement),
            });
            self.maybe_emit_stats()?;
            return Ok(Outcome::Scanned);
        }

        let verdict = self.verifier.verify(&candidate.statement);
        let classification = self.classifier.classify(rng, &candidate, verdict, &self.store)?;

        // Store updates are complete; events go out with no lock held
        match classification.outcome {
            Outcome::Proven => {
                self.broadcaster.emit(EngineEvent::Proven {
                    text: format!("proved: {}", candidate.statement),
                    canonical: classification.canonical.clone().unwrap_or_default(),
                });
            }
            Outcome::Speculative => {
                self.broadcaster.emit(EngineEvent::Speculative {
                    text: format!("conjecture: {}", candidate.statement),
                    canonical: classification.canonical.clone().unwrap_or_default(),
                });
            }
            Outcome::Redundant => {
                self.bump_redundant();
                self.broadcaster.emit(EngineEvent::Discovery {
                    text: format!("already known: {}", candidate.statement),
                });
            }
            Outcome::Scanned => {
                self.bump_scanned();
                self.broadcaster.emit(EngineEvent::Discovery {
                    text: format!("scanning: {}", candidate.statement),
                });
            }
        }

        for milestone in &classification.milestones {
            self.broadcaster.emit(EngineEvent::Milestone {
                text: format!("milestone: {}", milestone.name),
                milestone: milestone.clone(),
            });
        }

        self.maybe_emit_stats()?;
        Ok(classification.outcome)
    }

    fn stats(&self) -> EngineResult<EngineStats> {
        let (ticks, redundant, scanned) = match self.counters.lock() {
            Ok(counters) => (counters.ticks, counters.redundant, counters.scanned),
            Err(_) => (0, 0, 0),
        };
        Ok(EngineStats {
            ticks,
            proven: self.store.len(CollectionKind::Proven)?,
            speculative: self.store.len(CollectionKind::Speculative)?,
            redundant,
            scanned,
        })
    }

    fn maybe_emit_stats(&self) -> EngineResult<()> {
        let due = match self.counters.lock() {
            Ok(counters) => {
                self.config.stats_interval > 0 && counters.ticks % self.config.stats_interval == 0
            }
            Err(_) => false,
        };
        if due {
            let stats = self.stats()?;
            self.broadcaster.emit(EngineEvent::Stats {
                text: format!(
                    "{} ticks, {} proven, {} speculative",
                    stats.ticks, stats.proven, stats.speculative
                ),
                stats,
            });
        }
        Ok(())
    }

    fn bump_redundant(&self) {
        if let Ok(mut counters) = self.counters.lock() {
            counters.redundant += 1;
        }
    }

    fn bump_scanned(&self) {
        if let Ok(mut counters) = self.counters.lock() {
            counters.scanned += 1;
        }
    }

    /// Keep the durable marker in step with the in-memory state; a marker
    /// write failure is logged, never fatal
    fn set_marker(&self, running: bool) {
        let Some(marker) = &self.marker else {
            return;
        };
        let result = if running { marker.set() } else { marker.clear() };
        if let Err(err) = result {
            warn!(error = %err, "Run marker update failed");
        }
    }
}

async fn run_loop(shared: Arc<SchedulerShared>) {
    let mut rng = match shared.config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    while shared.running.load(Ordering::SeqCst) {
        if let Err(err) = shared.tick(&mut rng) {
            // The loop is the availability boundary; a failed iteration is
            // logged and the next one proceeds
            warn!(error = %err, "Evolution tick failed");
        }

        let jitter = if shared.config.jitter_ms > 0 {
            rng.gen_range(0..=shared.config.jitter_ms)
        } else {
            0
        };
        sleep(shared.config.tick_interval + std::time::Duration::from_millis(jitter)).await;
    }

    info!("Evolution loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use noether_knowledge::InMemoryStore;
    use noether_types::{KnowledgeEntry, Verdict};
    use std::time::Duration;

    fn scheduler_with(config: EngineConfig, mutator_config: MutatorConfig) -> EvolutionScheduler {
        let registry = Arc::new(Registry::standard());
        let store = Arc::new(KnowledgeStore::new(Arc::new(InMemoryStore::new()), 100));
        EvolutionScheduler::new(config, mutator_config, registry, store, None)
    }

    fn fast_config(seed: u64) -> EngineConfig {
        EngineConfig {
            tick_interval: Duration::from_millis(1),
            jitter_ms: 0,
            seed: Some(seed),
            ..EngineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let scheduler = scheduler_with(fast_config(1), MutatorConfig::default());

        assert_eq!(scheduler.current_state(), RunState::Idle);
        assert_eq!(
            scheduler.handle(ControlCommand::Start).unwrap(),
            RunState::Running
        );
        assert_eq!(
            scheduler.handle(ControlCommand::Start).unwrap(),
            RunState::Running
        );
        assert_eq!(scheduler.current_state(), RunState::Running);

        assert_eq!(
            scheduler.handle(ControlCommand::Stop).unwrap(),
            RunState::Idle
        );
        assert_eq!(scheduler.current_state(), RunState::Idle);
    }

    #[tokio::test]
    async fn test_reset_clears_collections_without_changing_state() {
        let scheduler = scheduler_with(fast_config(2), MutatorConfig::default());

        scheduler
            .store()
            .insert_if_absent(
                CollectionKind::Proven,
                KnowledgeEntry {
                    canonical: "k = 0".to_string(),
                    statement: "k = 0".to_string(),
                    verdict: Verdict::Verified,
                    generation: 0,
                    lineage: None,
                },
            )
            .unwrap();

        assert_eq!(
            scheduler.handle(ControlCommand::Reset).unwrap(),
            RunState::Idle
        );
        assert_eq!(scheduler.store().len(CollectionKind::Proven).unwrap(), 0);

        // Reset while running leaves the loop running
        scheduler.handle(ControlCommand::Start).unwrap();
        assert_eq!(
            scheduler.handle(ControlCommand::Reset).unwrap(),
            RunState::Running
        );
        scheduler.handle(ControlCommand::Stop).unwrap();
    }

    #[tokio::test]
    async fn test_fixed_seed_replays_identical_outcomes() {
        let a = scheduler_with(fast_config(42), MutatorConfig::default());
        let b = scheduler_with(fast_config(42), MutatorConfig::default());

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        let outcomes_a: Vec<Outcome> = (0..50).map(|_| a.run_tick(&mut rng_a).unwrap()).collect();
        let outcomes_b: Vec<Outcome> = (0..50).map(|_| b.run_tick(&mut rng_b).unwrap()).collect();
        assert_eq!(outcomes_a, outcomes_b);
    }

    #[tokio::test]
    async fn test_ceiling_rejection_is_scanned_before_verification() {
        let tight = MutatorConfig {
            max_statement_len: 1,
            ..MutatorConfig::default()
        };
        let scheduler = scheduler_with(fast_config(3), tight);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..10 {
            assert_eq!(scheduler.run_tick(&mut rng).unwrap(), Outcome::Scanned);
        }
        // Nothing can pass the ceiling, so nothing was stored
        assert_eq!(scheduler.store().len(CollectionKind::Proven).unwrap(), 0);
        assert_eq!(
            scheduler.store().len(CollectionKind::Speculative).unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_loop_generates_and_stops() {
        let scheduler = scheduler_with(fast_config(5), MutatorConfig::default());

        scheduler.handle(ControlCommand::Start).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.handle(ControlCommand::Stop).unwrap();

        let stats = scheduler.stats().unwrap();
        assert!(stats.ticks > 0);
    }

    #[tokio::test]
    async fn test_marker_agrees_with_run_state() {
        let dir = std::env::temp_dir().join(format!("noether_sched_{}", uuid::Uuid::new_v4()));
        let marker = RunMarker::new(dir.join("engine.running"));
        let registry = Arc::new(Registry::standard());
        let store = Arc::new(KnowledgeStore::new(Arc::new(InMemoryStore::new()), 100));
        let scheduler = EvolutionScheduler::new(
            fast_config(7),
            MutatorConfig::default(),
            registry,
            store,
            Some(marker),
        );

        scheduler.handle(ControlCommand::Start).unwrap();
        assert!(RunMarker::new(dir.join("engine.running")).is_set());

        scheduler.handle(ControlCommand::Stop).unwrap();
        assert!(!RunMarker::new(dir.join("engine.running")).is_set());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_events_flow_to_subscribers() {
        let scheduler = scheduler_with(fast_config(9), MutatorConfig::default());
        let mut rx = scheduler.broadcaster().subscribe();
        let mut rng = StdRng::seed_from_u64(9);

        scheduler.run_tick(&mut rng).unwrap();

        let envelope = rx.try_recv().expect("expected at least one event");
        assert!(!envelope.event.text().is_empty());
        assert!(!scheduler.broadcaster().recent(10).is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_eventually_proves_and_speculates() {
        let scheduler = scheduler_with(fast_config(11), MutatorConfig::default());
        let mut rng = StdRng::seed_from_u64(11);

        let outcomes: Vec<Outcome> = (0..400)
            .map(|_| scheduler.run_tick(&mut rng).unwrap())
            .collect();

        assert!(outcomes.iter().any(|o| *o == Outcome::Proven));
        assert!(outcomes.iter().any(|o| *o == Outcome::Speculative));
        assert!(outcomes.iter().any(|o| *o == Outcome::Redundant));
        assert!(scheduler.store().len(CollectionKind::Proven).unwrap() > 0);
    }
}
