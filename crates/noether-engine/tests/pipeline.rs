//! End-to-end pipeline tests against file-backed persistence

use noether_engine::{EngineConfig, EvolutionScheduler};
use noether_knowledge::{JsonFileStore, KnowledgeStore, SnapshotPersistence};
use noether_mutate::MutatorConfig;
use noether_registry::Registry;
use noether_types::{CollectionKind, ControlCommand, RunState, Verdict};
use noether_verify::Verifier;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn temp_dir(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("noether_pipeline_{}_{}", tag, uuid::Uuid::new_v4()))
}

fn file_backed_scheduler(dir: &std::path::Path, seed: u64) -> EvolutionScheduler {
    let registry = Arc::new(Registry::standard());
    let store = Arc::new(KnowledgeStore::new(Arc::new(JsonFileStore::new(dir)), 5));
    EvolutionScheduler::new(
        EngineConfig {
            tick_interval: Duration::from_millis(1),
            jitter_ms: 0,
            seed: Some(seed),
            ..EngineConfig::default()
        },
        MutatorConfig::default(),
        registry,
        store,
        None,
    )
}

#[tokio::test]
async fn every_accepted_entry_reverifies() {
    let dir = temp_dir("sound");
    let scheduler = file_backed_scheduler(&dir, 1);
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..300 {
        scheduler.run_tick(&mut rng).unwrap();
    }

    let verifier = Verifier::new(Arc::new(Registry::standard()));
    let proven = scheduler
        .store()
        .recent(CollectionKind::Proven, usize::MAX)
        .unwrap();
    assert!(!proven.is_empty(), "expected the pipeline to prove entries");
    for entry in proven {
        assert_eq!(
            verifier.verify(&entry.statement),
            Verdict::Verified,
            "stored entry failed re-verification: {}",
            entry.statement
        );
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn collections_never_hold_duplicate_canonicals() {
    let dir = temp_dir("dedup");
    let scheduler = file_backed_scheduler(&dir, 2);
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..300 {
        scheduler.run_tick(&mut rng).unwrap();
    }

    for kind in [CollectionKind::Proven, CollectionKind::Speculative] {
        let canonicals = scheduler.store().canonicals(kind).unwrap();
        let unique: HashSet<&String> = canonicals.iter().collect();
        assert_eq!(unique.len(), canonicals.len());
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn snapshot_file_matches_memory_after_interval() {
    let dir = temp_dir("snapshot");
    let scheduler = file_backed_scheduler(&dir, 3);
    let mut rng = StdRng::seed_from_u64(3);

    // Run until at least one snapshot interval (5 accepted) has passed
    let mut accepted = 0;
    for _ in 0..2000 {
        use noether_types::Outcome;
        match scheduler.run_tick(&mut rng).unwrap() {
            Outcome::Proven | Outcome::Speculative => accepted += 1,
            _ => {}
        }
        if accepted >= 10 {
            break;
        }
    }
    assert!(accepted >= 10, "pipeline accepted too few candidates");

    let persistence = JsonFileStore::new(&dir);
    let mut on_disk = persistence.load(CollectionKind::Proven).unwrap();
    let mut in_memory = scheduler.store().canonicals(CollectionKind::Proven).unwrap();
    on_disk.sort();
    in_memory.sort();
    // Disk may lag by up to one interval of insertions
    assert!(!on_disk.is_empty());
    for key in &on_disk {
        assert!(in_memory.contains(key));
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn restart_resumes_from_snapshots_and_purge_keeps_files() {
    let dir = temp_dir("restart");

    {
        let scheduler = file_backed_scheduler(&dir, 4);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..400 {
            scheduler.run_tick(&mut rng).unwrap();
        }
        scheduler.store().snapshot_now().unwrap();
        assert!(scheduler.store().len(CollectionKind::Proven).unwrap() > 0);
    }

    // New process: hydrate from the same directory
    let store = Arc::new(KnowledgeStore::new(Arc::new(JsonFileStore::new(&dir)), 5));
    let restored = store.load_from_snapshots().unwrap();
    assert!(restored > 0);

    // Purge empties memory but leaves the files for the next hydration
    store.purge().unwrap();
    assert_eq!(store.len(CollectionKind::Proven).unwrap(), 0);
    let persistence = JsonFileStore::new(&dir);
    assert!(!persistence.load(CollectionKind::Proven).unwrap().is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn control_surface_drives_state_machine() {
    let dir = temp_dir("control");
    let scheduler = file_backed_scheduler(&dir, 5);

    assert_eq!(scheduler.current_state(), RunState::Idle);
    scheduler.handle(ControlCommand::Start).unwrap();
    scheduler.handle(ControlCommand::Start).unwrap();
    assert_eq!(scheduler.current_state(), RunState::Running);

    tokio::time::sleep(Duration::from_millis(30)).await;

    scheduler.handle(ControlCommand::Reset).unwrap();
    assert_eq!(scheduler.current_state(), RunState::Running);
    assert_eq!(scheduler.store().len(CollectionKind::Proven).unwrap(), 0);

    scheduler.handle(ControlCommand::Stop).unwrap();
    assert_eq!(scheduler.current_state(), RunState::Idle);

    let _ = std::fs::remove_dir_all(&dir);
}
