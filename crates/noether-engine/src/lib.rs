//! Noether Engine - evolution scheduler, classifier, and event broadcaster
//!
//! The engine composes the discovery pipeline behind a small control
//! surface:
//!
//! - [`EvolutionScheduler`]: the Idle/Running state machine and the loop
//!   that drives mutate, verify, classify, persist, broadcast
//! - [`Classifier`]: verdict disposition and one-shot milestones
//! - [`EventBroadcaster`]: bounded fan-out of typed events
//! - [`RunMarker`]: durable flag mirroring the run state across restarts
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use noether_engine::{EngineConfig, EvolutionScheduler};
//! use noether_knowledge::{InMemoryStore, KnowledgeStore};
//! use noether_mutate::MutatorConfig;
//! use noether_registry::Registry;
//! use noether_types::ControlCommand;
//!
//! # async fn example() {
//! let registry = Arc::new(Registry::standard());
//! let store = Arc::new(KnowledgeStore::new(Arc::new(InMemoryStore::new()), 10));
//! let scheduler = EvolutionScheduler::new(
//!     EngineConfig::default(),
//!     MutatorConfig::default(),
//!     registry,
//!     store,
//!     None,
//! );
//!
//! let mut events = scheduler.broadcaster().subscribe();
//! scheduler.handle(ControlCommand::Start).unwrap();
//! // Events arrive as the loop discovers, proves, and speculates
//! # }
//! ```

#![deny(unsafe_code)]

pub mod broadcaster;
pub mod classifier;
pub mod config;
pub mod error;
pub mod marker;
pub mod scheduler;

// Re-exports
pub use broadcaster::EventBroadcaster;
pub use classifier::{Classification, Classifier};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use marker::RunMarker;
pub use scheduler::EvolutionScheduler;
