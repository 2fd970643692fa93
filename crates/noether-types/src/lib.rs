//! Noether Types - shared data model for the discovery engine
//!
//! Noether continuously mutates seed identities into candidate statements,
//! verifies each candidate algebraically and dimensionally, and accumulates
//! the survivors into a deduplicated knowledge base.
//!
//! ## Key Concepts
//!
//! - **Candidate**: a generated statement plus its provenance (template,
//!   applied rules, stacking depth, generation counter)
//! - **Verdict**: the verifier's judgement of a candidate
//! - **Outcome**: the classifier's disposition of a verdict
//! - **KnowledgeEntry**: an accepted statement keyed by canonical form
//! - **Events**: the unified observability stream for subscribers

#![deny(unsafe_code)]

pub mod candidate;
pub mod dimension;
pub mod events;
pub mod knowledge;
pub mod state;

// Re-export main types
pub use candidate::{Candidate, Lineage, Outcome, Verdict};
pub use dimension::DimensionVector;
pub use events::{EngineEvent, EventEnvelope};
pub use knowledge::{CollectionKind, KnowledgeEntry, Milestone};
pub use state::{ControlCommand, EngineStats, RunState};
