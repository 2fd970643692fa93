//! Event types for the discovery stream
//!
//! Events provide a unified stream of pipeline activity for subscribers.

use crate::knowledge::Milestone;
use crate::state::EngineStats;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all engine events
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,

    /// Event timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// The actual event
    pub event: EngineEvent,
}

impl EventEnvelope {
    /// Wrap an event with a fresh ID and the current timestamp
    pub fn new(event: EngineEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            event,
        }
    }
}

/// Engine events
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EngineEvent {
    /// A candidate was generated and examined
    Discovery {
        text: String,
    },

    /// A candidate was verified and entered the knowledge base
    Proven {
        text: String,
        canonical: String,
    },

    /// A failed candidate was retained as a conjecture
    Speculative {
        text: String,
        canonical: String,
    },

    /// A collection crossed a size threshold
    Milestone {
        text: String,
        milestone: Milestone,
    },

    /// Periodic counter snapshot
    Stats {
        text: String,
        stats: EngineStats,
    },
}

impl EngineEvent {
    /// The human-readable payload common to every event
    pub fn text(&self) -> &str {
        match self {
            EngineEvent::Discovery { text }
            | EngineEvent::Proven { text, .. }
            | EngineEvent::Speculative { text, .. }
            | EngineEvent::Milestone { text, .. }
            | EngineEvent::Stats { text, .. } => text,
        }
    }
}
