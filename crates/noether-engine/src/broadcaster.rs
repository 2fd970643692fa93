//! Event fan-out to subscribers
//!
//! The broadcaster pushes every event into a `tokio::sync::broadcast`
//! channel and a bounded history ring. `emit` is fire-and-forget: send
//! errors (no subscribers) are ignored, and a subscriber that lags simply
//! loses the oldest events it has not read. Late joiners read the history
//! ring instead of replaying a backlog.

use noether_types::{EngineEvent, EventEnvelope};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Fans engine events out to any number of subscribers with bounded memory
pub struct EventBroadcaster {
    tx: broadcast::Sender<EventEnvelope>,
    history: Arc<Mutex<VecDeque<EventEnvelope>>>,
    history_capacity: usize,
}

impl EventBroadcaster {
    /// Create a broadcaster with the given channel and history capacities
    pub fn new(channel_capacity: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            tx,
            history: Arc::new(Mutex::new(VecDeque::with_capacity(
                history_capacity.max(1),
            ))),
            history_capacity: history_capacity.max(1),
        }
    }

    /// Wrap and publish an event; returns the envelope that was sent
    pub fn emit(&self, event: EngineEvent) -> EventEnvelope {
        let envelope = EventEnvelope::new(event);

        if let Ok(mut history) = self.history.lock() {
            if history.len() == self.history_capacity {
                history.pop_front();
            }
            history.push_back(envelope.clone());
        }

        // No subscribers is fine
        let _ = self.tx.send(envelope.clone());
        envelope
    }

    /// Subscribe to the live stream
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    /// The most recent events, oldest first, bounded by the history
    /// capacity
    pub fn recent(&self, n: usize) -> Vec<EventEnvelope> {
        match self.history.lock() {
            Ok(history) => {
                let start = history.len().saturating_sub(n);
                history.iter().skip(start).cloned().collect()
            }
            Err(_) => Vec::new(),
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Clone for EventBroadcaster {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            history: self.history.clone(),
            history_capacity: self.history_capacity,
        }
    }
}
