//! Engine configuration

use std::time::Duration;

/// Tunables for the evolution scheduler and its collaborators
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Cooperative pause between iterations
    pub tick_interval: Duration,
    /// Upper bound on the random jitter added to each pause, in
    /// milliseconds
    pub jitter_ms: u64,
    /// RNG seed; `None` seeds from entropy. A fixed seed replays the same
    /// outcome sequence.
    pub seed: Option<u64>,
    /// Base probability of retaining a failed candidate as speculative
    pub speculative_acceptance: f64,
    /// Additional acceptance probability for candidates carrying power or
    /// division structure
    pub structure_boost: f64,
    /// Emit a stats event every this many ticks
    pub stats_interval: u64,
    /// Capacity of the broadcast channel
    pub event_channel_capacity: usize,
    /// Capacity of the recent-event history ring
    pub event_history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(600),
            jitter_ms: 200,
            seed: None,
            speculative_acceptance: 0.15,
            structure_boost: 0.1,
            stats_interval: 10,
            event_channel_capacity: 1024,
            event_history_capacity: 100,
        }
    }
}
