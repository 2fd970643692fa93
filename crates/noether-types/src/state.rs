//! Run state, control commands, and engine counters

use serde::{Deserialize, Serialize};

/// Whether the evolution loop is active
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// No loop running
    #[default]
    Idle,
    /// Exactly one loop running
    Running,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Running => write!(f, "running"),
        }
    }
}

/// Commands accepted by the scheduler's control surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    /// Begin the evolution loop (no-op while running)
    Start,
    /// Prevent the next iteration from starting
    Stop,
    /// Clear both collections; run state is unchanged
    Reset,
}

impl std::str::FromStr for ControlCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(ControlCommand::Start),
            "stop" => Ok(ControlCommand::Stop),
            "reset" => Ok(ControlCommand::Reset),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

/// Counters reported on the stats event and the status surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Scheduler ticks processed since process start
    pub ticks: u64,
    /// Entries currently in the knowledge base
    pub proven: usize,
    /// Entries currently in the speculative set
    pub speculative: usize,
    /// Candidates rejected as already known
    pub redundant: u64,
    /// Candidates examined and discarded
    pub scanned: u64,
}
