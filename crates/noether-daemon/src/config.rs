//! Configuration for noether-daemon

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Noether discovery engine daemon
#[derive(Clone, Debug, Parser)]
#[command(name = "noetherd", version, about)]
pub struct DaemonConfig {
    /// Listen address for the REST/SSE surface
    #[arg(long, env = "NOETHER_LISTEN", default_value = "127.0.0.1:9000")]
    pub listen: SocketAddr,

    /// Directory for snapshots and the run marker
    #[arg(long, env = "NOETHER_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Pause between evolution iterations, in milliseconds
    #[arg(long, default_value_t = 600)]
    pub tick_interval_ms: u64,

    /// Upper bound on random pause jitter, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub jitter_ms: u64,

    /// RNG seed for deterministic replay
    #[arg(long)]
    pub seed: Option<u64>,

    /// Accepted insertions between snapshots
    #[arg(long, default_value_t = 10)]
    pub snapshot_interval: usize,

    /// Resume the evolution loop if the run marker is present
    #[arg(long, default_value_t = true)]
    pub resume: bool,
}

impl DaemonConfig {
    /// Engine configuration derived from the flags
    pub fn engine_config(&self) -> noether_engine::EngineConfig {
        noether_engine::EngineConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            jitter_ms: self.jitter_ms,
            seed: self.seed,
            ..noether_engine::EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let config = DaemonConfig::parse_from(["noetherd"]);
        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.snapshot_interval, 10);
        assert!(config.resume);
    }

    #[test]
    fn test_flags_override() {
        let config = DaemonConfig::parse_from([
            "noetherd",
            "--listen",
            "0.0.0.0:10000",
            "--seed",
            "42",
            "--tick-interval-ms",
            "100",
        ]);
        assert_eq!(config.listen.port(), 10000);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.engine_config().tick_interval.as_millis(), 100);
    }
}
