//! Durable run marker
//!
//! A flag file whose presence mirrors the in-memory run state. The marker
//! is toggled inside the same control transition that flips the state, and
//! consulted at boot to resume a run that was active when the process died.

use crate::error::EngineResult;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Flag file mirroring the run state
pub struct RunMarker {
    path: PathBuf,
}

impl RunMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the marker file
    pub fn set(&self) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, b"running\n")?;
        debug!(path = %self.path.display(), "Run marker set");
        Ok(())
    }

    /// Remove the marker file; absent is not an error
    pub fn clear(&self) -> EngineResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Run marker cleared");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Whether the marker is present
    pub fn is_set(&self) -> bool {
        self.path.exists()
    }
}
