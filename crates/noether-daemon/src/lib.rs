//! Noether Daemon - REST and SSE surface over the discovery engine
//!
//! Exposes the engine's control surface (`/control`), status snapshot
//! (`/status`), live event stream (`/events/stream`), and plain-text
//! collection export (`/export/:collection`). The daemon owns process
//! wiring only; all pipeline behavior lives in the engine crates.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use config::DaemonConfig;
pub use error::{ApiError, ApiResult};
pub use router::create_router;
pub use state::AppState;
