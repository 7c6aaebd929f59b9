//! The seam to the surrounding player/app-editor host.
//!
//! The form receives its host as an explicit `Arc<dyn HostBridge>`; nothing
//! looks the host up ambiently.

pub mod stdio;

use thiserror::Error;

use contentful_core::models::{ConfigUpdate, SelectedConfig};

pub use stdio::{HostLines, InboundMessage, OutboundMessage, StdioHost};

/// Called by the host when it wants the latest config, e.g. right before
/// saving. Must answer immediately from in-memory state.
pub type ConfigUpdateCallback = Box<dyn Fn() -> ConfigUpdate + Send + Sync>;

/// What the form needs from its host.
pub trait HostBridge: Send + Sync {
    /// The config the host already holds. Read once at mount; `None` on a
    /// first-ever run.
    fn current_config(&self) -> Option<SelectedConfig>;

    /// Register the callback the host pulls config through. A later
    /// registration replaces an earlier one.
    fn on_request_config_update(&self, callback: ConfigUpdateCallback);

    /// Fire-and-forget: config changed and may be pulled.
    fn emit_config_update_available(&self);
}

/// Errors from connecting to or talking with the host.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("host closed the connection before sending its config")]
    MissingHostConfig,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(String),
}
