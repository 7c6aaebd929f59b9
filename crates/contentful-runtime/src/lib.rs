//! Config form runtime: the form state machine, its debounce timer, the
//! host bridge, and the actor that ties them together.

pub mod debounce;
pub mod form;
pub mod handle;
pub mod host;

#[cfg(test)]
mod testing;

pub use form::{Action, ConfigForm, FormView, Message};
pub use handle::FormHandle;
pub use host::{BridgeError, HostBridge, StdioHost};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config form is no longer mounted")]
    FormClosed,
    #[error("host bridge error: {0}")]
    Bridge(#[from] BridgeError),
}
