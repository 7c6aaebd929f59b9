use thiserror::Error;

use contentful_core::error::CoreError;
use contentful_runtime::{BridgeError, RuntimeError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("settings: {0}")]
    Settings(#[from] CoreError),

    #[error("host: {0}")]
    Bridge(#[from] BridgeError),

    #[error("form: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid fixture: {0}")]
    Fixture(String),
}
