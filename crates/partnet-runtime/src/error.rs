//! Runtime error types

use partnet_core::PartnetError;
use thiserror::Error;

/// Errors raised while loading or driving a simulation
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Partnet(#[from] PartnetError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Intent queue full")]
    IntentQueueFull,

    #[error("Intent queue closed")]
    IntentQueueClosed,

    #[error("Tracing already initialized: {0}")]
    Telemetry(String),
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
