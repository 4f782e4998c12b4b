//! Error types for DrishtiNav.

use thiserror::Error;

use crate::ledger::StoreError;

/// DrishtiNav error type.
#[derive(Error, Debug)]
pub enum NavError {
    /// Invalid configuration. Fatal at construction time, never at runtime.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ledger persistence failure. Best-effort: logged by the ledger and
    /// never allowed to abort an exploration cycle.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Motor command failed to send. Surfaced to the exploration loop,
    /// which treats it as an implicit stop.
    #[error("Actuator error: {0}")]
    Actuator(String),

    /// The exploration thread could not be spawned.
    #[error("Thread spawn failed: {0}")]
    Thread(#[from] std::io::Error),

    /// An exploration run is already active.
    #[error("Exploration already running")]
    AlreadyRunning,
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
