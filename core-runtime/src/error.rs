//! Runtime-level errors: configuration and capability wiring.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Logging or tunable configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required bridge was not injected and no shim feature covers it.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
