use thiserror::Error;

use crate::domain::id::HostName;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse network snapshot JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Insufficient port openers for '{host}': {available} available, {required} required")]
    CapabilityShortfall { host: HostName, available: u32, required: u32 },

    #[error("Insufficient capacity on '{host}' for '{script}': {details}")]
    ResourceShortfall { host: HostName, script: String, details: String },

    #[error("Action '{action}' failed on '{host}'")]
    ActionFailed { host: HostName, action: String },

    #[error("Unusable sizing inputs: {0}")]
    InvalidSizing(String),

    #[error("Target '{0}' is not reachable from the origin")]
    UnreachableTarget(HostName),

    #[error("Unknown host '{0}' in network snapshot")]
    UnknownHost(HostName),
}

pub type Result<T> = std::result::Result<T, Error>;
