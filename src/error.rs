//! Error types for pairlink.

use crate::broker::Capability;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Message-channel transport errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel closed while delivering {command}")]
    Closed { command: String },

    #[error("No response to {command}: remote end dropped the reply")]
    NoResponse { command: String },

    #[error("Malformed response to {command}: {reason}")]
    MalformedResponse { command: String, reason: String },
}

/// Broker-level errors.
///
/// `UnsupportedCapability` signals a programming defect in the caller (the
/// broker was used outside its role) and must not be caught and retried.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("{operation} requires the {capability} capability, which this broker role does not carry")]
    UnsupportedCapability {
        operation: String,
        capability: Capability,
    },

    #[error("Credential bootstrap failed: {reason}")]
    Bootstrap { reason: String },

    #[error("OAuth result completion failed: {reason}")]
    OAuthResult { reason: String },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
