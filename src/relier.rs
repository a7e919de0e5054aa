//! Relier configuration.
//!
//! The relier describes the party consuming the pairing flow: the session's
//! channel identifier plus the OAuth client parameters carried through the
//! flow. It is read-only after construction; the coordinator only ever
//! queries it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const ENV_CHANNEL_ID: &str = "PAIRLINK_CHANNEL_ID";
const ENV_CLIENT_ID: &str = "PAIRLINK_CLIENT_ID";
const ENV_OAUTH_STATE: &str = "PAIRLINK_OAUTH_STATE";
const ENV_OAUTH_SCOPE: &str = "PAIRLINK_OAUTH_SCOPE";

/// Read-only pairing/session parameters of the consuming party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relier {
    channel_id: String,
    client_id: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

impl Relier {
    /// Create a relier with the two required parameters.
    pub fn new(channel_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            client_id: client_id.into(),
            state: None,
            scope: None,
        }
    }

    /// Attach the OAuth `state` parameter, builder-style.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Attach the OAuth `scope` parameter, builder-style.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Build a relier from `PAIRLINK_*` environment variables.
    ///
    /// Loads a `.env` file first if one is present. `PAIRLINK_CHANNEL_ID`
    /// and `PAIRLINK_CLIENT_ID` are required; state and scope are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let channel_id = require_env(ENV_CHANNEL_ID)?;
        let client_id = require_env(ENV_CLIENT_ID)?;

        Ok(Self {
            channel_id,
            client_id,
            state: std::env::var(ENV_OAUTH_STATE).ok(),
            scope: std::env::var(ENV_OAUTH_SCOPE).ok(),
        })
    }

    /// Opaque correlation token scoping all protocol messages to one
    /// pairing session.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// OAuth client identifier of the consuming party.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// OAuth `state` parameter, if the flow carries one.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// OAuth `scope` parameter, if the flow carries one.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    let value =
        std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))?;
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(value)
}
