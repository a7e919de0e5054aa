//! Supplicant device metadata.
//!
//! The metadata response describes the device asking to pair: user-agent
//! family and OS plus a coarse location derived from the request IP. The
//! view layer shows this next to the confirmation code so the user can check
//! they are approving the device they expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::channel::{Command, Payload};
use crate::error::ChannelError;

/// Descriptor of the supplicant device, as reported over the channel.
///
/// All wire fields are optional; the supplicant sends what it knows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteMetadata {
    /// Browser or client family, e.g. "Firefox".
    #[serde(default)]
    pub family: Option<String>,
    /// Operating system name.
    #[serde(default, rename = "OS")]
    pub os: Option<String>,
    /// Device form factor, e.g. "mobile" or "desktop".
    #[serde(default, rename = "deviceType")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, rename = "ipAddress")]
    pub ip_address: Option<String>,
    /// When this side received the descriptor.
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl RemoteMetadata {
    /// Parse a metadata response payload.
    ///
    /// Unknown fields (including the confirmation code, which lives in the
    /// same response) are ignored.
    pub fn from_payload(payload: &Payload) -> Result<Self, ChannelError> {
        serde_json::from_value(serde_json::Value::Object(payload.clone())).map_err(|e| {
            ChannelError::MalformedResponse {
                command: Command::RequestSupplicantMetadata.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Coarse location line, most specific part first.
    fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.region, &self.country]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

impl std::fmt::Display for RemoteMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.family, &self.os) {
            (Some(family), Some(os)) => write!(f, "{family} on {os}")?,
            (Some(family), None) => write!(f, "{family}")?,
            (None, Some(os)) => write!(f, "{os}")?,
            (None, None) => write!(f, "Unknown device")?,
        }
        if let Some(location) = self.location() {
            write!(f, " from {location}")?;
        }
        if let Some(ip) = &self.ip_address {
            write!(f, " ({ip})")?;
        }
        Ok(())
    }
}
