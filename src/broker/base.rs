//! Base authentication broker contract.
//!
//! The authority coordinator delegates credential/session bootstrap and
//! OAuth-result completion to an implementation of [`BaseAuthBroker`]. The
//! token machinery behind it is out of scope for this crate; tests use
//! recording stand-ins.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::broker::CapabilitySet;
use crate::error::BrokerError;

/// Minimal descriptor of the signed-in account on the authority device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable account identifier.
    pub uid: String,
    /// Primary email of the account.
    pub email: String,
}

impl Account {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
        }
    }
}

/// Options handed to the base broker when completing an OAuth result.
///
/// `keys_jwe` holds the supplicant's encrypted key bundle. `SecretString`
/// keeps it out of Debug output and accidental serialization.
#[derive(Debug, Clone, Default)]
pub struct OAuthResultOptions {
    pub keys_jwe: Option<SecretString>,
}

/// Credential/session machinery the coordinator builds on.
///
/// `fetch` receives the calling role's capability set so the bootstrap can
/// negotiate what the session will be allowed to do.
#[async_trait]
pub trait BaseAuthBroker: Send + Sync {
    /// Bootstrap credentials and session state for the pairing flow.
    async fn fetch(&self, capabilities: &CapabilitySet) -> Result<(), BrokerError>;

    /// Complete an OAuth result for `account`, consuming any key material
    /// gathered from the supplicant.
    async fn finish_oauth_result(
        &self,
        account: &Account,
        options: OAuthResultOptions,
    ) -> Result<(), BrokerError>;
}
