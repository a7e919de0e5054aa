//! Broker capability sets.
//!
//! A broker role carries a fixed set of capabilities decided at construction
//! time. Role-restricted operations consult the set through a generic entry
//! point and fail with an unsupported-operation error when the capability is
//! absent, instead of relying on overridden methods that throw.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A single capability a broker role may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May provision scoped key material during token exchange.
    ScopedKeys,
    /// Requires the user to re-enter their password before pairing.
    RequirePasswordToPair,
    /// May approve or decline pairing requests from a supplicant device.
    PairAuthorization,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::ScopedKeys => write!(f, "scoped_keys"),
            Capability::RequirePasswordToPair => write!(f, "require_password_to_pair"),
            Capability::PairAuthorization => write!(f, "pair_authorization"),
        }
    }
}

/// An immutable-after-construction set of broker capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(HashSet<Capability>);

impl CapabilitySet {
    /// Create an empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capability, builder-style.
    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    /// Whether the set carries the given capability.
    pub fn has(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Iterate over the carried capabilities in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// The capability set of the authority pairing role.
    ///
    /// The authority device is already signed in, so pairing never requires
    /// password entry, and scoped key provisioning belongs to the supplicant
    /// side of the exchange. Neither capability is carried here.
    pub fn authority() -> Self {
        Self::new().with(Capability::PairAuthorization)
    }
}
