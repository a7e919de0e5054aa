//! Authentication broker building blocks.
//!
//! Capability sets describe what a broker role is allowed to do, and the
//! [`BaseAuthBroker`] trait is the seam to the underlying OAuth credential
//! machinery. Token issuance itself lives behind that seam and is not
//! implemented here.

mod base;
mod capability;

pub use base::{Account, BaseAuthBroker, OAuthResultOptions};
pub use capability::{Capability, CapabilitySet};
