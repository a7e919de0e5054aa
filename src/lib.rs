//! pairlink: authority-side device pairing authorization.
//!
//! Coordinates the flow where an already-signed-in device (the authority)
//! approves or declines another device's (the supplicant's) request for
//! equivalent access. The two devices never share memory; everything runs
//! over an asynchronous bidirectional message channel with correlated
//! request/response and fire-and-forget delivery, plus a once-per-second
//! heartbeat poll to observe remote-side changes the channel does not push.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      AuthorityBroker                       │
//! │                                                            │
//! │  Relier ──channel id──┐                                    │
//! │  BaseAuthBroker ──────┤    ┌── HeartbeatScheduler (1 s)    │
//! │                       ▼    ▼                               │
//! │              request / send / heartbeat                    │
//! │                       │                                    │
//! │        ┌──────────────┼──────────────┐                     │
//! │        ▼              ▼              ▼                     │
//! │  PairingChannel   Notifier   PairingStateMachine           │
//! │  (to supplicant)  (UI bus)   (heartbeat errors)            │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pairlink::{
//!     Account, AuthorityBroker, AuthorityOptions, BaseAuthBroker, Notifier, Relier, duplex,
//! };
//!
//! # async fn example(base_broker: Arc<dyn BaseAuthBroker>) -> pairlink::Result<()> {
//! let (channel, _remote) = duplex(32);
//! let broker = AuthorityBroker::new(AuthorityOptions {
//!     notifier: Notifier::new(),
//!     relier: Relier::new("abc123", "client-1"),
//!     channel: Arc::new(channel),
//!     base_broker,
//! });
//!
//! broker.fetch().await?;
//! // ... user checks the confirmation code against the supplicant ...
//! broker
//!     .after_pair_auth_allow(&Account::new("uid", "user@example.com"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod broker;
pub mod channel;
pub mod error;
pub mod notifier;
pub mod pairing;
pub mod relier;

pub use broker::{Account, BaseAuthBroker, Capability, CapabilitySet, OAuthResultOptions};
pub use channel::{
    ChannelMessage, Command, DuplexChannel, HeartbeatSignal, PairingChannel, Payload,
    ResponseView, duplex, with_channel_id,
};
pub use error::{BrokerError, ChannelError, ConfigError, Error, Result};
pub use notifier::{Notifier, NotifierEvent};
pub use pairing::{
    AuthorityBroker, AuthorityOptions, AuthorityStateMachine, HEARTBEAT_CADENCE,
    HeartbeatScheduler, PairingState, PairingStateMachine, RemoteMetadata,
};
pub use relier::Relier;
