//! Two-device pairing, authority side.
//!
//! One device is already signed in (the authority); a second device (the
//! supplicant) asks to be granted equivalent access. The authority runs an
//! [`AuthorityBroker`] that exchanges metadata with the supplicant, polls
//! for remote-side authorization changes over a heartbeat, and delivers the
//! user's allow/decline decision.
//!
//! ```text
//! fetch():  base broker fetch -> supplicant metadata -> heartbeat armed
//! tick:     PAIR_HEARTBEAT ----> err?            -> state machine
//!                           `--> suppAuthorized? -> notifier
//! allow:    PAIR_AUTHORIZE  + pair:auth:authorize
//! decline:  PAIR_DECLINE
//! ```

mod authority;
mod heartbeat;
mod metadata;
mod state;

pub use authority::{AuthorityBroker, AuthorityOptions};
pub use heartbeat::{HEARTBEAT_CADENCE, HeartbeatScheduler};
pub use metadata::RemoteMetadata;
pub use state::{AuthorityStateMachine, PairingState, PairingStateMachine};
