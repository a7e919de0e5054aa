//! Protocol message channel.
//!
//! Everything between the authority coordinator and the supplicant travels
//! through here: the command set, the payload shape with its injected
//! `channel_id` correlation field, and the transport seam with an in-process
//! reference adapter.
//!
//! ```text
//! AuthorityBroker --request/send--> PairingChannel --transport--> supplicant
//!                                        |
//!                              DuplexChannel (in-process,
//!                              mpsc + oneshot reply slots)
//! ```

mod command;
mod payload;
mod transport;

pub use command::Command;
pub use payload::{
    CHANNEL_ID_FIELD, CONFIRMATION_CODE_FIELD, ERR_FIELD, HeartbeatSignal, KEYS_JWE_FIELD,
    Payload, ResponseView, SUPP_AUTHORIZED_FIELD, with_channel_id,
};
pub use transport::{ChannelMessage, DuplexChannel, PairingChannel, duplex};
