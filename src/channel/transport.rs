//! Transport seam and in-process reference adapter.
//!
//! [`PairingChannel`] is the contract the coordinator holds: correlated
//! request/response plus fire-and-forget delivery, both implicitly bound to
//! one pairing session by the transport. [`DuplexChannel`] is the in-process
//! adapter used by tests and embedders that service the remote end
//! themselves.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::channel::{Command, Payload};
use crate::error::ChannelError;

/// Bidirectional message channel between the authority and the supplicant.
///
/// Exactly one response per request; `send` resolves on transport delivery
/// only and carries no application-level response.
#[async_trait]
pub trait PairingChannel: Send + Sync {
    /// Issue a correlated request and wait for its response payload.
    async fn request(&self, command: Command, payload: Payload) -> Result<Payload, ChannelError>;

    /// Deliver a fire-and-forget message.
    async fn send(&self, command: Command, payload: Payload) -> Result<(), ChannelError>;
}

/// One message traveling from the authority end to the remote end.
#[derive(Debug)]
pub struct ChannelMessage {
    pub command: Command,
    pub payload: Payload,
    /// Reply slot for request-type messages; `None` for fire-and-forget.
    pub reply: Option<oneshot::Sender<Payload>>,
}

/// Authority end of an in-process duplex channel.
#[derive(Debug, Clone)]
pub struct DuplexChannel {
    tx: mpsc::Sender<ChannelMessage>,
}

/// Create an in-process channel pair: the authority end and the stream of
/// messages the remote end services.
pub fn duplex(capacity: usize) -> (DuplexChannel, mpsc::Receiver<ChannelMessage>) {
    let (tx, rx) = mpsc::channel(capacity);
    (DuplexChannel { tx }, rx)
}

#[async_trait]
impl PairingChannel for DuplexChannel {
    async fn request(&self, command: Command, payload: Payload) -> Result<Payload, ChannelError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ChannelMessage {
                command,
                payload,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| ChannelError::Closed {
                command: command.to_string(),
            })?;

        reply_rx.await.map_err(|_| ChannelError::NoResponse {
            command: command.to_string(),
        })
    }

    async fn send(&self, command: Command, payload: Payload) -> Result<(), ChannelError> {
        self.tx
            .send(ChannelMessage {
                command,
                payload,
                reply: None,
            })
            .await
            .map_err(|_| ChannelError::Closed {
                command: command.to_string(),
            })
    }
}
