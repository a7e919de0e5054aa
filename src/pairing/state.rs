//! Pairing lifecycle state machine.
//!
//! The coordinator depends only on the narrow [`PairingStateMachine`]
//! contract: heartbeat errors go in, nothing comes back out. The bundled
//! [`AuthorityStateMachine`] tracks the authority-side lifecycle and listens
//! on the notifier bus for the authorization events that move the flow
//! forward; retry and backoff policy deliberately stay out of this crate.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::notifier::{Notifier, NotifierEvent};
use crate::relier::Relier;

/// Authority-side pairing lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingState {
    /// Waiting for the supplicant's metadata exchange.
    AwaitingMetadata,
    /// Metadata resolved; heartbeat polling is the active signal source.
    HeartbeatActive,
    /// A heartbeat poll reported an error.
    Error,
    /// The pairing was authorized.
    Authorized,
    /// The authority declined the pairing.
    Declined,
}

impl PairingState {
    /// Authorized and declined are final; nothing transitions out of them.
    pub const fn is_terminal(self) -> bool {
        matches!(self, PairingState::Authorized | PairingState::Declined)
    }
}

/// Transition entry point the coordinator drives.
///
/// Implementations receive every heartbeat error exactly once per
/// occurrence, with the error value unmodified. What to do about it (retry,
/// backoff, terminal failure) is the implementation's policy.
pub trait PairingStateMachine: Send + Sync {
    fn heartbeat_error(&self, err: Value);
}

struct MachineInner {
    state: PairingState,
    last_error: Option<Value>,
}

/// Default authority-side state machine.
///
/// Transitions:
/// - `AwaitingMetadata -> HeartbeatActive` via [`metadata_received`]
/// - any non-terminal state `-> Error` via [`PairingStateMachine::heartbeat_error`]
/// - any non-terminal state `-> Authorized` on a `pair:supp:authorize` or
///   `pair:auth:authorize` notifier event
/// - any non-terminal state `-> Declined` via [`declined`]
///
/// [`metadata_received`]: AuthorityStateMachine::metadata_received
/// [`declined`]: AuthorityStateMachine::declined
pub struct AuthorityStateMachine {
    relier: Relier,
    inner: Mutex<MachineInner>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl AuthorityStateMachine {
    /// Create the machine and start its notifier listener task.
    pub fn spawn(notifier: &Notifier, relier: Relier) -> Arc<Self> {
        let machine = Arc::new(Self {
            relier,
            inner: Mutex::new(MachineInner {
                state: PairingState::AwaitingMetadata,
                last_error: None,
            }),
            listener: Mutex::new(None),
        });

        let handle = tokio::spawn(Self::listen(notifier.subscribe(), Arc::downgrade(&machine)));
        *machine
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
        machine
    }

    async fn listen(
        mut events: tokio::sync::broadcast::Receiver<NotifierEvent>,
        machine: Weak<Self>,
    ) {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let Some(machine) = machine.upgrade() else {
                        break;
                    };
                    machine.on_notifier_event(event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "pairing state machine lagged behind notifier");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    fn on_notifier_event(&self, event: NotifierEvent) {
        match event {
            NotifierEvent::SupplicantAuthorized | NotifierEvent::AuthorityAuthorized => {
                self.transition(PairingState::Authorized);
            }
        }
    }

    fn transition(&self, next: PairingState) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.state.is_terminal() {
            tracing::debug!(
                channel_id = self.relier.channel_id(),
                current = ?inner.state,
                refused = ?next,
                "ignoring transition out of terminal pairing state"
            );
            return;
        }
        inner.state = next;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PairingState {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state
    }

    /// Last heartbeat error value routed here, if any.
    pub fn last_error(&self) -> Option<Value> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_error
            .clone()
    }

    /// The metadata exchange resolved; heartbeat polling takes over.
    pub fn metadata_received(&self) {
        self.transition(PairingState::HeartbeatActive);
    }

    /// The authority declined the pairing.
    pub fn declined(&self) {
        self.transition(PairingState::Declined);
    }
}

impl PairingStateMachine for AuthorityStateMachine {
    fn heartbeat_error(&self, err: Value) {
        tracing::warn!(
            channel_id = self.relier.channel_id(),
            error = %err,
            "heartbeat reported an error"
        );
        {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.last_error = Some(err);
        }
        self.transition(PairingState::Error);
    }
}

impl Drop for AuthorityStateMachine {
    fn drop(&mut self) {
        if let Some(handle) = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}
