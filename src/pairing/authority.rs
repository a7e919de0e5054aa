//! Authority-side pairing coordinator.
//!
//! The already-signed-in device runs one [`AuthorityBroker`] per pairing
//! attempt. It owns the session state (channel id, supplicant metadata,
//! confirmation code, key material), mediates all channel traffic, stamps
//! every outbound payload with the session's channel id, and drives the
//! heartbeat poll that detects remote-side authorization changes the channel
//! does not push.

use std::sync::{Arc, Weak};

use secrecy::SecretString;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::broker::{
    Account, BaseAuthBroker, Capability, CapabilitySet, OAuthResultOptions,
};
use crate::channel::{
    Command, HeartbeatSignal, Payload, PairingChannel, ResponseView, with_channel_id,
};
use crate::error::{BrokerError, ChannelError, Result};
use crate::notifier::{Notifier, NotifierEvent};
use crate::pairing::{AuthorityStateMachine, HeartbeatScheduler, PairingStateMachine, RemoteMetadata};
use crate::relier::Relier;

/// Collaborators handed to the coordinator at construction time.
pub struct AuthorityOptions {
    pub notifier: Notifier,
    pub relier: Relier,
    pub channel: Arc<dyn PairingChannel>,
    pub base_broker: Arc<dyn BaseAuthBroker>,
}

/// Per-attempt session state, owned exclusively by the coordinator.
#[derive(Default)]
struct PairingSession {
    remote_metadata: Option<RemoteMetadata>,
    confirmation_code: Option<String>,
    keys_jwe: Option<SecretString>,
}

/// Coordinator for the authority side of a pairing attempt.
///
/// Construction builds the pairing state machine, wiring it to the
/// coordinator (as a `Weak` handle), the notifier, and the relier. The
/// authority role's capability set carries neither
/// [`Capability::RequirePasswordToPair`] nor [`Capability::ScopedKeys`]: the
/// user is already signed in on this device, and scoped key provisioning
/// belongs to the supplicant side.
pub struct AuthorityBroker {
    channel: Arc<dyn PairingChannel>,
    notifier: Notifier,
    relier: Relier,
    base_broker: Arc<dyn BaseAuthBroker>,
    state_machine: Arc<dyn PairingStateMachine>,
    capabilities: CapabilitySet,
    scheduler: HeartbeatScheduler,
    session: Mutex<PairingSession>,
}

impl AuthorityBroker {
    /// Create a coordinator with the default [`AuthorityStateMachine`].
    ///
    /// Must be called from within a tokio runtime (the state machine starts
    /// its notifier listener task).
    pub fn new(options: AuthorityOptions) -> Arc<Self> {
        Self::with_state_machine(options, |_broker, notifier, relier| {
            AuthorityStateMachine::spawn(notifier, relier.clone()) as Arc<dyn PairingStateMachine>
        })
    }

    /// Create a coordinator with a custom state machine.
    ///
    /// `build` receives a `Weak` handle to the coordinator under
    /// construction plus the notifier and relier, mirroring the collaborator
    /// wiring of the default machine. Stand-ins only need the narrow
    /// [`PairingStateMachine`] contract.
    pub fn with_state_machine<F>(options: AuthorityOptions, build: F) -> Arc<Self>
    where
        F: FnOnce(&Weak<Self>, &Notifier, &Relier) -> Arc<dyn PairingStateMachine>,
    {
        let AuthorityOptions {
            notifier,
            relier,
            channel,
            base_broker,
        } = options;

        Arc::new_cyclic(|broker| {
            let state_machine = build(broker, &notifier, &relier);
            Self {
                channel,
                notifier,
                relier,
                base_broker,
                state_machine,
                capabilities: CapabilitySet::authority(),
                scheduler: HeartbeatScheduler::new(),
                session: Mutex::new(PairingSession::default()),
            }
        })
    }

    /// Capability set of this broker role.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Bring the pairing attempt up: bootstrap credentials through the base
    /// broker, resolve the supplicant metadata, then start the heartbeat.
    ///
    /// The steps run strictly in that order; a failure aborts the rest, so
    /// the heartbeat never starts on a partially initialized session.
    pub async fn fetch(self: &Arc<Self>) -> Result<()> {
        self.base_broker.fetch(&self.capabilities).await?;
        self.supplicant_metadata().await?;
        self.start_heartbeat();
        Ok(())
    }

    /// Resolve the supplicant's device metadata, memoized per session.
    ///
    /// The first call issues one `PAIR_REQUEST_SUPPLICANT_METADATA` request
    /// and stores both the descriptor and the confirmation code from the
    /// response; every later call returns the cached descriptor with no
    /// channel traffic. Concurrent first calls coalesce on the session lock.
    pub async fn supplicant_metadata(&self) -> Result<RemoteMetadata> {
        let mut session = self.session.lock().await;
        if let Some(metadata) = &session.remote_metadata {
            return Ok(metadata.clone());
        }

        let response = self
            .request(Command::RequestSupplicantMetadata, Payload::new())
            .await?;

        let code = ResponseView::new(&response)
            .confirmation_code()
            .ok_or_else(|| ChannelError::MalformedResponse {
                command: Command::RequestSupplicantMetadata.to_string(),
                reason: "missing confirmation_code".to_string(),
            })?
            .to_string();
        let metadata = RemoteMetadata::from_payload(&response)?;

        tracing::debug!(
            channel_id = self.relier.channel_id(),
            supplicant = %metadata,
            "supplicant metadata resolved"
        );
        session.confirmation_code = Some(code);
        session.remote_metadata = Some(metadata.clone());
        Ok(metadata)
    }

    /// Confirmation code from the metadata exchange, once resolved.
    pub async fn confirmation_code(&self) -> Option<String> {
        self.session.lock().await.confirmation_code.clone()
    }

    /// Arm the heartbeat: one poll per second until stopped.
    pub fn start_heartbeat(self: &Arc<Self>) {
        let broker = Arc::clone(self);
        self.scheduler.arm(move || {
            let broker = Arc::clone(&broker);
            async move { broker.heartbeat().await }
        });
    }

    /// Stop the heartbeat. No further poll is initiated; a poll already in
    /// flight still completes and its response is processed normally.
    pub fn stop_heartbeat(&self) {
        self.scheduler.disarm();
    }

    /// Whether the heartbeat is currently armed.
    pub fn heartbeat_armed(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// One heartbeat poll.
    ///
    /// An `err` field in the response goes to the state machine, unmodified;
    /// a `suppAuthorized` flag publishes `pair:supp:authorize`; a response
    /// with neither is an idle tick. None of the branches stop the poll
    /// loop. A failed request is logged and the tick dropped; retry policy
    /// belongs to the state machine and its consumers.
    pub async fn heartbeat(&self) {
        let response = match self.request(Command::Heartbeat, Payload::new()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    channel_id = self.relier.channel_id(),
                    error = %e,
                    "heartbeat request failed"
                );
                return;
            }
        };

        match HeartbeatSignal::from_response(&response) {
            HeartbeatSignal::Error(err) => self.state_machine.heartbeat_error(err),
            HeartbeatSignal::SupplicantAuthorized => {
                self.notifier.publish(NotifierEvent::SupplicantAuthorized);
            }
            HeartbeatSignal::Idle => {}
        }
    }

    /// The user approved the pairing request.
    ///
    /// Delivers `PAIR_AUTHORIZE` to the supplicant (payload is the channel
    /// correlation field only), then publishes `pair:auth:authorize`.
    /// Resolves once the transport acknowledges delivery.
    pub async fn after_pair_auth_allow(&self, account: &Account) -> Result<()> {
        self.send(Command::Authorize, Payload::new()).await?;
        tracing::info!(
            uid = %account.uid,
            channel_id = self.relier.channel_id(),
            "pairing authorized"
        );
        self.notifier.publish(NotifierEvent::AuthorityAuthorized);
        Ok(())
    }

    /// The user declined the pairing request. Delivers `PAIR_DECLINE`; no
    /// notifier side effect.
    pub async fn after_pair_auth_decline(&self) -> Result<()> {
        self.send(Command::Decline, Payload::new()).await?;
        Ok(())
    }

    /// Forward an OAuth redemption result to the supplicant.
    pub async fn send_oauth_result(&self, code: &str, state: &str) -> Result<()> {
        let mut payload = Payload::new();
        payload.insert("code".to_string(), code.into());
        payload.insert("state".to_string(), state.into());
        self.send(Command::Authorize, payload).await?;
        Ok(())
    }

    /// Complete the OAuth result for `account` using the supplicant's key
    /// bundle, fetched via `PAIR_REQUEST_KEYS_JWE` and memoized per session.
    pub async fn oauth_result(&self, account: &Account) -> Result<()> {
        let keys_jwe = {
            let mut session = self.session.lock().await;
            match &session.keys_jwe {
                Some(keys_jwe) => keys_jwe.clone(),
                None => {
                    let response = self
                        .request(Command::RequestKeysJwe, Payload::new())
                        .await?;
                    let keys_jwe = ResponseView::new(&response)
                        .keys_jwe()
                        .ok_or_else(|| ChannelError::MalformedResponse {
                            command: Command::RequestKeysJwe.to_string(),
                            reason: "missing keys_jwe".to_string(),
                        })?;
                    let keys_jwe = SecretString::from(keys_jwe.to_string());
                    session.keys_jwe = Some(keys_jwe.clone());
                    keys_jwe
                }
            }
        };

        self.base_broker
            .finish_oauth_result(
                account,
                OAuthResultOptions {
                    keys_jwe: Some(keys_jwe),
                },
            )
            .await?;
        Ok(())
    }

    /// Scoped key provisioning, disabled for the authority role.
    ///
    /// The authority capability set does not carry
    /// [`Capability::ScopedKeys`], so this fails unconditionally with no
    /// side effect. Reaching it means the caller used the broker outside
    /// its role; treat the error as a defect, not a condition to recover
    /// from.
    pub fn provision_scoped_keys(&self, _account: &Account) -> Result<()> {
        Err(BrokerError::UnsupportedCapability {
            operation: "provision_scoped_keys".to_string(),
            capability: Capability::ScopedKeys,
        }
        .into())
    }

    /// Issue a request-type message, with the session's channel id injected
    /// into the payload.
    pub async fn request(&self, command: Command, payload: Payload) -> Result<Payload> {
        let payload = with_channel_id(payload, self.relier.channel_id());
        let request_id = Uuid::new_v4();
        tracing::debug!(%command, %request_id, "channel request");
        let response = self.channel.request(command, payload).await?;
        tracing::debug!(%command, %request_id, "channel response");
        Ok(response)
    }

    /// Deliver a fire-and-forget message, with the session's channel id
    /// injected into the payload. Resolves on transport acknowledgment, not
    /// on any remote action.
    pub async fn send(&self, command: Command, payload: Payload) -> Result<()> {
        let payload = with_channel_id(payload, self.relier.channel_id());
        tracing::debug!(%command, "channel send");
        self.channel.send(command, payload).await?;
        Ok(())
    }
}
