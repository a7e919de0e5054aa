//! Payload shape and response interpretation.
//!
//! Payloads are plain JSON objects. Every outbound payload carries a
//! `channel_id` field scoping it to one pairing session; injection is a pure
//! function over an owned map, so no caller-held payload is ever mutated
//! through a shared reference.

use serde_json::Value;

/// A protocol payload: a JSON object keyed by field name.
pub type Payload = serde_json::Map<String, Value>;

/// Correlation field injected into every outbound payload.
pub const CHANNEL_ID_FIELD: &str = "channel_id";

/// Error indicator inside a heartbeat response.
pub const ERR_FIELD: &str = "err";

/// Remote-authorization flag inside a heartbeat response.
pub const SUPP_AUTHORIZED_FIELD: &str = "suppAuthorized";

/// Human-verifiable confirmation code inside a metadata response.
pub const CONFIRMATION_CODE_FIELD: &str = "confirmation_code";

/// Encrypted key bundle inside a keys response.
pub const KEYS_JWE_FIELD: &str = "keys_jwe";

/// Return `payload` extended with the session's channel identifier.
///
/// Takes the payload by value; an existing `channel_id` field is replaced.
pub fn with_channel_id(mut payload: Payload, channel_id: &str) -> Payload {
    payload.insert(
        CHANNEL_ID_FIELD.to_string(),
        Value::String(channel_id.to_string()),
    );
    payload
}

/// Typed read access to the fields of a response payload.
#[derive(Debug, Clone, Copy)]
pub struct ResponseView<'a> {
    fields: &'a Payload,
}

impl<'a> ResponseView<'a> {
    pub fn new(fields: &'a Payload) -> Self {
        Self { fields }
    }

    /// The error indicator, if present and non-null.
    pub fn err(&self) -> Option<&'a Value> {
        self.fields.get(ERR_FIELD).filter(|v| !v.is_null())
    }

    /// Whether the remote side signaled that the supplicant is authorized.
    pub fn supp_authorized(&self) -> bool {
        self.fields
            .get(SUPP_AUTHORIZED_FIELD)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The confirmation code, if present.
    pub fn confirmation_code(&self) -> Option<&'a str> {
        self.fields.get(CONFIRMATION_CODE_FIELD).and_then(Value::as_str)
    }

    /// The encrypted key bundle, if present.
    pub fn keys_jwe(&self) -> Option<&'a str> {
        self.fields.get(KEYS_JWE_FIELD).and_then(Value::as_str)
    }
}

/// What one heartbeat response means for the coordinator.
///
/// At most one branch applies per response; an error indicator wins over the
/// authorization flag, and a response carrying neither is an idle tick.
#[derive(Debug, Clone, PartialEq)]
pub enum HeartbeatSignal {
    /// The response carried an error value, to be routed to the state
    /// machine unmodified.
    Error(Value),
    /// The remote side reported the supplicant as authorized.
    SupplicantAuthorized,
    /// Nothing to act on.
    Idle,
}

impl HeartbeatSignal {
    /// Classify a heartbeat response payload.
    pub fn from_response(response: &Payload) -> Self {
        let view = ResponseView::new(response);
        if let Some(err) = view.err() {
            HeartbeatSignal::Error(err.clone())
        } else if view.supp_authorized() {
            HeartbeatSignal::SupplicantAuthorized
        } else {
            HeartbeatSignal::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn payload_of(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_with_channel_id_on_empty_payload() {
        let payload = with_channel_id(Payload::new(), "abc123");
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[CHANNEL_ID_FIELD], json!("abc123"));
    }

    #[test]
    fn test_with_channel_id_preserves_existing_fields() {
        let payload = payload_of(json!({"code": "c", "state": "s"}));
        let stamped = with_channel_id(payload, "abc123");
        assert_eq!(stamped["code"], json!("c"));
        assert_eq!(stamped["state"], json!("s"));
        assert_eq!(stamped[CHANNEL_ID_FIELD], json!("abc123"));
    }

    #[test]
    fn test_with_channel_id_replaces_stale_value() {
        let payload = payload_of(json!({"channel_id": "old"}));
        let stamped = with_channel_id(payload, "new");
        assert_eq!(stamped[CHANNEL_ID_FIELD], json!("new"));
    }

    #[test]
    fn test_response_view_err_absent_and_null() {
        let empty = Payload::new();
        assert!(ResponseView::new(&empty).err().is_none());

        let null_err = payload_of(json!({"err": null}));
        assert!(ResponseView::new(&null_err).err().is_none());
    }

    #[test]
    fn test_response_view_err_present() {
        let response = payload_of(json!({"err": "expired"}));
        assert_eq!(
            ResponseView::new(&response).err(),
            Some(&json!("expired"))
        );
    }

    #[test]
    fn test_response_view_supp_authorized() {
        let yes = payload_of(json!({"suppAuthorized": true}));
        assert!(ResponseView::new(&yes).supp_authorized());

        let no = payload_of(json!({"suppAuthorized": false}));
        assert!(!ResponseView::new(&no).supp_authorized());

        let absent = Payload::new();
        assert!(!ResponseView::new(&absent).supp_authorized());
    }

    #[test]
    fn test_response_view_confirmation_code_and_keys() {
        let response = payload_of(json!({"confirmation_code": "7GHQ", "keys_jwe": "jwe"}));
        let view = ResponseView::new(&response);
        assert_eq!(view.confirmation_code(), Some("7GHQ"));
        assert_eq!(view.keys_jwe(), Some("jwe"));
    }

    #[test]
    fn test_heartbeat_signal_idle_on_empty_response() {
        assert_eq!(
            HeartbeatSignal::from_response(&Payload::new()),
            HeartbeatSignal::Idle
        );
    }

    #[test]
    fn test_heartbeat_signal_error_wins_over_authorization() {
        let response = payload_of(json!({"err": "boom", "suppAuthorized": true}));
        assert_eq!(
            HeartbeatSignal::from_response(&response),
            HeartbeatSignal::Error(json!("boom"))
        );
    }

    #[test]
    fn test_heartbeat_signal_supplicant_authorized() {
        let response = payload_of(json!({"suppAuthorized": true}));
        assert_eq!(
            HeartbeatSignal::from_response(&response),
            HeartbeatSignal::SupplicantAuthorized
        );
    }
}
