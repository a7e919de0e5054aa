//! Process-wide pairing event bus.
//!
//! The coordinator publishes UI-relevant pairing events here; views and the
//! pairing state machine subscribe. Built on `tokio::sync::broadcast`, so
//! publishing with no subscribers is fine and every subscriber sees every
//! event published after it joined.

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// Default subscriber buffer size.
const DEFAULT_CAPACITY: usize = 16;

/// A pairing event published on the notifier bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierEvent {
    /// The supplicant device signaled authorization during a heartbeat poll.
    SupplicantAuthorized,
    /// The local authority confirmed the allow action.
    AuthorityAuthorized,
}

impl NotifierEvent {
    /// Wire name of the event, as consumed by view layers.
    pub const fn as_str(self) -> &'static str {
        match self {
            NotifierEvent::SupplicantAuthorized => "pair:supp:authorize",
            NotifierEvent::AuthorityAuthorized => "pair:auth:authorize",
        }
    }
}

impl std::fmt::Display for NotifierEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publish/subscribe bus for pairing events.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<NotifierEvent>,
}

impl Notifier {
    /// Create a bus with the default subscriber buffer.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus with a custom subscriber buffer size.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, event: NotifierEvent) {
        tracing::debug!(event = event.as_str(), "notifier publish");
        let _ = self.tx.send(event);
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<NotifierEvent> {
        self.tx.subscribe()
    }

    /// Subscribe as a `Stream` of events.
    pub fn stream(&self) -> BroadcastStream<NotifierEvent> {
        BroadcastStream::new(self.subscribe())
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tokio_stream::StreamExt;

    use super::*;

    #[test]
    fn test_event_wire_names() {
        assert_eq!(
            NotifierEvent::SupplicantAuthorized.as_str(),
            "pair:supp:authorize"
        );
        assert_eq!(
            NotifierEvent::AuthorityAuthorized.as_str(),
            "pair:auth:authorize"
        );
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(
            NotifierEvent::SupplicantAuthorized.to_string(),
            "pair:supp:authorize"
        );
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let notifier = Notifier::new();
        notifier.publish(NotifierEvent::AuthorityAuthorized);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.publish(NotifierEvent::SupplicantAuthorized);
        notifier.publish(NotifierEvent::AuthorityAuthorized);

        assert_eq!(rx.recv().await.unwrap(), NotifierEvent::SupplicantAuthorized);
        assert_eq!(rx.recv().await.unwrap(), NotifierEvent::AuthorityAuthorized);
    }

    #[tokio::test]
    async fn test_subscriber_misses_earlier_events() {
        let notifier = Notifier::new();
        notifier.publish(NotifierEvent::SupplicantAuthorized);

        let mut rx = notifier.subscribe();
        notifier.publish(NotifierEvent::AuthorityAuthorized);
        assert_eq!(rx.recv().await.unwrap(), NotifierEvent::AuthorityAuthorized);
    }

    #[tokio::test]
    async fn test_stream_subscription() {
        let notifier = Notifier::new();
        let mut stream = notifier.stream();

        notifier.publish(NotifierEvent::SupplicantAuthorized);
        let event = stream.next().await.unwrap().unwrap();
        assert_eq!(event, NotifierEvent::SupplicantAuthorized);
    }
}
