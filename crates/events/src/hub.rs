//! Subscriber registry and fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use presence_core::types::Timestamp;
use tokio::sync::{mpsc, RwLock};

use crate::event::PresenceEvent;

/// A frame queued for one subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubFrame {
    /// Serialized [`PresenceEvent`], shared by every subscriber.
    Payload(Arc<str>),
    /// Keep-alive probe.
    Ping,
    /// The hub is shutting down; the subscriber should close its socket.
    Close,
}

/// A registered subscriber: its id and the receiving end of its queue.
pub struct Subscription {
    pub id: String,
    pub receiver: mpsc::UnboundedReceiver<HubFrame>,
}

struct Subscriber {
    sender: mpsc::UnboundedSender<HubFrame>,
    connected_at: Timestamp,
}

/// Live set of subscribers.
///
/// Thread-safe via interior `RwLock`; created once at startup and shared as
/// `Arc<BroadcastHub>`. Every subscriber gets an unbounded queue, so a
/// publish never waits on a slow client and events from one publisher arrive
/// in call order.
pub struct BroadcastHub {
    subscribers: RwLock<HashMap<String, Subscriber>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new subscriber under a fresh id.
    pub async fn subscribe(&self) -> Subscription {
        let id = uuid::Uuid::new_v4().to_string();
        let (sender, receiver) = mpsc::unbounded_channel();
        let subscriber = Subscriber {
            sender,
            connected_at: chrono::Utc::now(),
        };
        self.subscribers.write().await.insert(id.clone(), subscriber);
        tracing::debug!(subscriber_id = %id, "Subscriber registered");
        Subscription { id, receiver }
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub async fn unsubscribe(&self, id: &str) {
        if let Some(subscriber) = self.subscribers.write().await.remove(id) {
            let connected_secs = (chrono::Utc::now() - subscriber.connected_at).num_seconds();
            tracing::debug!(subscriber_id = %id, connected_secs, "Subscriber removed");
        }
    }

    /// Serialize `event` once and queue it for every subscriber.
    ///
    /// Subscribers whose queue is closed are skipped; they are removed by
    /// their own [`unsubscribe`](Self::unsubscribe). Returns the number of
    /// subscribers the event was queued for.
    pub async fn publish(&self, event: &PresenceEvent) -> usize {
        let payload: Arc<str> = match serde_json::to_string(event) {
            Ok(json) => json.into(),
            Err(e) => {
                tracing::error!(error = %e, kind = event.kind(), "Failed to serialize event");
                return 0;
            }
        };

        let subscribers = self.subscribers.read().await;
        let mut delivered = 0;
        for (id, subscriber) in subscribers.iter() {
            if subscriber
                .sender
                .send(HubFrame::Payload(Arc::clone(&payload)))
                .is_ok()
            {
                delivered += 1;
            } else {
                tracing::trace!(subscriber_id = %id, "Skipping closed subscriber");
            }
        }
        tracing::debug!(
            kind = event.kind(),
            employee_id = event.employee_id(),
            delivered,
            "Event published"
        );
        delivered
    }

    /// Queue a ping for every subscriber.
    pub async fn ping_all(&self) {
        let subscribers = self.subscribers.read().await;
        for subscriber in subscribers.values() {
            let _ = subscriber.sender.send(HubFrame::Ping);
        }
    }

    /// Number of registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Queue a close frame for every subscriber, then forget them all.
    pub async fn shutdown_all(&self) {
        let mut subscribers = self.subscribers.write().await;
        let count = subscribers.len();
        for subscriber in subscribers.values() {
            let _ = subscriber.sender.send(HubFrame::Close);
        }
        subscribers.clear();
        tracing::info!(count, "Closed all subscribers");
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}
