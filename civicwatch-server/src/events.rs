//! In-process event bus.
//!
//! Every write to the shared notification pool is announced as a
//! `NotificationEvent` on a single `tokio::sync::broadcast` channel.
//! Consumers (the SSE stream, reactive feeds, the startup logger task)
//! subscribe independently; there is no replay buffer, so a subscriber
//! only sees events published after it subscribed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::GlobalNotification;

/// Event name carried in envelopes and SSE `event:` fields.
pub const NOTIFICATION_ADDED: &str = "notification.added";

/// Envelope published after a successful `add_global`, carrying the new
/// record as payload.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub id: String,
    #[serde(rename = "event")]
    pub name: &'static str,
    pub created_at: DateTime<Utc>,
    pub notification: GlobalNotification,
}

impl NotificationEvent {
    pub fn added(notification: GlobalNotification) -> Self {
        Self {
            id: format!("evt_{}", uuid::Uuid::new_v4()),
            name: NOTIFICATION_ADDED,
            created_at: Utc::now(),
            notification,
        }
    }
}

/// Broadcast-based fan-out channel. Cheap to clone (interior `Arc`).
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<NotificationEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(cap: usize) -> Self {
        let (tx, _) = broadcast::channel(cap);
        Self { tx }
    }

    /// Publish an event. Returns the number of active subscribers that
    /// will receive it. Zero subscribers is normal, not an error.
    pub fn emit(&self, event: NotificationEvent) -> usize {
        debug!(event = event.name, event_id = %event.id, "event emitted");
        self.tx.send(event).unwrap_or(0)
    }

    /// Obtain a new receiver. Each receiver gets an independent copy of
    /// every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Background task that traces every event on the bus.
pub async fn log_events(bus: EventBus) {
    let mut rx = bus.subscribe();
    loop {
        match rx.recv().await {
            Ok(event) => {
                tracing::info!(
                    event = event.name,
                    notification_id = %event.notification.id,
                    notification_type = ?event.notification.notification_type,
                    state = %event.notification.state,
                    lga = %event.notification.lga,
                    "notification added to shared pool"
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event logger lagged behind the bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewGlobalNotification, NotificationType, Priority, TargetAudience};

    fn sample() -> GlobalNotification {
        let new = NewGlobalNotification {
            notification_type: NotificationType::CommunityAlert,
            title: "Water outage".into(),
            message: "Mains maintenance in Dala".into(),
            priority: Priority::Urgent,
            source: None,
            state: Some("Kano".into()),
            lga: Some("Dala".into()),
            target_audience: TargetAudience::Lga,
            user_id: None,
        };
        GlobalNotification {
            id: crate::models::new_notification_id(),
            notification_type: new.notification_type,
            title: new.title,
            message: new.message,
            priority: new.priority,
            source: "test".into(),
            state: new.state.unwrap(),
            lga: new.lga.unwrap(),
            timestamp: Utc::now(),
            is_global: true,
            target_audience: new.target_audience,
            user_id: None,
            read_by: vec![],
        }
    }

    #[test]
    fn envelope_carries_record_and_name() {
        let event = NotificationEvent::added(sample());
        assert!(event.id.starts_with("evt_"));
        assert_eq!(event.name, NOTIFICATION_ADDED);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"notification.added\""));
        assert!(json.contains("\"targetAudience\":\"lga\""));
    }

    #[tokio::test]
    async fn bus_fans_out_to_every_subscriber() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let n = bus.emit(NotificationEvent::added(sample()));
        assert_eq!(n, 2);

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1.id, e2.id);
    }

    #[test]
    fn late_subscribers_get_no_replay() {
        let bus = EventBus::new();
        bus.emit(NotificationEvent::added(sample()));

        let mut rx = bus.subscribe();
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn each_write_fires_its_own_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.emit(NotificationEvent::added(sample()));
        bus.emit(NotificationEvent::added(sample()));

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_ne!(first.id, second.id);
    }
}
