//! Reactive notification feed.
//!
//! An in-memory cached view of the shared pool for one viewer. The feed
//! subscribes to the event bus; on every broadcast it re-queries the
//! service and replaces its cached list wholesale rather than patching it
//! incrementally, so the store stays the single source of truth.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;

use crate::events::NotificationEvent;
use crate::models::{GlobalNotification, DISPLAY_CAP};
use crate::services::NotificationService;

/// The locality and identity a feed is filtered for.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub state: String,
    pub lga: String,
    pub user_id: Option<String>,
}

pub struct NotificationFeed {
    service: Arc<NotificationService>,
    viewer: Viewer,
    items: RwLock<Vec<GlobalNotification>>,
    loaded: AtomicBool,
}

impl NotificationFeed {
    pub fn new(service: Arc<NotificationService>, viewer: Viewer) -> Self {
        Self {
            service,
            viewer,
            items: RwLock::new(Vec::new()),
            loaded: AtomicBool::new(false),
        }
    }

    /// Initial load: query the service and cache the display view
    /// (newest-first, capped).
    pub fn load(&self) {
        self.refresh();
        self.loaded.store(true, Ordering::Release);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Re-query the service and replace the cached list.
    pub fn refresh(&self) {
        let mut visible = self.service.get_for_user(
            &self.viewer.state,
            &self.viewer.lga,
            self.viewer.user_id.as_deref(),
        );
        visible.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        visible.truncate(DISPLAY_CAP);
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = visible;
    }

    pub fn snapshot(&self) -> Vec<GlobalNotification> {
        self.items.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Cached records the viewer has not acknowledged.
    pub fn unread(&self) -> usize {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        match self.viewer.user_id.as_deref() {
            Some(user_id) => items.iter().filter(|n| !n.is_read_by(user_id)).count(),
            None => items.len(),
        }
    }

    /// Consume bus events until the channel closes, refreshing the cache
    /// on each one. Lagging is tolerated: the next refresh re-reads the
    /// whole store anyway.
    pub async fn run(self: Arc<Self>, mut rx: broadcast::Receiver<NotificationEvent>) {
        loop {
            match rx.recv().await {
                Ok(_) => self.refresh(),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "feed lagged behind the bus, refreshing");
                    self.refresh();
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::models::{NewGlobalNotification, NotificationType, Priority, TargetAudience};
    use crate::store::FileStore;
    use std::time::Duration;

    fn setup() -> (Arc<NotificationService>, EventBus, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        let bus = EventBus::new();
        (Arc::new(NotificationService::new(store, bus.clone())), bus, tmp)
    }

    fn alert(title: &str) -> NewGlobalNotification {
        NewGlobalNotification {
            notification_type: NotificationType::CivicAlert,
            title: title.into(),
            message: "details".into(),
            priority: Priority::Medium,
            source: None,
            state: None,
            lga: None,
            target_audience: TargetAudience::All,
            user_id: None,
        }
    }

    fn viewer() -> Viewer {
        Viewer { state: "Lagos".into(), lga: "Ikeja".into(), user_id: Some("u1".into()) }
    }

    #[test]
    fn load_takes_a_snapshot_and_sets_the_flag() {
        let (svc, _bus, _tmp) = setup();
        svc.add_global(alert("before")).unwrap();

        let feed = NotificationFeed::new(svc, viewer());
        assert!(!feed.is_loaded());
        feed.load();
        assert!(feed.is_loaded());
        assert_eq!(feed.snapshot().len(), 1);
        assert_eq!(feed.unread(), 1);
    }

    #[test]
    fn snapshot_is_stale_until_refreshed() {
        let (svc, _bus, _tmp) = setup();
        let feed = NotificationFeed::new(svc.clone(), viewer());
        feed.load();
        assert!(feed.snapshot().is_empty());

        svc.add_global(alert("after")).unwrap();
        assert!(feed.snapshot().is_empty());

        feed.refresh();
        assert_eq!(feed.snapshot().len(), 1);
    }

    #[test]
    fn unread_reflects_read_receipts() {
        let (svc, _bus, _tmp) = setup();
        let id = svc.add_global(alert("a")).unwrap();
        svc.add_global(alert("b")).unwrap();

        let feed = NotificationFeed::new(svc.clone(), viewer());
        feed.load();
        assert_eq!(feed.unread(), 2);

        svc.mark_read(&id, "u1").unwrap();
        feed.refresh();
        assert_eq!(feed.unread(), 1);
    }

    #[tokio::test]
    async fn run_refreshes_on_each_broadcast() {
        let (svc, bus, _tmp) = setup();
        let feed = Arc::new(NotificationFeed::new(svc.clone(), viewer()));
        feed.load();

        let handle = tokio::spawn(Arc::clone(&feed).run(bus.subscribe()));

        svc.add_global(alert("live")).unwrap();

        // Give the feed task a moment to observe the broadcast.
        let mut seen = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if feed.snapshot().len() == 1 {
                seen = true;
                break;
            }
        }
        assert!(seen, "feed did not refresh after broadcast");
        handle.abort();
    }
}
