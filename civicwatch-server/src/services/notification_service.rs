use std::sync::{Mutex, PoisonError};

use chrono::Utc;

use civicwatch_shared::errors::{AppError, AppResult, ErrorCode};

use crate::events::{EventBus, NotificationEvent};
use crate::models::{
    new_notification_id, GlobalNotification, NewGlobalNotification, Subscription,
    SubscriptionMap, DEFAULT_LGA, DEFAULT_STATE, MAX_STORED_NOTIFICATIONS,
};
use crate::store::{keys, FileStore};

/// Business rules for the shared notification pool.
///
/// Every mutation is a whole-value read-modify-write on the store,
/// serialized by an in-process mutex. Reads go straight to the store so
/// cached views never become a second source of truth.
pub struct NotificationService {
    store: FileStore,
    bus: EventBus,
    write_lock: Mutex<()>,
}

impl NotificationService {
    pub fn new(store: FileStore, bus: EventBus) -> Self {
        Self {
            store,
            bus,
            write_lock: Mutex::new(()),
        }
    }

    /// Add a record to the shared pool: assigns id and timestamp, starts
    /// `read_by` empty, prepends, truncates to the cap, persists, then
    /// fires `notification.added`. Returns the assigned id.
    pub fn add_global(&self, new: NewGlobalNotification) -> AppResult<String> {
        let record = GlobalNotification {
            id: new_notification_id(),
            notification_type: new.notification_type,
            title: new.title,
            message: new.message,
            priority: new.priority,
            source: new.source.unwrap_or_else(|| "CivicWatch".to_string()),
            state: non_empty(new.state).unwrap_or_else(|| DEFAULT_STATE.to_string()),
            lga: non_empty(new.lga).unwrap_or_else(|| DEFAULT_LGA.to_string()),
            timestamp: Utc::now(),
            is_global: true,
            target_audience: new.target_audience,
            user_id: new.user_id,
            read_by: Vec::new(),
        };

        {
            let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
            let mut list: Vec<GlobalNotification> = self.store.load(keys::NOTIFICATIONS);
            list.insert(0, record.clone());
            list.truncate(MAX_STORED_NOTIFICATIONS);
            self.store.save(keys::NOTIFICATIONS, &list)?;
        }

        tracing::debug!(
            notification_id = %record.id,
            notification_type = ?record.notification_type,
            target_audience = ?record.target_audience,
            "global notification added"
        );

        let id = record.id.clone();
        self.bus.emit(NotificationEvent::added(record));
        Ok(id)
    }

    /// Records visible to a caller in the given locality. System
    /// notifications are always included; the rest follow the audience
    /// rule on the record. No pagination here; callers sort newest-first
    /// and cap for display.
    pub fn get_for_user(
        &self,
        state: &str,
        lga: &str,
        user_id: Option<&str>,
    ) -> Vec<GlobalNotification> {
        let list: Vec<GlobalNotification> = self.store.load(keys::NOTIFICATIONS);
        list.into_iter()
            .filter(|n| n.visible_to(state, lga, user_id))
            .collect()
    }

    /// Idempotent: adds the user to `read_by` only if absent.
    pub fn mark_read(&self, id: &str, user_id: &str) -> AppResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut list: Vec<GlobalNotification> = self.store.load(keys::NOTIFICATIONS);

        let record = list
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| AppError::new(ErrorCode::NotificationNotFound, "notification not found"))?;

        if !record.is_read_by(user_id) {
            record.read_by.push(user_id.to_string());
            self.store.save(keys::NOTIFICATIONS, &list)?;
        }
        Ok(())
    }

    /// Visible records the user has not yet acknowledged.
    pub fn unread_count(&self, state: &str, lga: &str, user_id: &str) -> usize {
        self.get_for_user(state, lga, Some(user_id))
            .iter()
            .filter(|n| !n.is_read_by(user_id))
            .count()
    }

    /// Administrative wipe of the shared pool.
    pub fn clear_all(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store
            .save(keys::NOTIFICATIONS, &Vec::<GlobalNotification>::new())?;
        tracing::info!("shared notification pool cleared");
        Ok(())
    }

    /// Upsert the user's locality subscription.
    pub fn subscribe_user(&self, user_id: &str, state: &str, lga: &str) -> AppResult<Subscription> {
        let subscription = Subscription {
            state: state.to_string(),
            lga: lga.to_string(),
            subscribed_at: Utc::now(),
        };
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map: SubscriptionMap = self.store.load(keys::SUBSCRIPTIONS);
        map.insert(user_id.to_string(), subscription.clone());
        self.store.save(keys::SUBSCRIPTIONS, &map)?;
        Ok(subscription)
    }

    pub fn subscription(&self, user_id: &str) -> Option<Subscription> {
        let map: SubscriptionMap = self.store.load(keys::SUBSCRIPTIONS);
        map.get(user_id).cloned()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NotificationType, Priority, TargetAudience};

    fn service() -> (NotificationService, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        (NotificationService::new(store, EventBus::new()), tmp)
    }

    fn alert(title: &str, audience: TargetAudience, state: Option<&str>, lga: Option<&str>) -> NewGlobalNotification {
        NewGlobalNotification {
            notification_type: NotificationType::CommunityAlert,
            title: title.into(),
            message: format!("{title} details"),
            priority: Priority::Medium,
            source: None,
            state: state.map(Into::into),
            lga: lga.map(Into::into),
            target_audience: audience,
            user_id: None,
        }
    }

    #[test]
    fn pool_never_exceeds_cap_and_keeps_newest_first() {
        let (svc, tmp) = service();
        let mut last_id = String::new();
        for i in 0..101 {
            last_id = svc
                .add_global(alert(&format!("alert {i}"), TargetAudience::All, None, None))
                .unwrap();
        }

        let store = FileStore::open(tmp.path()).unwrap();
        let list: Vec<GlobalNotification> = store.load(keys::NOTIFICATIONS);
        assert_eq!(list.len(), MAX_STORED_NOTIFICATIONS);
        assert_eq!(list[0].id, last_id);
        // Oldest record ("alert 0") was evicted.
        assert_eq!(list[99].title, "alert 1");
        assert!(list.iter().all(|n| n.title != "alert 0"));
    }

    #[test]
    fn audience_filtering_matrix() {
        let (svc, _tmp) = service();
        svc.add_global(alert("ikeja only", TargetAudience::Lga, Some("Lagos"), Some("Ikeja")))
            .unwrap();

        assert_eq!(svc.get_for_user("Lagos", "Ikeja", None).len(), 1);
        assert!(svc.get_for_user("Lagos", "Surulere", None).is_empty());
        assert!(svc.get_for_user("Kano", "Dala", None).is_empty());
    }

    #[test]
    fn state_audience_ignores_lga_and_case() {
        let (svc, _tmp) = service();
        svc.add_global(alert("kano wide", TargetAudience::State, Some("Kano"), None))
            .unwrap();

        assert_eq!(svc.get_for_user("kano", "Dala", None).len(), 1);
        assert_eq!(svc.get_for_user("KANO", "Nassarawa", None).len(), 1);
        assert!(svc.get_for_user("Lagos", "Ikeja", None).is_empty());
    }

    #[test]
    fn all_audience_is_visible_everywhere() {
        let (svc, _tmp) = service();
        svc.add_global(alert("nationwide", TargetAudience::All, None, None)).unwrap();

        assert_eq!(svc.get_for_user("Lagos", "Ikeja", None).len(), 1);
        assert_eq!(svc.get_for_user("Borno", "Jere", None).len(), 1);
    }

    #[test]
    fn system_notifications_are_unconditional() {
        let (svc, _tmp) = service();
        let mut new = alert("maintenance", TargetAudience::Lga, Some("Lagos"), Some("Ikeja"));
        new.notification_type = NotificationType::SystemNotification;
        svc.add_global(new).unwrap();

        assert_eq!(svc.get_for_user("Kano", "Dala", None).len(), 1);
    }

    #[test]
    fn specific_audience_targets_a_single_user() {
        let (svc, _tmp) = service();
        let mut new = alert("your report", TargetAudience::Specific, None, None);
        new.notification_type = NotificationType::ReportStatus;
        new.user_id = Some("u1".into());
        svc.add_global(new).unwrap();

        assert_eq!(svc.get_for_user("Lagos", "Ikeja", Some("u1")).len(), 1);
        assert!(svc.get_for_user("Lagos", "Ikeja", Some("u2")).is_empty());
    }

    #[test]
    fn writer_defaults_to_sentinel_locality() {
        let (svc, _tmp) = service();
        svc.add_global(alert("no locality", TargetAudience::All, None, Some("  ")))
            .unwrap();

        let visible = svc.get_for_user("Oyo", "Ibadan North", None);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].state, DEFAULT_STATE);
        assert_eq!(visible[0].lga, DEFAULT_LGA);
    }

    #[test]
    fn mark_read_is_idempotent() {
        let (svc, _tmp) = service();
        let id = svc.add_global(alert("once", TargetAudience::All, None, None)).unwrap();

        svc.mark_read(&id, "u1").unwrap();
        svc.mark_read(&id, "u1").unwrap();

        let list = svc.get_for_user("Lagos", "Ikeja", Some("u1"));
        assert_eq!(list[0].read_by, vec!["u1".to_string()]);
    }

    #[test]
    fn mark_read_unknown_id_is_not_found() {
        let (svc, _tmp) = service();
        let err = svc.mark_read("ntf_missing", "u1").unwrap_err();
        assert!(matches!(
            err,
            AppError::Known { code: ErrorCode::NotificationNotFound, .. }
        ));
    }

    #[test]
    fn unread_count_drops_by_exactly_one_per_first_read() {
        let (svc, _tmp) = service();
        let id = svc.add_global(alert("a", TargetAudience::All, None, None)).unwrap();
        svc.add_global(alert("b", TargetAudience::All, None, None)).unwrap();

        assert_eq!(svc.unread_count("Lagos", "Ikeja", "u1"), 2);
        svc.mark_read(&id, "u1").unwrap();
        assert_eq!(svc.unread_count("Lagos", "Ikeja", "u1"), 1);
        svc.mark_read(&id, "u1").unwrap();
        assert_eq!(svc.unread_count("Lagos", "Ikeja", "u1"), 1);
    }

    #[test]
    fn add_fires_broadcast_with_the_new_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        let bus = EventBus::new();
        let svc = NotificationService::new(store, bus.clone());

        let mut rx = bus.subscribe();
        let id = svc.add_global(alert("signal", TargetAudience::All, None, None)).unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.notification.id, id);
        assert_eq!(event.name, crate::events::NOTIFICATION_ADDED);
    }

    #[test]
    fn clear_all_empties_the_pool() {
        let (svc, _tmp) = service();
        svc.add_global(alert("gone", TargetAudience::All, None, None)).unwrap();
        svc.clear_all().unwrap();
        assert!(svc.get_for_user("Lagos", "Ikeja", None).is_empty());
    }

    #[test]
    fn subscription_upsert_replaces_locality() {
        let (svc, _tmp) = service();
        svc.subscribe_user("u1", "Lagos", "Ikeja").unwrap();
        svc.subscribe_user("u1", "Kano", "Dala").unwrap();

        let sub = svc.subscription("u1").unwrap();
        assert_eq!(sub.state, "Kano");
        assert_eq!(sub.lga, "Dala");
        assert!(svc.subscription("u2").is_none());
    }
}
