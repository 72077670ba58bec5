use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use civicwatch_shared::errors::{AppError, AppResult};

/// Named keys in the store.
pub mod keys {
    /// JSON-encoded notification array, capped at 100 entries.
    pub const NOTIFICATIONS: &str = "civicwatch_global_notifications";
    /// User-subscription map: userId -> {state, lga, subscribedAt}.
    pub const SUBSCRIPTIONS: &str = "civicwatch_notification_subscriptions";
}

/// Whole-value JSON key-value store backed by one file per key.
///
/// Reads absorb corruption: a missing or unparseable value loads as the
/// type's default and self-heals on the next write. Writes replace the
/// whole value via a temp file and rename.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match fs::read(self.path(key)) {
            Ok(bytes) => bytes,
            Err(_) => return T::default(),
        };
        match serde_json::from_slice(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "corrupt value in store, treating as empty");
                T::default()
            }
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| AppError::internal(format!("failed to serialize {key}: {e}")))?;
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, self.path(key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GlobalNotification, NotificationType, Priority, TargetAudience};
    use chrono::Utc;

    fn sample(id: &str) -> GlobalNotification {
        GlobalNotification {
            id: id.into(),
            notification_type: NotificationType::CivicAlert,
            title: "Budget hearing".into(),
            message: "Public hearing on the 2026 appropriation".into(),
            priority: Priority::Medium,
            source: "National Assembly".into(),
            state: "FCT".into(),
            lga: "AMAC".into(),
            timestamp: Utc::now(),
            is_global: true,
            target_audience: TargetAudience::State,
            user_id: None,
            read_by: vec!["u1".into()],
        }
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();

        let list = vec![sample("ntf_1"), sample("ntf_2")];
        store.save(keys::NOTIFICATIONS, &list).unwrap();

        let loaded: Vec<GlobalNotification> = store.load(keys::NOTIFICATIONS);
        assert_eq!(loaded, list);
    }

    #[test]
    fn missing_key_loads_default() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();

        let loaded: Vec<GlobalNotification> = store.load(keys::NOTIFICATIONS);
        assert!(loaded.is_empty());
    }

    #[test]
    fn corrupt_value_loads_empty_and_heals_on_next_write() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();

        let path = tmp.path().join(format!("{}.json", keys::NOTIFICATIONS));
        std::fs::write(&path, b"this is not json {{").unwrap();

        let loaded: Vec<GlobalNotification> = store.load(keys::NOTIFICATIONS);
        assert!(loaded.is_empty());

        store.save(keys::NOTIFICATIONS, &vec![sample("ntf_3")]).unwrap();
        let healed: Vec<GlobalNotification> = store.load(keys::NOTIFICATIONS);
        assert_eq!(healed.len(), 1);
    }
}
