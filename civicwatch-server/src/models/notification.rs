use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The shared pool never holds more than this many records; insertion
/// prepends and truncates the tail.
pub const MAX_STORED_NOTIFICATIONS: usize = 100;

/// Display convention: callers sort newest-first and cap at this many.
pub const DISPLAY_CAP: usize = 50;

/// Writer-side locality sentinels so `all`-audience records are always
/// visible even when the writer supplied no locality.
pub const DEFAULT_STATE: &str = "Nigeria";
pub const DEFAULT_LGA: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    CommunityAlert,
    CivicAlert,
    ReportStatus,
    ChampionActivity,
    SystemNotification,
    /// Catch-all so a single unrecognized record never poisons the
    /// whole persisted list.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Who may see a notification at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetAudience {
    All,
    State,
    Lga,
    Specific,
    /// Unrecognized audiences fail closed: the record is excluded.
    #[serde(other)]
    Unknown,
}

impl Default for TargetAudience {
    fn default() -> Self {
        TargetAudience::All
    }
}

/// A notification in the shared pool.
///
/// Field names follow the persisted camelCase layout. Once written a
/// record is immutable except for `read_by` membership, which only grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalNotification {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub source: String,
    pub state: String,
    pub lga: String,
    pub timestamp: DateTime<Utc>,
    pub is_global: bool,
    pub target_audience: TargetAudience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub read_by: Vec<String>,
}

impl GlobalNotification {
    /// Audience rule applied at read time. System notifications are
    /// unconditional; everything else matches on locality (case-insensitive)
    /// or, for `specific`, on the target user id.
    pub fn visible_to(&self, state: &str, lga: &str, user_id: Option<&str>) -> bool {
        if self.notification_type == NotificationType::SystemNotification {
            return true;
        }
        match self.target_audience {
            TargetAudience::All => true,
            TargetAudience::State => self.state.eq_ignore_ascii_case(state),
            TargetAudience::Lga => {
                self.state.eq_ignore_ascii_case(state) && self.lga.eq_ignore_ascii_case(lga)
            }
            TargetAudience::Specific => match (self.user_id.as_deref(), user_id) {
                (Some(target), Some(caller)) => target == caller,
                _ => false,
            },
            TargetAudience::Unknown => false,
        }
    }

    pub fn is_read_by(&self, user_id: &str) -> bool {
        self.read_by.iter().any(|u| u == user_id)
    }
}

/// Input for `add_global`: a notification minus `id`, `timestamp` and
/// `read_by`, which the service assigns.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGlobalNotification {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub lga: Option<String>,
    #[serde(default)]
    pub target_audience: TargetAudience,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A user's locality subscription: userId -> {state, lga, subscribedAt}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub state: String,
    pub lga: String,
    pub subscribed_at: DateTime<Utc>,
}

pub type SubscriptionMap = std::collections::HashMap<String, Subscription>;

/// Fresh notification id: creation timestamp plus a random suffix.
pub fn new_notification_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::random();
    format!("ntf_{millis}_{suffix:08x}")
}
