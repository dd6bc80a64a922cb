use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub settings: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A user who may receive an activity notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Stored notification opt-in, as found in the user's settings blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPreference {
    Enabled,
    Disabled,
    Unspecified,
}

impl NotificationPreference {
    /// Reads `settings.notifications`. Only a JSON boolean counts as an explicit
    /// choice; a missing blob, a non-object blob or any other value is unspecified.
    pub fn from_settings(settings: Option<&Value>) -> Self {
        match settings.and_then(|settings| settings.get("notifications")) {
            Some(Value::Bool(true)) => Self::Enabled,
            Some(Value::Bool(false)) => Self::Disabled,
            _ => Self::Unspecified,
        }
    }

    /// Default-allow: everything except an explicit opt-out receives notifications.
    pub fn allows_delivery(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}
