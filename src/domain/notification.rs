use serde::Serialize;
use std::fmt;
use uuid::Uuid;

pub const ACTIVITY_PAYLOAD_TYPE: &str = "activity";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    Other(String),
}

impl ActivityAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Other(action) => action,
        }
    }
}

impl From<&str> for ActivityAction {
    fn from(action: &str) -> Self {
        match action {
            "create" => Self::Create,
            "update" => Self::Update,
            "delete" => Self::Delete,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mutation of a shared record, built by the mutation handler after commit.
#[derive(Debug, Clone)]
pub struct ActivityEvent {
    pub actor_id: Uuid,
    pub action: ActivityAction,
    pub subject_label: String,
    pub subject_id: Uuid,
}

/// Rendered text of an activity notification. The gateway attaches the data payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
}
