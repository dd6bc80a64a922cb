use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A push-delivery token registered by one device of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEndpoint {
    pub user_id: Uuid,
    pub token: String,
    pub device_type: String,
    pub device_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_used_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewDeviceEndpoint {
    pub user_id: Uuid,
    pub token: String,
    pub device_type: String,
    pub device_name: Option<String>,
}
