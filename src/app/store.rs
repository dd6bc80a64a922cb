use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::device::{DeviceEndpoint, NewDeviceEndpoint};
use crate::domain::user::Recipient;

/// Queries the notification core needs from the relational store.
///
/// The production implementation is [`crate::infra::notification_store::PgNotificationStore`];
/// tests substitute an in-memory store.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Display name of a user, `None` when the user does not exist.
    async fn find_user_name(&self, user_id: Uuid) -> Result<Option<String>>;

    /// Every user except `user_id`.
    async fn find_users_except(&self, user_id: Uuid) -> Result<Vec<Recipient>>;

    /// Raw settings blob. `None` when the user or the blob is missing.
    async fn find_user_settings(&self, user_id: Uuid) -> Result<Option<Value>>;

    /// Endpoints of one user, most recently used first.
    async fn find_endpoints_for_user(&self, user_id: Uuid) -> Result<Vec<DeviceEndpoint>>;

    /// Insert, or refresh `last_used_at`, `device_type` and `device_name` on (user_id, token) conflict.
    async fn upsert_endpoint(&self, endpoint: NewDeviceEndpoint) -> Result<DeviceEndpoint>;

    /// Returns whether a row was deleted.
    async fn delete_endpoint(&self, user_id: Uuid, token: &str) -> Result<bool>;
}
