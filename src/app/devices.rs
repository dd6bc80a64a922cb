use anyhow::{anyhow, Result};
use std::sync::Arc;
use uuid::Uuid;

use crate::app::store::NotificationStore;
use crate::domain::device::{DeviceEndpoint, NewDeviceEndpoint};
use crate::domain::user::Recipient;

/// Owns the user → push endpoint mapping and the recipient candidate listing.
#[derive(Clone)]
pub struct DeviceRegistry {
    store: Arc<dyn NotificationStore>,
}

impl DeviceRegistry {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Idempotent: registering the same (user, token) again refreshes the
    /// existing endpoint instead of adding a second one.
    pub async fn register(
        &self,
        user_id: Uuid,
        token: String,
        device_type: String,
        device_name: Option<String>,
    ) -> Result<DeviceEndpoint> {
        if token.trim().is_empty() {
            return Err(anyhow!("device token must not be empty"));
        }

        let endpoint = self
            .store
            .upsert_endpoint(NewDeviceEndpoint {
                user_id,
                token,
                device_type,
                device_name,
            })
            .await?;

        tracing::debug!(
            user_id = %user_id,
            device_type = %endpoint.device_type,
            "device endpoint registered"
        );
        Ok(endpoint)
    }

    /// Removing a token that was never registered is not an error.
    pub async fn remove(&self, user_id: Uuid, token: &str) -> Result<()> {
        let removed = self.store.delete_endpoint(user_id, token).await?;
        if !removed {
            tracing::debug!(user_id = %user_id, "device endpoint not registered, nothing removed");
        }
        Ok(())
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<DeviceEndpoint>> {
        self.store.find_endpoints_for_user(user_id).await
    }

    /// Every user other than `user_id`: the candidate recipients of its activity.
    pub async fn list_all_except(&self, user_id: Uuid) -> Result<Vec<Recipient>> {
        let mut recipients = self.store.find_users_except(user_id).await?;
        recipients.retain(|recipient| recipient.id != user_id);
        Ok(recipients)
    }
}
