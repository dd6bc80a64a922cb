use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use crate::app::store::NotificationStore;
use crate::domain::user::NotificationPreference;

#[derive(Clone)]
pub struct PreferenceResolver {
    store: Arc<dyn NotificationStore>,
}

impl PreferenceResolver {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    pub async fn preference(&self, user_id: Uuid) -> Result<NotificationPreference> {
        let settings = self.store.find_user_settings(user_id).await?;
        Ok(NotificationPreference::from_settings(settings.as_ref()))
    }

    /// Only an explicit opt-out disables delivery; store errors are returned to the caller.
    pub async fn is_enabled(&self, user_id: Uuid) -> Result<bool> {
        Ok(self.preference(user_id).await?.allows_delivery())
    }
}
