use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::app::store::NotificationStore;
use crate::domain::device::{DeviceEndpoint, NewDeviceEndpoint};
use crate::domain::user::Recipient;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct PgNotificationStore {
    db: Db,
}

impl PgNotificationStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn find_user_name(&self, user_id: Uuid) -> Result<Option<String>> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(name)
    }

    async fn find_users_except(&self, user_id: Uuid) -> Result<Vec<Recipient>> {
        let rows = sqlx::query("SELECT id, name, email FROM users WHERE id <> $1")
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?;

        let recipients = rows
            .into_iter()
            .map(|row| Recipient {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
            })
            .collect();

        Ok(recipients)
    }

    async fn find_user_settings(&self, user_id: Uuid) -> Result<Option<Value>> {
        let row = sqlx::query("SELECT settings FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.and_then(|row| row.get::<Option<Value>, _>("settings")))
    }

    async fn find_endpoints_for_user(&self, user_id: Uuid) -> Result<Vec<DeviceEndpoint>> {
        let rows = sqlx::query(
            "SELECT user_id, token, device_type, device_name, created_at, last_used_at \
             FROM device_tokens \
             WHERE user_id = $1 \
             ORDER BY last_used_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(endpoint_from_row).collect())
    }

    async fn upsert_endpoint(&self, endpoint: NewDeviceEndpoint) -> Result<DeviceEndpoint> {
        let row = sqlx::query(
            "INSERT INTO device_tokens (user_id, token, device_type, device_name) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, token) \
             DO UPDATE SET last_used_at = now(), \
                           device_type = EXCLUDED.device_type, \
                           device_name = EXCLUDED.device_name \
             RETURNING user_id, token, device_type, device_name, created_at, last_used_at",
        )
        .bind(endpoint.user_id)
        .bind(endpoint.token)
        .bind(endpoint.device_type)
        .bind(endpoint.device_name)
        .fetch_one(self.db.pool())
        .await?;

        Ok(endpoint_from_row(&row))
    }

    async fn delete_endpoint(&self, user_id: Uuid, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM device_tokens WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn endpoint_from_row(row: &PgRow) -> DeviceEndpoint {
    DeviceEndpoint {
        user_id: row.get("user_id"),
        token: row.get("token"),
        device_type: row.get("device_type"),
        device_name: row.get("device_name"),
        created_at: row.get("created_at"),
        last_used_at: row.get("last_used_at"),
    }
}
