use anyhow::Result;
use serde_json::Value;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::user::User;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct UserService {
    db: Db,
}

impl UserService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, name, settings, created_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        let user = row.map(|row| User {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            settings: row.get::<Option<Value>, _>("settings").unwrap_or(Value::Null),
            created_at: row.get("created_at"),
        });

        Ok(user)
    }

    /// Replaces the whole settings blob, including the `notifications` flag.
    pub async fn update_settings(&self, user_id: Uuid, settings: Value) -> Result<Option<Value>> {
        let row = sqlx::query(
            "UPDATE users \
             SET settings = $1, updated_at = now() \
             WHERE id = $2 \
             RETURNING settings",
        )
        .bind(settings)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| row.get::<Option<Value>, _>("settings").unwrap_or(Value::Null)))
    }
}
