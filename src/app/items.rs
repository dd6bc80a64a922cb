use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::item::Item;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct ItemService {
    db: Db,
}

impl ItemService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Whole collection, newest first.
    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query(
            "SELECT id, title, notes, created_by, created_at, updated_at \
             FROM items ORDER BY created_at DESC, id",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    pub async fn get_item(&self, item_id: Uuid) -> Result<Option<Item>> {
        let row = sqlx::query(
            "SELECT id, title, notes, created_by, created_at, updated_at \
             FROM items WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(item_from_row))
    }

    pub async fn create_item(
        &self,
        created_by: Uuid,
        title: String,
        notes: Option<String>,
    ) -> Result<Item> {
        let row = sqlx::query(
            "INSERT INTO items (title, notes, created_by) \
             VALUES ($1, $2, $3) \
             RETURNING id, title, notes, created_by, created_at, updated_at",
        )
        .bind(title)
        .bind(notes)
        .bind(created_by)
        .fetch_one(self.db.pool())
        .await?;

        Ok(item_from_row(&row))
    }

    /// `None` fields are left as they are; `Some(None)` clears the notes.
    pub async fn update_item(
        &self,
        item_id: Uuid,
        title: Option<String>,
        notes: Option<Option<String>>,
    ) -> Result<Option<Item>> {
        let (set_notes, notes) = match notes {
            Some(notes) => (true, notes),
            None => (false, None),
        };
        let row = sqlx::query(
            "UPDATE items \
             SET title = COALESCE($2, title), \
                 notes = CASE WHEN $3 THEN $4::text ELSE notes END, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING id, title, notes, created_by, created_at, updated_at",
        )
        .bind(item_id)
        .bind(title)
        .bind(set_notes)
        .bind(notes)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(item_from_row))
    }

    /// Returns the deleted item so callers can still describe it.
    pub async fn delete_item(&self, item_id: Uuid) -> Result<Option<Item>> {
        let row = sqlx::query(
            "DELETE FROM items WHERE id = $1 \
             RETURNING id, title, notes, created_by, created_at, updated_at",
        )
        .bind(item_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(item_from_row))
    }
}

fn item_from_row(row: &PgRow) -> Item {
    Item {
        id: row.get("id"),
        title: row.get("title"),
        notes: row.get("notes"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
