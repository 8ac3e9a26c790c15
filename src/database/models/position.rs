use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{BotError, Result};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub id: i64,
    pub name: String,
}

impl Position {
    /// Inserts a new position. A name that already exists yields
    /// [`BotError::DuplicateName`] and leaves the table unchanged.
    pub async fn create(pool: &sqlx::SqlitePool, name: &str) -> Result<Self> {
        let name = name.trim();

        let result = sqlx::query("INSERT OR IGNORE INTO positions (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BotError::DuplicateName(name.to_string()));
        }

        Ok(Position {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub async fn list(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Position>("SELECT id, name FROM positions ORDER BY name")
            .fetch_all(pool)
            .await
    }
}
