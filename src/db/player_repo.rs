use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Player;

/// Fetch a single player row.
pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Player>> {
    sqlx::query_as::<_, Player>(
        "SELECT id, user_id, username, display_name, created_at
           FROM players
          WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("fetching player")
}

/// Every registered player, ordered by username.
pub async fn list(db: &PgPool) -> Result<Vec<Player>> {
    sqlx::query_as::<_, Player>(
        "SELECT id, user_id, username, display_name, created_at
           FROM players
          ORDER BY username",
    )
    .fetch_all(db)
    .await
    .context("listing players")
}
