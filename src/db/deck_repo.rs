use anyhow::{bail, Context, Result};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::models::Deck;

/// Editable deck attributes, shared by register and update.
#[derive(Debug, Clone)]
pub struct DeckAttrs {
    pub name: String,
    pub format: String,
    pub commander: Option<String>,
    pub color_white: bool,
    pub color_blue: bool,
    pub color_black: bool,
    pub color_red: bool,
    pub color_green: bool,
    pub colorless: bool,
}

/// A deck joined with its owner's username, for the public listing.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct DeckListing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub name: String,
    pub format: String,
    pub commander: Option<String>,
    pub color_white: bool,
    pub color_blue: bool,
    pub color_black: bool,
    pub color_red: bool,
    pub color_green: bool,
    pub colorless: bool,
    pub retired: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Deck>> {
    sqlx::query_as::<_, Deck>(
        "SELECT id, owner_id, name, format, commander,
                color_white, color_blue, color_black, color_red, color_green, colorless,
                retired, created_at
           FROM decks
          WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("fetching deck")
}

pub async fn list_by_owner(db: &PgPool, owner_id: Uuid) -> Result<Vec<Deck>> {
    sqlx::query_as::<_, Deck>(
        "SELECT id, owner_id, name, format, commander,
                color_white, color_blue, color_black, color_red, color_green, colorless,
                retired, created_at
           FROM decks
          WHERE owner_id = $1
          ORDER BY created_at",
    )
    .bind(owner_id)
    .fetch_all(db)
    .await
    .context("listing decks by owner")
}

/// All decks with owner usernames, oldest first.
pub async fn list_all(db: &PgPool) -> Result<Vec<DeckListing>> {
    sqlx::query_as::<_, DeckListing>(
        "SELECT d.id, d.owner_id, p.username AS owner_username,
                d.name, d.format, d.commander,
                d.color_white, d.color_blue, d.color_black,
                d.color_red, d.color_green, d.colorless,
                d.retired, d.created_at
           FROM decks d
           JOIN players p ON p.id = d.owner_id
          ORDER BY d.created_at",
    )
    .fetch_all(db)
    .await
    .context("listing decks")
}

/// Register a new deck for `owner_id`; returns the stored row.
pub async fn insert(db: &PgPool, owner_id: Uuid, attrs: &DeckAttrs) -> Result<Deck> {
    sqlx::query_as::<_, Deck>(
        "INSERT INTO decks (owner_id, name, format, commander,
                            color_white, color_blue, color_black,
                            color_red, color_green, colorless)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING id, owner_id, name, format, commander,
                   color_white, color_blue, color_black, color_red, color_green, colorless,
                   retired, created_at",
    )
    .bind(owner_id)
    .bind(&attrs.name)
    .bind(&attrs.format)
    .bind(&attrs.commander)
    .bind(attrs.color_white)
    .bind(attrs.color_blue)
    .bind(attrs.color_black)
    .bind(attrs.color_red)
    .bind(attrs.color_green)
    .bind(attrs.colorless)
    .fetch_one(db)
    .await
    .context("inserting deck")
}

/// Overwrite a deck's editable attributes. Owner-scoped: the WHERE clause
/// guards against editing someone else's deck.
pub async fn update(db: &PgPool, deck_id: Uuid, owner_id: Uuid, attrs: &DeckAttrs) -> Result<Deck> {
    let row = sqlx::query_as::<_, Deck>(
        "UPDATE decks
            SET name = $3, format = $4, commander = $5,
                color_white = $6, color_blue = $7, color_black = $8,
                color_red = $9, color_green = $10, colorless = $11
          WHERE id = $1 AND owner_id = $2
      RETURNING id, owner_id, name, format, commander,
                color_white, color_blue, color_black, color_red, color_green, colorless,
                retired, created_at",
    )
    .bind(deck_id)
    .bind(owner_id)
    .bind(&attrs.name)
    .bind(&attrs.format)
    .bind(&attrs.commander)
    .bind(attrs.color_white)
    .bind(attrs.color_blue)
    .bind(attrs.color_black)
    .bind(attrs.color_red)
    .bind(attrs.color_green)
    .bind(attrs.colorless)
    .fetch_optional(db)
    .await
    .context("updating deck")?;

    match row {
        Some(deck) => Ok(deck),
        None => bail!("deck not found or not yours"),
    }
}

/// Flip the retired flag. Owner-scoped like [`update`].
pub async fn set_retired(db: &PgPool, deck_id: Uuid, owner_id: Uuid, retired: bool) -> Result<Deck> {
    let row = sqlx::query_as::<_, Deck>(
        "UPDATE decks
            SET retired = $3
          WHERE id = $1 AND owner_id = $2
      RETURNING id, owner_id, name, format, commander,
                color_white, color_blue, color_black, color_red, color_green, colorless,
                retired, created_at",
    )
    .bind(deck_id)
    .bind(owner_id)
    .bind(retired)
    .fetch_optional(db)
    .await
    .context("retiring deck")?;

    match row {
        Some(deck) => Ok(deck),
        None => bail!("deck not found or not yours"),
    }
}
