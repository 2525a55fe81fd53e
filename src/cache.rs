//! Simple in-memory warm cache for the deck catalogue.
//!
//! Loads the entire `decks` table at start-up so that game logging and the
//! stats endpoints can resolve deck ownership and names without hitting
//! Postgres on every request. Deck mutations refresh their own entry, so
//! the map stays current between restarts.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use sqlx::PgPool;
use uuid::Uuid;

/// One row from the `decks` table, trimmed to what lookups need.
#[derive(Debug, Clone)]
pub struct DeckDef {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub retired: bool,
}

/// Global map id → DeckDef.
pub static DECKS: Lazy<DashMap<Uuid, DeckDef>> = Lazy::new(DashMap::new);

/// Fetch the `decks` table and populate [`DECKS`]. Idempotent.
pub async fn warm_decks(db: &PgPool) -> anyhow::Result<()> {
    let rows = sqlx::query_as::<_, (Uuid, Uuid, String, bool)>(
        "SELECT id, owner_id, name, retired FROM decks",
    )
    .fetch_all(db)
    .await?;

    for (id, owner_id, name, retired) in rows {
        DECKS.insert(
            id,
            DeckDef {
                id,
                owner_id,
                name,
                retired,
            },
        );
    }
    Ok(())
}

/// Retrieve a cached deck definition by ID.
pub fn get_deck(id: Uuid) -> Option<DeckDef> {
    DECKS.get(&id).map(|e| e.value().clone())
}

/// Insert or replace a single entry after a deck mutation.
pub fn put_deck(def: DeckDef) {
    DECKS.insert(def.id, def);
}

/// Warm every in-memory cache we have (called once at startup).
pub async fn warm_all(db: &PgPool) {
    if let Err(e) = warm_decks(db).await {
        log::warn!("cache warm-up failed: {e:?}");
    }
}
