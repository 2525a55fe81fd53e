use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::models::Game;
use crate::stats::aggregate::Participation;

/// One participant as it goes into `game_participants`.
#[derive(Debug, Clone, Copy)]
pub struct SeatRow {
    pub player_id: Uuid,
    pub deck_id: Uuid,
    pub won: bool,
}

/// A participant joined with the names the game list renders.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct ParticipantDetail {
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub username: String,
    pub deck_id: Uuid,
    pub deck_name: String,
    pub won: bool,
}

/// Insert a game and its participants in one transaction.
pub async fn insert_game(
    db: &PgPool,
    played_at: DateTime<Utc>,
    location: Option<&str>,
    seats: &[SeatRow],
) -> Result<Uuid> {
    let mut tx = db.begin().await?;

    let game_id: Uuid = sqlx::query_scalar(
        "INSERT INTO games (played_at, location) VALUES ($1, $2) RETURNING id",
    )
    .bind(played_at)
    .bind(location)
    .fetch_one(&mut *tx)
    .await
    .context("inserting game")?;

    for seat in seats {
        sqlx::query(
            "INSERT INTO game_participants (game_id, player_id, deck_id, won)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(game_id)
        .bind(seat.player_id)
        .bind(seat.deck_id)
        .bind(seat.won)
        .execute(&mut *tx)
        .await
        .context("inserting participant")?;
    }

    tx.commit().await?;
    Ok(game_id)
}

/// Replace the full participant set of an existing game (transactional).
/// Callers validate the new seating before getting here.
pub async fn reseat_game(db: &PgPool, game_id: Uuid, seats: &[SeatRow]) -> Result<()> {
    let mut tx = db.begin().await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM games WHERE id = $1)")
        .bind(game_id)
        .fetch_one(&mut *tx)
        .await
        .context("checking game exists")?;
    if !exists {
        bail!("no such game");
    }

    sqlx::query("DELETE FROM game_participants WHERE game_id = $1")
        .bind(game_id)
        .execute(&mut *tx)
        .await
        .context("clearing participants")?;

    for seat in seats {
        sqlx::query(
            "INSERT INTO game_participants (game_id, player_id, deck_id, won)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(game_id)
        .bind(seat.player_id)
        .bind(seat.deck_id)
        .bind(seat.won)
        .execute(&mut *tx)
        .await
        .context("inserting participant")?;
    }

    tx.commit().await?;
    Ok(())
}

/// Edit the game row itself; participants are untouched. Absent fields
/// keep their stored value.
pub async fn update_game(
    db: &PgPool,
    game_id: Uuid,
    played_at: Option<DateTime<Utc>>,
    location: Option<&str>,
) -> Result<()> {
    let rows = sqlx::query(
        "UPDATE games
            SET played_at = COALESCE($2, played_at),
                location  = COALESCE($3, location)
          WHERE id = $1",
    )
    .bind(game_id)
    .bind(played_at)
    .bind(location)
    .execute(db)
    .await
    .context("updating game")?
    .rows_affected();

    if rows == 0 {
        bail!("no such game");
    }
    Ok(())
}

/// Drop a game and its participants.
pub async fn delete_game(db: &PgPool, game_id: Uuid) -> Result<()> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM game_participants WHERE game_id = $1")
        .bind(game_id)
        .execute(&mut *tx)
        .await
        .context("deleting participants")?;

    let rows = sqlx::query("DELETE FROM games WHERE id = $1")
        .bind(game_id)
        .execute(&mut *tx)
        .await
        .context("deleting game")?
        .rows_affected();

    if rows == 0 {
        bail!("no such game");
    }

    tx.commit().await?;
    Ok(())
}

/// Most recent games, newest first.
pub async fn recent_games(db: &PgPool, limit: i64) -> Result<Vec<Game>> {
    sqlx::query_as::<_, Game>(
        "SELECT id, played_at, location, created_at
           FROM games
          ORDER BY played_at DESC
          LIMIT $1",
    )
    .bind(limit)
    .fetch_all(db)
    .await
    .context("listing games")
}

/// Participant rows for a batch of games, joined with display names.
pub async fn participants_for(db: &PgPool, game_ids: &[Uuid]) -> Result<Vec<ParticipantDetail>> {
    sqlx::query_as::<_, ParticipantDetail>(
        "SELECT gp.game_id, gp.player_id, p.username,
                gp.deck_id, d.name AS deck_name, gp.won
           FROM game_participants gp
           JOIN players p ON p.id = gp.player_id
           JOIN decks d   ON d.id = gp.deck_id
          WHERE gp.game_id = ANY($1)
          ORDER BY gp.game_id, p.username",
    )
    .bind(game_ids)
    .fetch_all(db)
    .await
    .context("fetching participants")
}

/// Chronological participation rows for a player, the input of the
/// player-level statistics.
pub async fn participations_by_player(db: &PgPool, player_id: Uuid) -> Result<Vec<Participation>> {
    let rows = sqlx::query_as::<_, (Uuid, bool, DateTime<Utc>)>(
        "SELECT gp.deck_id, gp.won, g.played_at
           FROM game_participants gp
           JOIN games g ON g.id = gp.game_id
          WHERE gp.player_id = $1
          ORDER BY g.played_at",
    )
    .bind(player_id)
    .fetch_all(db)
    .await
    .context("fetching player participations")?;

    Ok(rows
        .into_iter()
        .map(|(deck_id, won, played_at)| Participation {
            deck_id,
            won,
            played_at,
        })
        .collect())
}

/// Chronological participation rows for a single deck.
pub async fn participations_by_deck(db: &PgPool, deck_id: Uuid) -> Result<Vec<Participation>> {
    let rows = sqlx::query_as::<_, (Uuid, bool, DateTime<Utc>)>(
        "SELECT gp.deck_id, gp.won, g.played_at
           FROM game_participants gp
           JOIN games g ON g.id = gp.game_id
          WHERE gp.deck_id = $1
          ORDER BY g.played_at",
    )
    .bind(deck_id)
    .fetch_all(db)
    .await
    .context("fetching deck participations")?;

    Ok(rows
        .into_iter()
        .map(|(deck_id, won, played_at)| Participation {
            deck_id,
            won,
            played_at,
        })
        .collect())
}
