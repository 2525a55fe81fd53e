use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Player {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A registered deck. The six boolean columns are the color-identity flags;
/// `retired` hides the deck from new game submissions without touching its
/// logged history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deck {
    pub id: Uuid,
    pub owner_id: Uuid,
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
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Game {
    pub id: Uuid,
    pub played_at: DateTime<Utc>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Join row linking a game, a player, and the deck they piloted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GameParticipant {
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub deck_id: Uuid,
    pub won: bool,
}
