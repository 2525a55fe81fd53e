// src/http/stats.rs
//! Derived statistics endpoints. Handlers fetch participation rows, hand
//! them to `stats::aggregate`, and serialize the result; the leaderboard
//! additionally goes through a short-lived Redis cache.

use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use redis::{AsyncCommands, Client as RedisClient};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache;
use crate::config::settings;
use crate::db::models::Deck;
use crate::db::{deck_repo, game_repo};
use crate::stats::aggregate::{self, DeckPlays, Participation};

//////////////////////////////////////////////////
// Data transfer objects
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct LeaderboardParams {
    /// Maximum number of entries to return.
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct LeaderboardRow {
    pub player_id: Uuid,
    pub username: String,
    pub games: i64,
    pub wins: i64,
    pub win_rate: u32,
}

#[derive(Serialize)]
pub struct DeckCount {
    pub deck_id: Uuid,
    pub name: String,
    pub plays: usize,
}

#[derive(Serialize)]
pub struct PlayerStats {
    pub player_id: Uuid,
    pub games: usize,
    pub wins: usize,
    pub win_rate: u32,
    pub favorite_decks: Vec<DeckCount>,
}

#[derive(Serialize)]
pub struct DeckStats {
    pub deck_id: Uuid,
    pub name: String,
    pub plays: usize,
    pub wins: usize,
    pub win_rate: u32,
    pub last_played: Option<DateTime<Utc>>,
    pub inactive: bool,
}

#[derive(Serialize)]
pub struct DeckOverview {
    pub decks: Vec<DeckStats>,
    pub most_played: Vec<DeckCount>,
    pub least_played: Vec<DeckCount>,
}

//////////////////////////////////////////////////
// Helpers
//////////////////////////////////////////////////

async fn deck_name(db: &PgPool, id: Uuid) -> String {
    if let Some(def) = cache::get_deck(id) {
        return def.name;
    }
    match deck_repo::get(db, id).await {
        Ok(Some(d)) => d.name,
        _ => id.to_string(),
    }
}

async fn named_counts(db: &PgPool, counts: Vec<DeckPlays>) -> Vec<DeckCount> {
    let mut out = Vec::with_capacity(counts.len());
    for c in counts {
        out.push(DeckCount {
            deck_id: c.deck_id,
            name: deck_name(db, c.deck_id).await,
            plays: c.plays,
        });
    }
    out
}

fn deck_stats_from(d: &Deck, parts: &[Participation]) -> DeckStats {
    let wins = parts.iter().filter(|p| p.won).count();
    let last = aggregate::last_played(parts);
    DeckStats {
        deck_id: d.id,
        name: d.name.clone(),
        plays: parts.len(),
        wins,
        win_rate: aggregate::win_rate(wins, parts.len()),
        last_played: last,
        inactive: aggregate::is_inactive(last, Utc::now(), settings().inactive_after_days),
    }
}

/// One stats row per deck, fetched with a parallel per-deck fan-out.
async fn stats_for_decks(db: &PgPool, decks: &[Deck]) -> anyhow::Result<Vec<DeckStats>> {
    let fetches = decks
        .iter()
        .map(|d| game_repo::participations_by_deck(db, d.id));

    let mut rows = Vec::with_capacity(decks.len());
    for (d, parts) in decks.iter().zip(join_all(fetches).await) {
        rows.push(deck_stats_from(d, &parts?));
    }
    Ok(rows)
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/stats/leaderboard
#[get("/stats/leaderboard")]
pub async fn leaderboard(
    db: web::Data<PgPool>,
    redis: web::Data<RedisClient>,
    web::Query(params): web::Query<LeaderboardParams>,
) -> impl Responder {
    let limit = params.limit.unwrap_or(settings().leaderboard_limit);

    // 1) Try to read from Redis cache
    let key = format!("leaderboard:{limit}");
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(c) => c,
        Err(_) => return HttpResponse::InternalServerError().body("Redis unavailable"),
    };
    if let Ok(cached) = conn.get::<_, String>(&key).await {
        return HttpResponse::Ok()
            .content_type("application/json")
            .body(cached);
    }

    // 2) Query per-player totals
    let rows: Vec<(Uuid, String, i64, i64)> = match sqlx::query_as::<_, (Uuid, String, i64, i64)>(
        r#"
        SELECT p.id, p.username,
               COUNT(gp.game_id)                  AS games,
               COUNT(*) FILTER (WHERE gp.won)     AS wins
          FROM players p
          LEFT JOIN game_participants gp ON gp.player_id = p.id
         GROUP BY p.id
         ORDER BY p.created_at
        "#,
    )
    .fetch_all(db.get_ref())
    .await
    {
        Ok(r) => r,
        Err(_) => return HttpResponse::InternalServerError().body("DB error"),
    };

    // 3) Win rates in Rust, best first; the ORDER BY above keeps ties
    //    stable on registration age.
    let mut board: Vec<LeaderboardRow> = rows
        .into_iter()
        .map(|(player_id, username, games, wins)| LeaderboardRow {
            player_id,
            username,
            games,
            wins,
            win_rate: aggregate::win_rate(wins as usize, games as usize),
        })
        .collect();
    board.sort_by(|a, b| b.win_rate.cmp(&a.win_rate));
    board.truncate(limit.max(0) as usize);

    // 4) Serialize and cache the result
    let body = match serde_json::to_string(&board) {
        Ok(b) => b,
        Err(_) => return HttpResponse::InternalServerError().body("Serialization error"),
    };
    let _: () = conn
        .set_ex(&key, &body, settings().stats_cache_ttl)
        .await
        .unwrap_or(());

    HttpResponse::Ok().json(board)
}

/// GET /api/stats/player/{player_id}
#[get("/stats/player/{player_id}")]
pub async fn player(path: web::Path<Uuid>, db: web::Data<PgPool>) -> impl Responder {
    let pid = path.into_inner();

    let parts = match game_repo::participations_by_player(db.get_ref(), pid).await {
        Ok(p) => p,
        Err(_) => return HttpResponse::InternalServerError().body("DB error"),
    };

    let wins = parts.iter().filter(|p| p.won).count();
    let favorites = named_counts(db.get_ref(), aggregate::most_played(&parts, 3)).await;

    HttpResponse::Ok().json(PlayerStats {
        player_id: pid,
        games: parts.len(),
        wins,
        win_rate: aggregate::win_rate(wins, parts.len()),
        favorite_decks: favorites,
    })
}

/// GET /api/stats/deck/{deck_id}
#[get("/stats/deck/{deck_id}")]
pub async fn deck(path: web::Path<Uuid>, db: web::Data<PgPool>) -> impl Responder {
    let did = path.into_inner();

    let deck = match deck_repo::get(db.get_ref(), did).await {
        Ok(Some(d)) => d,
        Ok(None) => return HttpResponse::NotFound().body("no such deck"),
        Err(_) => return HttpResponse::InternalServerError().body("DB error"),
    };

    match game_repo::participations_by_deck(db.get_ref(), did).await {
        Ok(parts) => HttpResponse::Ok().json(deck_stats_from(&deck, &parts)),
        Err(_) => HttpResponse::InternalServerError().body("DB error"),
    }
}

/// GET /api/stats/decks/{player_id}
#[get("/stats/decks/{player_id}")]
pub async fn decks_overview(path: web::Path<Uuid>, db: web::Data<PgPool>) -> impl Responder {
    let pid = path.into_inner();

    let decks = match deck_repo::list_by_owner(db.get_ref(), pid).await {
        Ok(d) => d,
        Err(_) => return HttpResponse::InternalServerError().body("DB error"),
    };

    let rows = match stats_for_decks(db.get_ref(), &decks).await {
        Ok(r) => r,
        Err(_) => return HttpResponse::InternalServerError().body("DB error"),
    };

    // Rankings run over the player's chronological participations so that
    // equally-played decks keep first-played-first order.
    let parts = match game_repo::participations_by_player(db.get_ref(), pid).await {
        Ok(p) => p,
        Err(_) => return HttpResponse::InternalServerError().body("DB error"),
    };
    let most = named_counts(db.get_ref(), aggregate::most_played(&parts, 3)).await;
    let least = named_counts(db.get_ref(), aggregate::least_played(&parts, 3)).await;

    HttpResponse::Ok().json(DeckOverview {
        decks: rows,
        most_played: most,
        least_played: least,
    })
}

/// GET /api/stats/decks/{player_id}/inactive
#[get("/stats/decks/{player_id}/inactive")]
pub async fn inactive_decks(path: web::Path<Uuid>, db: web::Data<PgPool>) -> impl Responder {
    let pid = path.into_inner();

    let decks = match deck_repo::list_by_owner(db.get_ref(), pid).await {
        Ok(d) => d,
        Err(_) => return HttpResponse::InternalServerError().body("DB error"),
    };

    match stats_for_decks(db.get_ref(), &decks).await {
        Ok(rows) => {
            let idle: Vec<DeckStats> = rows.into_iter().filter(|r| r.inactive).collect();
            HttpResponse::Ok().json(idle)
        }
        Err(_) => HttpResponse::InternalServerError().body("DB error"),
    }
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(leaderboard)
        .service(player)
        .service(deck)
        .service(decks_overview)
        .service(inactive_decks);
}
