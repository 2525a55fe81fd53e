//! Game log: record, list, edit, re-seat, delete, per-player history.

use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::cache;
use crate::db::game_repo::{self, ParticipantDetail, SeatRow};
use crate::game::rules::{self, Seat};
use crate::http::auth::JwtAuth;
use crate::metrics::GAMES_LOGGED;

//////////////////////////////////////////////////
// Data transfer objects
//////////////////////////////////////////////////

#[derive(Deserialize, Clone, Copy)]
pub struct ParticipantReq {
    pub player_id: Uuid,
    pub deck_id: Uuid,
    #[serde(default)]
    pub won: bool,
}

#[derive(Deserialize)]
pub struct LogGameReq {
    /// Defaults to "now" when the client sends nothing.
    pub played_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub participants: Vec<ParticipantReq>,
}

#[derive(Deserialize)]
pub struct UpdateGameReq {
    pub game_id: Uuid,
    pub played_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

#[derive(Deserialize)]
pub struct ReseatReq {
    pub game_id: Uuid,
    pub participants: Vec<ParticipantReq>,
}

#[derive(Deserialize)]
pub struct DeleteReq {
    pub game_id: Uuid,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct GameView {
    pub id: Uuid,
    pub played_at: DateTime<Utc>,
    pub location: Option<String>,
    pub participants: Vec<ParticipantDetail>,
}

#[derive(Serialize, FromRow)]
pub struct HistoryRow {
    pub game_id: Uuid,
    pub played_at: DateTime<Utc>,
    pub location: Option<String>,
    pub deck_id: Uuid,
    pub deck_name: String,
    pub won: bool,
}

//////////////////////////////////////////////////
// Helpers
//////////////////////////////////////////////////

/// Check the seating invariant, then make sure every referenced deck
/// exists, belongs to the player piloting it, and is not retired.
async fn check_submission(
    db: &PgPool,
    participants: &[ParticipantReq],
) -> Result<Vec<SeatRow>, String> {
    let seats: Vec<Seat> = participants
        .iter()
        .map(|p| Seat {
            player_id: p.player_id,
            won: p.won,
        })
        .collect();
    rules::validate_seating(&seats).map_err(|e| e.to_string())?;

    let mut rows = Vec::with_capacity(participants.len());
    for p in participants {
        let def = match cache::get_deck(p.deck_id) {
            Some(def) => def,
            // Cache miss: fall back to Postgres before rejecting.
            None => match crate::db::deck_repo::get(db, p.deck_id).await {
                Ok(Some(deck)) => {
                    let def = cache::DeckDef {
                        id: deck.id,
                        owner_id: deck.owner_id,
                        name: deck.name.clone(),
                        retired: deck.retired,
                    };
                    cache::put_deck(def.clone());
                    def
                }
                Ok(None) => return Err(format!("unknown deck {}", p.deck_id)),
                Err(_) => return Err("DB error".into()),
            },
        };

        if def.owner_id != p.player_id {
            return Err(format!("deck {} does not belong to that player", def.name));
        }
        if def.retired {
            return Err(format!("deck {} is retired", def.name));
        }

        rows.push(SeatRow {
            player_id: p.player_id,
            deck_id: p.deck_id,
            won: p.won,
        });
    }
    Ok(rows)
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// POST /api/games/log
#[post("/games/log")]
pub async fn log_game(
    _auth: JwtAuth,
    info: web::Json<LogGameReq>,
    db: web::Data<PgPool>,
) -> impl Responder {
    let seats = match check_submission(db.get_ref(), &info.participants).await {
        Ok(s) => s,
        Err(msg) => return HttpResponse::BadRequest().body(msg),
    };

    let played_at = info.played_at.unwrap_or_else(Utc::now);
    match game_repo::insert_game(db.get_ref(), played_at, info.location.as_deref(), &seats).await {
        Ok(game_id) => {
            GAMES_LOGGED.inc();
            HttpResponse::Ok().json(serde_json::json!({ "game_id": game_id }))
        }
        Err(e) => {
            log::warn!("game log failed: {e:?}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// GET /api/games
#[get("/games")]
pub async fn list(
    web::Query(params): web::Query<ListParams>,
    db: web::Data<PgPool>,
) -> impl Responder {
    let limit = params.limit.unwrap_or(100).clamp(1, 500);

    let games = match game_repo::recent_games(db.get_ref(), limit).await {
        Ok(g) => g,
        Err(_) => return HttpResponse::InternalServerError().body("DB error"),
    };

    let ids: Vec<Uuid> = games.iter().map(|g| g.id).collect();
    let participants = match game_repo::participants_for(db.get_ref(), &ids).await {
        Ok(p) => p,
        Err(_) => return HttpResponse::InternalServerError().body("DB error"),
    };

    let mut by_game: HashMap<Uuid, Vec<ParticipantDetail>> = HashMap::new();
    for p in participants {
        by_game.entry(p.game_id).or_default().push(p);
    }

    let views: Vec<GameView> = games
        .into_iter()
        .map(|g| GameView {
            id: g.id,
            played_at: g.played_at,
            location: g.location,
            participants: by_game.remove(&g.id).unwrap_or_default(),
        })
        .collect();

    HttpResponse::Ok().json(views)
}

/// GET /api/games/history/{player_id}
#[get("/games/history/{player_id}")]
pub async fn history(path: web::Path<Uuid>, db: web::Data<PgPool>) -> impl Responder {
    let pid = path.into_inner();

    let rows = sqlx::query_as::<_, HistoryRow>(
        "SELECT g.id AS game_id, g.played_at, g.location,
                gp.deck_id, d.name AS deck_name, gp.won
           FROM game_participants gp
           JOIN games g ON g.id = gp.game_id
           JOIN decks d ON d.id = gp.deck_id
          WHERE gp.player_id = $1
          ORDER BY g.played_at DESC
          LIMIT 100",
    )
    .bind(pid)
    .fetch_all(db.get_ref())
    .await
    .unwrap_or_default();

    HttpResponse::Ok().json(rows)
}

/// POST /api/games/update
#[post("/games/update")]
pub async fn update(
    _auth: JwtAuth,
    info: web::Json<UpdateGameReq>,
    db: web::Data<PgPool>,
) -> impl Responder {
    match game_repo::update_game(
        db.get_ref(),
        info.game_id,
        info.played_at,
        info.location.as_deref(),
    )
    .await
    {
        Ok(()) => HttpResponse::Ok().body("updated"),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

/// POST /api/games/reseat
///
/// Replaces the participant set wholesale; the same invariant as a fresh
/// submission applies. This is also how a wrong winner gets corrected.
#[post("/games/reseat")]
pub async fn reseat(
    _auth: JwtAuth,
    info: web::Json<ReseatReq>,
    db: web::Data<PgPool>,
) -> impl Responder {
    let seats = match check_submission(db.get_ref(), &info.participants).await {
        Ok(s) => s,
        Err(msg) => return HttpResponse::BadRequest().body(msg),
    };

    match game_repo::reseat_game(db.get_ref(), info.game_id, &seats).await {
        Ok(()) => HttpResponse::Ok().body("reseated"),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

/// POST /api/games/delete
#[post("/games/delete")]
pub async fn delete(
    _auth: JwtAuth,
    info: web::Json<DeleteReq>,
    db: web::Data<PgPool>,
) -> impl Responder {
    match game_repo::delete_game(db.get_ref(), info.game_id).await {
        Ok(()) => HttpResponse::Ok().body("deleted"),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(log_game)
        .service(list)
        .service(history)
        .service(update)
        .service(reseat)
        .service(delete);
}
