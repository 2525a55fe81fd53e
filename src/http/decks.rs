//! Deck registry (register / list / edit / retire)

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::{self, DeckDef};
use crate::db::deck_repo::{self, DeckAttrs};
use crate::db::models::Deck;
use crate::http::auth::JwtAuth;

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct DeckBody {
    pub name: String,
    pub format: String,
    pub commander: Option<String>,
    #[serde(default)]
    pub color_white: bool,
    #[serde(default)]
    pub color_blue: bool,
    #[serde(default)]
    pub color_black: bool,
    #[serde(default)]
    pub color_red: bool,
    #[serde(default)]
    pub color_green: bool,
    #[serde(default)]
    pub colorless: bool,
}

#[derive(Deserialize)]
pub struct UpdateReq {
    pub deck_id: Uuid,
    #[serde(flatten)]
    pub deck: DeckBody,
}

#[derive(Deserialize)]
pub struct RetireReq {
    pub deck_id: Uuid,
    pub retired: bool,
}

impl DeckBody {
    fn into_attrs(self) -> DeckAttrs {
        DeckAttrs {
            name: self.name,
            format: self.format,
            commander: self.commander,
            color_white: self.color_white,
            color_blue: self.color_blue,
            color_black: self.color_black,
            color_red: self.color_red,
            color_green: self.color_green,
            colorless: self.colorless,
        }
    }
}

fn refresh_cache(deck: &Deck) {
    cache::put_deck(DeckDef {
        id: deck.id,
        owner_id: deck.owner_id,
        name: deck.name.clone(),
        retired: deck.retired,
    });
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// POST /api/decks/register
#[post("/decks/register")]
pub async fn register(
    auth: JwtAuth,
    info: web::Json<DeckBody>,
    db: web::Data<PgPool>,
) -> impl Responder {
    if info.name.trim().is_empty() {
        return HttpResponse::BadRequest().body("deck name required");
    }

    match deck_repo::insert(db.get_ref(), auth.player_id, &info.into_inner().into_attrs()).await {
        Ok(deck) => {
            refresh_cache(&deck);
            HttpResponse::Ok().json(deck)
        }
        Err(e) => {
            log::warn!("deck register failed: {e:?}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// GET /api/decks
#[get("/decks")]
pub async fn list(db: web::Data<PgPool>) -> impl Responder {
    match deck_repo::list_all(db.get_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(_) => HttpResponse::InternalServerError().body("DB error"),
    }
}

/// GET /api/decks/mine
#[get("/decks/mine")]
pub async fn mine(auth: JwtAuth, db: web::Data<PgPool>) -> impl Responder {
    match deck_repo::list_by_owner(db.get_ref(), auth.player_id).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(_) => HttpResponse::InternalServerError().body("DB error"),
    }
}

/// POST /api/decks/update
#[post("/decks/update")]
pub async fn update(
    auth: JwtAuth,
    info: web::Json<UpdateReq>,
    db: web::Data<PgPool>,
) -> impl Responder {
    let UpdateReq { deck_id, deck } = info.into_inner();

    match deck_repo::update(db.get_ref(), deck_id, auth.player_id, &deck.into_attrs()).await {
        Ok(deck) => {
            refresh_cache(&deck);
            HttpResponse::Ok().json(deck)
        }
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

/// POST /api/decks/retire
#[post("/decks/retire")]
pub async fn retire(
    auth: JwtAuth,
    info: web::Json<RetireReq>,
    db: web::Data<PgPool>,
) -> impl Responder {
    match deck_repo::set_retired(db.get_ref(), info.deck_id, auth.player_id, info.retired).await {
        Ok(deck) => {
            refresh_cache(&deck);
            HttpResponse::Ok().json(deck)
        }
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(list)
        .service(mine)
        .service(update)
        .service(retire);
}
