//! Player directory & profile management.

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;

use crate::db::player_repo;
use crate::http::auth::JwtAuth;

#[derive(Deserialize)]
pub struct UpdateProfileReq {
    pub username: Option<String>,
    pub display_name: Option<String>,
}

/// GET /api/players
#[get("/players")]
pub async fn list(db: web::Data<PgPool>) -> impl Responder {
    match player_repo::list(db.get_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(_) => HttpResponse::InternalServerError().body("DB error"),
    }
}

/// GET /api/players/me
#[get("/players/me")]
pub async fn me(auth: JwtAuth, db: web::Data<PgPool>) -> impl Responder {
    match player_repo::get(db.get_ref(), auth.player_id).await {
        Ok(Some(player)) => HttpResponse::Ok().json(player),
        Ok(None) => HttpResponse::NotFound().body("no such player"),
        Err(_) => HttpResponse::InternalServerError().body("DB error"),
    }
}

/// POST /api/players/update
///
/// Absent fields keep their stored value; usernames stay unique.
#[post("/players/update")]
pub async fn update(
    auth: JwtAuth,
    info: web::Json<UpdateProfileReq>,
    db: web::Data<PgPool>,
) -> impl Responder {
    let res = sqlx::query(
        "UPDATE players
            SET username     = COALESCE($2, username),
                display_name = COALESCE($3, display_name)
          WHERE id = $1",
    )
    .bind(auth.player_id)
    .bind(&info.username)
    .bind(&info.display_name)
    .execute(db.get_ref())
    .await;

    match res {
        Ok(_) => HttpResponse::Ok().body("updated"),
        Err(sqlx::Error::Database(db_err)) if db_err.code() == Some("23505".into()) => {
            HttpResponse::BadRequest().body("username already taken")
        }
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list).service(me).service(update);
}
