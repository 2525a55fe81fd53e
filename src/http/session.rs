// src/http/session.rs
//! Very thin session-presence API backed by Redis keys. Clients gate their
//! navigation on this check instead of holding any server-side state.

use actix_web::{get, web, HttpResponse, Responder};
use redis::{AsyncCommands, Client as RedisClient};
use uuid::Uuid;

#[get("/session/active/{player_id}")]
pub async fn active(path: web::Path<Uuid>, redis: web::Data<RedisClient>) -> impl Responder {
    let pid = path.into_inner();
    let key = format!("session:{pid}");
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(c) => c,
        Err(_) => return HttpResponse::InternalServerError().body("redis down"),
    };

    match conn.exists(&key).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "active": true })),
        Ok(false) => HttpResponse::Ok().json(serde_json::json!({ "active": false })),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(active);
}
