use actix_web::dev::Payload;
use actix_web::test::TestRequest;
use actix_web::FromRequest;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use tabletally_server::http::auth::JwtAuth;
use uuid::Uuid;

const SECRET: &str = "test-secret";

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    pid: String,
    exp: usize,
}

fn mint_token(user_id: Uuid, player_id: Uuid) -> String {
    let claims = TestClaims {
        sub: user_id.to_string(),
        pid: player_id.to_string(),
        exp: (Utc::now() + Duration::minutes(5)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode test token")
}

#[actix_rt::test]
async fn missing_header_is_rejected() {
    std::env::set_var("JWT_SECRET", SECRET);
    let req = TestRequest::default().to_http_request();
    let res = JwtAuth::from_request(&req, &mut Payload::None).await;
    assert!(res.is_err());
}

#[actix_rt::test]
async fn garbage_token_is_rejected() {
    std::env::set_var("JWT_SECRET", SECRET);
    let req = TestRequest::default()
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_http_request();
    let res = JwtAuth::from_request(&req, &mut Payload::None).await;
    assert!(res.is_err());
}

#[actix_rt::test]
async fn valid_token_extracts_both_ids() {
    std::env::set_var("JWT_SECRET", SECRET);
    let user_id = Uuid::new_v4();
    let player_id = Uuid::new_v4();
    let token = mint_token(user_id, player_id);

    let req = TestRequest::default()
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_http_request();
    let auth = JwtAuth::from_request(&req, &mut Payload::None)
        .await
        .expect("extractor should accept a fresh token");

    assert_eq!(auth.user_id, user_id);
    assert_eq!(auth.player_id, player_id);
}
