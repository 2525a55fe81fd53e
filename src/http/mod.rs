pub mod auth;
pub mod decks;
pub mod games;
pub mod health;
pub mod players;
pub mod routes;
pub mod session;
pub mod stats;
