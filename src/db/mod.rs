pub mod deck_repo;
pub mod game_repo;
pub mod models;
pub mod player_repo;
