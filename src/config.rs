//! Runtime configuration for the Tabletally server.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// Redis session-key TTL (seconds).
    pub session_ttl: u64,
    /// Seconds a cached stats payload stays valid.
    pub stats_cache_ttl: u64,
    /// Days without a logged game before a deck counts as inactive.
    pub inactive_after_days: i64,
    /// Default number of leaderboard rows when the client sends no limit.
    pub leaderboard_limit: i64,
}

impl Settings {
    fn from_env() -> Self {
        let session_ttl = env::var("SESSION_TTL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let stats_cache_ttl = env::var("STATS_CACHE_TTL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let inactive_after_days = env::var("INACTIVE_AFTER_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(30);

        let leaderboard_limit = env::var("LEADERBOARD_LIMIT")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(25);

        Settings {
            session_ttl,
            stats_cache_ttl,
            inactive_after_days,
            leaderboard_limit,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
