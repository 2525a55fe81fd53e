//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::IntCounter;

/// Global Prometheus handle reused in tests.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics") // exposed URL
        .build()
        .expect("metrics builder")
});

/// Total games accepted by POST /api/games/log.
pub static GAMES_LOGGED: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new("games_logged_total", "Games recorded since start-up")
        .expect("counter definition");
    METRICS
        .registry
        .register(Box::new(counter.clone()))
        .expect("counter registration");
    counter
});
