use chrono::{Duration, TimeZone, Utc};
use tabletally_server::stats::aggregate::{
    is_inactive, last_played, least_played, most_played, win_rate, Participation,
};
use uuid::Uuid;

fn part_at(deck_id: Uuid, won: bool, days_ago: i64) -> Participation {
    Participation {
        deck_id,
        won,
        played_at: Utc::now() - Duration::days(days_ago),
    }
}

#[test]
fn win_rate_is_zero_without_games() {
    assert_eq!(win_rate(0, 0), 0);
}

#[test]
fn win_rate_rounds_to_nearest_percent() {
    assert_eq!(win_rate(1, 3), 33);
    assert_eq!(win_rate(2, 3), 67);
    assert_eq!(win_rate(1, 2), 50);
    assert_eq!(win_rate(1, 8), 13); // 12.5 rounds up
    assert_eq!(win_rate(5, 5), 100);
}

#[test]
fn most_played_orders_by_count_descending() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let parts = vec![
        part_at(a, false, 3),
        part_at(b, true, 2),
        part_at(b, false, 1),
    ];

    let ranked = most_played(&parts, 10);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].deck_id, b);
    assert_eq!(ranked[0].plays, 2);
    assert_eq!(ranked[1].deck_id, a);
}

#[test]
fn least_played_orders_by_count_ascending() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let parts = vec![
        part_at(a, false, 3),
        part_at(b, true, 2),
        part_at(b, false, 1),
    ];

    let ranked = least_played(&parts, 10);
    assert_eq!(ranked[0].deck_id, a);
    assert_eq!(ranked[1].deck_id, b);
}

#[test]
fn rankings_honour_top_n() {
    let parts: Vec<Participation> = (0..5).map(|_| part_at(Uuid::new_v4(), false, 1)).collect();
    assert_eq!(most_played(&parts, 3).len(), 3);
    assert_eq!(least_played(&parts, 2).len(), 2);
}

#[test]
fn last_played_picks_latest_timestamp() {
    let deck = Uuid::new_v4();
    let newest = part_at(deck, false, 1);
    let parts = vec![part_at(deck, false, 10), newest, part_at(deck, true, 5)];
    assert_eq!(last_played(&parts), Some(newest.played_at));
    assert_eq!(last_played(&[]), None);
}

#[test]
fn never_played_is_inactive() {
    assert!(is_inactive(None, Utc::now(), 30));
}

#[test]
fn inactivity_boundary_is_strict() {
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();

    // Exactly 30 days old: still active.
    assert!(!is_inactive(Some(now - Duration::days(30)), now, 30));
    // One second past the window: inactive.
    assert!(is_inactive(
        Some(now - Duration::days(30) - Duration::seconds(1)),
        now,
        30
    ));
    // Well inside the window: active.
    assert!(!is_inactive(Some(now - Duration::days(3)), now, 30));
}

#[test]
fn inactivity_window_is_configurable() {
    let now = Utc::now();
    let last = Some(now - Duration::days(10));
    assert!(is_inactive(last, now, 7));
    assert!(!is_inactive(last, now, 14));
}
