//! Derived statistics over fetched participation rows.
//!
//! Everything here is a plain pass over rows the repositories already
//! pulled out of Postgres. Win rates, play-count rankings and the
//! inactivity window are computed in one place so the HTTP handlers stay
//! thin and the arithmetic stays unit-testable.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// One participation row as the stats queries fetch it.
#[derive(Debug, Clone, Copy)]
pub struct Participation {
    pub deck_id: Uuid,
    pub won: bool,
    pub played_at: DateTime<Utc>,
}

/// A deck together with how often it hit the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckPlays {
    pub deck_id: Uuid,
    pub plays: usize,
}

/// Rounded win percentage; 0 when nothing was played yet.
pub fn win_rate(wins: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * wins as f64 / total as f64).round() as u32
}

/// Group participations by deck, preserving first-appearance order.
fn play_counts(parts: &[Participation]) -> Vec<DeckPlays> {
    let mut counts: Vec<DeckPlays> = Vec::new();
    for p in parts {
        match counts.iter_mut().find(|c| c.deck_id == p.deck_id) {
            Some(c) => c.plays += 1,
            None => counts.push(DeckPlays {
                deck_id: p.deck_id,
                plays: 1,
            }),
        }
    }
    counts
}

/// Decks ordered by descending play count, ties kept in input order.
pub fn most_played(parts: &[Participation], top: usize) -> Vec<DeckPlays> {
    let mut counts = play_counts(parts);
    counts.sort_by(|a, b| b.plays.cmp(&a.plays));
    counts.truncate(top);
    counts
}

/// Decks ordered by ascending play count, ties kept in input order.
pub fn least_played(parts: &[Participation], top: usize) -> Vec<DeckPlays> {
    let mut counts = play_counts(parts);
    counts.sort_by(|a, b| a.plays.cmp(&b.plays));
    counts.truncate(top);
    counts
}

/// Most recent participation timestamp, if any.
pub fn last_played(parts: &[Participation]) -> Option<DateTime<Utc>> {
    parts.iter().map(|p| p.played_at).max()
}

/// A deck is inactive when its last game is strictly older than the
/// window, or it was never played at all. Exactly on the boundary still
/// counts as active.
pub fn is_inactive(last: Option<DateTime<Utc>>, now: DateTime<Utc>, window_days: i64) -> bool {
    match last {
        Some(t) => now - t > Duration::days(window_days),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(deck_id: Uuid, won: bool) -> Participation {
        Participation {
            deck_id,
            won,
            played_at: Utc::now(),
        }
    }

    #[test]
    fn play_counts_preserve_first_appearance() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parts = vec![part(a, false), part(b, true), part(a, false)];

        let counts = play_counts(&parts);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].deck_id, a);
        assert_eq!(counts[0].plays, 2);
        assert_eq!(counts[1].deck_id, b);
        assert_eq!(counts[1].plays, 1);
    }

    #[test]
    fn ranking_tie_keeps_input_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parts = vec![part(a, false), part(b, false)];

        let most = most_played(&parts, 5);
        assert_eq!(most[0].deck_id, a);
        assert_eq!(most[1].deck_id, b);

        let least = least_played(&parts, 5);
        assert_eq!(least[0].deck_id, a);
        assert_eq!(least[1].deck_id, b);
    }
}
