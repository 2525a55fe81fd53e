//! Submission-time seating rules for logged games.
//!
//! A game is only stored when the seating is coherent: two or more
//! participants, exactly one of them marked as the winner, and no player
//! seated twice. The same check runs for a fresh log and for a re-seat of
//! an existing game.

use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// One proposed participant: who sat down and whether they won.
#[derive(Debug, Clone, Copy)]
pub struct Seat {
    pub player_id: Uuid,
    pub won: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SeatingError {
    TooFewPlayers,
    NoWinner,
    MultipleWinners,
    DuplicatePlayer(Uuid),
}

impl fmt::Display for SeatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatingError::TooFewPlayers => write!(f, "a game needs at least two participants"),
            SeatingError::NoWinner => write!(f, "no participant is marked as winner"),
            SeatingError::MultipleWinners => write!(f, "more than one participant is marked as winner"),
            SeatingError::DuplicatePlayer(id) => write!(f, "player {} is seated twice", id),
        }
    }
}

impl std::error::Error for SeatingError {}

/// Validate a proposed participant set before it touches the database.
pub fn validate_seating(seats: &[Seat]) -> Result<(), SeatingError> {
    if seats.len() < 2 {
        return Err(SeatingError::TooFewPlayers);
    }

    let mut seen = HashSet::with_capacity(seats.len());
    for seat in seats {
        if !seen.insert(seat.player_id) {
            return Err(SeatingError::DuplicatePlayer(seat.player_id));
        }
    }

    match seats.iter().filter(|s| s.won).count() {
        0 => Err(SeatingError::NoWinner),
        1 => Ok(()),
        _ => Err(SeatingError::MultipleWinners),
    }
}
