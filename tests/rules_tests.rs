use tabletally_server::game::rules::{validate_seating, Seat, SeatingError};
use uuid::Uuid;

fn seat(won: bool) -> Seat {
    Seat {
        player_id: Uuid::new_v4(),
        won,
    }
}

#[test]
fn accepts_two_players_one_winner() {
    assert_eq!(validate_seating(&[seat(true), seat(false)]), Ok(()));
}

#[test]
fn accepts_large_pod() {
    let seats = vec![seat(false), seat(false), seat(true), seat(false)];
    assert_eq!(validate_seating(&seats), Ok(()));
}

#[test]
fn rejects_solo_game() {
    assert_eq!(
        validate_seating(&[seat(true)]),
        Err(SeatingError::TooFewPlayers)
    );
    assert_eq!(validate_seating(&[]), Err(SeatingError::TooFewPlayers));
}

#[test]
fn rejects_missing_winner() {
    assert_eq!(
        validate_seating(&[seat(false), seat(false)]),
        Err(SeatingError::NoWinner)
    );
}

#[test]
fn rejects_two_winners() {
    assert_eq!(
        validate_seating(&[seat(true), seat(true), seat(false)]),
        Err(SeatingError::MultipleWinners)
    );
}

#[test]
fn rejects_player_seated_twice() {
    let pid = Uuid::new_v4();
    let seats = [
        Seat {
            player_id: pid,
            won: true,
        },
        Seat {
            player_id: pid,
            won: false,
        },
    ];
    assert_eq!(
        validate_seating(&seats),
        Err(SeatingError::DuplicatePlayer(pid))
    );
}

#[test]
fn duplicate_check_runs_before_winner_count() {
    // A player seated twice is reported even when the winner flags are
    // also wrong.
    let pid = Uuid::new_v4();
    let seats = [
        Seat {
            player_id: pid,
            won: true,
        },
        Seat {
            player_id: pid,
            won: true,
        },
    ];
    assert_eq!(
        validate_seating(&seats),
        Err(SeatingError::DuplicatePlayer(pid))
    );
}
