// tests/cache_tests.rs

use tabletally_server::cache::{get_deck, put_deck, DeckDef};
use uuid::Uuid;

#[test]
fn put_then_get_returns_the_entry() {
    let id = Uuid::new_v4();
    let owner = Uuid::new_v4();
    put_deck(DeckDef {
        id,
        owner_id: owner,
        name: "Gruul Stompy".into(),
        retired: false,
    });

    let def = get_deck(id).expect("deck should be cached");
    assert_eq!(def.id, id);
    assert_eq!(def.owner_id, owner);
    assert_eq!(&def.name, "Gruul Stompy");
    assert!(!def.retired);
}

#[test]
fn put_overwrites_existing_entry() {
    let id = Uuid::new_v4();
    let owner = Uuid::new_v4();
    put_deck(DeckDef {
        id,
        owner_id: owner,
        name: "Mono Blue".into(),
        retired: false,
    });
    put_deck(DeckDef {
        id,
        owner_id: owner,
        name: "Mono Blue".into(),
        retired: true,
    });

    let def = get_deck(id).expect("deck should be cached");
    assert!(def.retired);
}

#[test]
fn get_missing_deck_is_none() {
    assert!(get_deck(Uuid::new_v4()).is_none());
}
