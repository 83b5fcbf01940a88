use chrono::{Duration, TimeZone, Utc};
use recall_core::{
    Card, Clock, CoreError, Deck, DeckStore, ManualClock, MemoryPersistence, Persistence, StoreImage,
};
use std::sync::Arc;
use uuid::Uuid;

struct Fixture {
    store: DeckStore,
    clock: Arc<ManualClock>,
    persistence: Arc<MemoryPersistence>,
}

fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    ));
    let persistence = Arc::new(MemoryPersistence::new());
    let store = DeckStore::open(Box::new(persistence.clone()))
        .unwrap()
        .with_clock(clock.clone());
    Fixture {
        store,
        clock,
        persistence,
    }
}

struct BrokenDisk;

impl Persistence for BrokenDisk {
    fn load(&self) -> Result<StoreImage, CoreError> {
        Ok(StoreImage::default())
    }

    fn save(&self, _image: &StoreImage) -> Result<(), CoreError> {
        Err(CoreError::Storage("disk full"))
    }
}

#[test]
fn add_deck_becomes_current() {
    let mut f = fixture();
    let a = f.store.add_deck("Spanish", "basics");
    let b = f.store.add_deck("French", "");

    assert_eq!(f.store.current_deck_id(), Some(b));
    let deck = f.store.deck(a).unwrap();
    assert_eq!(deck.name, "Spanish");
    assert_eq!(deck.description, "basics");
    assert!(deck.cards.is_empty());
    assert_eq!(deck.created_at, f.clock.now());
}

#[test]
fn edit_deck_and_miss() {
    let mut f = fixture();
    let id = f.store.add_deck("Spanish", "");
    let saves = f.persistence.save_count();

    assert!(f.store.edit_deck(id, "Español", "verbs"));
    assert_eq!(f.store.deck(id).unwrap().name, "Español");
    assert_eq!(f.persistence.save_count(), saves + 1);

    assert!(!f.store.edit_deck(Uuid::new_v4(), "x", "y"));
    assert_eq!(f.persistence.save_count(), saves + 1);
}

#[test]
fn delete_deck_moves_current_to_first_remaining() {
    let mut f = fixture();
    let a = f.store.add_deck("A", "");
    let b = f.store.add_deck("B", "");
    let c = f.store.add_deck("C", "");
    assert_eq!(f.store.current_deck_id(), Some(c));

    assert!(f.store.delete_deck(c));
    assert!(f.store.deck(c).is_none());
    assert_eq!(f.store.current_deck_id(), Some(a));

    // deleting a non-current deck keeps the pointer
    assert!(f.store.delete_deck(b));
    assert_eq!(f.store.current_deck_id(), Some(a));

    assert!(f.store.delete_deck(a));
    assert_eq!(f.store.current_deck_id(), None);
    assert!(f.store.decks().is_empty());
    assert!(!f.store.delete_deck(a));
}

#[test]
fn set_current_deck_ignores_unknown_ids() {
    let mut f = fixture();
    let a = f.store.add_deck("A", "");
    f.store.add_deck("B", "");

    assert!(f.store.set_current_deck(a));
    assert_eq!(f.store.current_deck().unwrap().name, "A");
    assert!(!f.store.set_current_deck(Uuid::new_v4()));
    assert_eq!(f.store.current_deck_id(), Some(a));
}

#[test]
fn card_crud() {
    let mut f = fixture();
    let deck = f.store.add_deck("Spanish", "");
    let card = f.store.add_card(deck, "hola", "hello").unwrap();
    let other = f.store.add_card(deck, "adios", "bye").unwrap();

    let c = f.store.card(deck, card).unwrap();
    assert_eq!(c.review_count, 0);
    assert_eq!(c.next_review_date, None);

    assert!(f.store.edit_card(deck, card, "hola!", "hello!"));
    assert_eq!(f.store.card(deck, card).unwrap().back, "hello!");

    assert!(f.store.delete_card(deck, card));
    assert!(f.store.card(deck, card).is_none());
    let order: Vec<_> = f.store.deck(deck).unwrap().cards.iter().map(|c| c.id).collect();
    assert_eq!(order, vec![other]);

    assert!(f.store.add_card(Uuid::new_v4(), "x", "y").is_none());
    assert!(!f.store.edit_card(deck, card, "x", "y"));
    assert!(!f.store.delete_card(deck, card));
}

#[test]
fn deleting_deck_discards_its_cards() {
    let mut f = fixture();
    let deck = f.store.add_deck("Spanish", "");
    let card = f.store.add_card(deck, "hola", "hello").unwrap();

    f.store.delete_deck(deck);
    assert!(f.store.card(deck, card).is_none());
    assert!(f.persistence.snapshot().decks.is_empty());
}

#[test]
fn ten_correct_answers_put_card_on_cooldown() {
    let mut f = fixture();
    let deck = f.store.add_deck("Spanish", "");
    let card = f.store.add_card(deck, "hola", "hello").unwrap();

    for i in 1..=10 {
        let out = f.store.update_card_review_count(deck, card, true).unwrap();
        assert_eq!(out.review_count, i);
    }
    let now = f.clock.now();
    let c = f.store.card(deck, card).unwrap();
    assert_eq!(c.review_count, 10);
    assert_eq!(c.next_review_date, Some(now + Duration::days(7)));
    assert_eq!(c.last_reviewed, Some(now));
}

#[test]
fn wrong_answer_resets_at_any_count() {
    let mut f = fixture();
    let deck = f.store.add_deck("Spanish", "");
    let card = f.store.add_card(deck, "hola", "hello").unwrap();

    for streak in [0u32, 3, 9, 10, 14] {
        for _ in 0..streak {
            f.store.update_card_review_count(deck, card, true);
        }
        f.store.update_card_review_count(deck, card, false);
        let c = f.store.card(deck, card).unwrap();
        assert_eq!(c.review_count, 0, "after streak of {streak}");
        assert_eq!(c.next_review_date, None);
    }
}

#[test]
fn reset_card_review_date_is_idempotent() {
    let mut f = fixture();
    let deck = f.store.add_deck("Spanish", "");
    let card = f.store.add_card(deck, "hola", "hello").unwrap();

    // no cooldown at all
    let before = f.store.card(deck, card).cloned();
    assert!(!f.store.reset_card_review_date(deck, card));
    assert_eq!(f.store.card(deck, card).cloned(), before);

    // cooldown still running
    for _ in 0..10 {
        f.store.update_card_review_count(deck, card, true);
    }
    f.clock.advance(Duration::days(6));
    let before = f.store.card(deck, card).cloned();
    assert!(!f.store.reset_card_review_date(deck, card));
    assert!(!f.store.reset_card_review_date(deck, card));
    assert_eq!(f.store.card(deck, card).cloned(), before);

    // cooldown over
    f.clock.advance(Duration::days(2));
    assert!(f.store.reset_card_review_date(deck, card));
    let c = f.store.card(deck, card).unwrap();
    assert_eq!(c.review_count, 0);
    assert_eq!(c.next_review_date, None);
    assert!(!f.store.reset_card_review_date(deck, card));
}

#[test]
fn mark_reviewed_stamps_deck_and_card() {
    let mut f = fixture();
    let deck = f.store.add_deck("Spanish", "");
    let card = f.store.add_card(deck, "hola", "hello").unwrap();
    f.clock.advance(Duration::minutes(5));

    assert!(f.store.mark_reviewed(deck, Some(card)));
    let now = f.clock.now();
    assert_eq!(f.store.deck(deck).unwrap().last_reviewed, Some(now));
    assert_eq!(f.store.card(deck, card).unwrap().last_reviewed, Some(now));
    assert!(!f.store.mark_reviewed(Uuid::new_v4(), None));
}

#[test]
fn record_review_stamps_deck_and_saves_once() {
    let mut f = fixture();
    let deck = f.store.add_deck("Spanish", "");
    let card = f.store.add_card(deck, "hola", "hello").unwrap();
    f.clock.advance(Duration::minutes(5));
    let saves = f.persistence.save_count();

    let out = f.store.record_review(deck, card, true).unwrap();

    assert_eq!(out.review_count, 1);
    assert_eq!(f.persistence.save_count(), saves + 1);
    let now = f.clock.now();
    assert_eq!(f.store.deck(deck).unwrap().last_reviewed, Some(now));
    assert_eq!(f.store.card(deck, card).unwrap().last_reviewed, Some(now));
    assert_eq!(f.persistence.snapshot(), f.store.image());

    assert!(f.store.record_review(deck, Uuid::new_v4(), true).is_none());
    assert!(f.store.record_review(Uuid::new_v4(), card, true).is_none());
    assert_eq!(f.persistence.save_count(), saves + 1);
}

#[test]
fn every_mutation_writes_through() {
    let mut f = fixture();
    let deck = f.store.add_deck("Spanish", "");
    let card = f.store.add_card(deck, "hola", "hello").unwrap();
    f.store.update_card_review_count(deck, card, true);

    assert_eq!(f.persistence.save_count(), 3);
    let image = f.persistence.snapshot();
    assert_eq!(image, f.store.image());
    assert_eq!(image.current_deck_id, Some(deck));
    assert_eq!(image.decks[0].cards[0].review_count, 1);
}

#[test]
fn reopen_restores_image_and_repairs_current_pointer() {
    let now = Utc::now();
    let mut a = Deck::new(Uuid::new_v4(), "A", "", now);
    a.cards.push(Card::new(Uuid::new_v4(), "q", "a", now));
    let image = StoreImage {
        decks: vec![a.clone()],
        current_deck_id: Some(Uuid::new_v4()),
    };

    let store = DeckStore::open(Box::new(MemoryPersistence::with_image(image))).unwrap();
    assert_eq!(store.decks(), &[a.clone()]);
    assert_eq!(store.current_deck_id(), Some(a.id));
}

#[test]
fn save_failure_does_not_undo_mutation() {
    let mut store = DeckStore::open(Box::new(BrokenDisk)).unwrap();
    let deck = store.add_deck("Spanish", "");
    assert!(store.add_card(deck, "hola", "hello").is_some());
    assert_eq!(store.deck(deck).unwrap().cards.len(), 1);
}
