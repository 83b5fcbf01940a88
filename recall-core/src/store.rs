use crate::{
    expire_cooldown, record_answer, AnswerOutcome, Card, CardId, Clock, CoreError, Deck, DeckId,
    IdGenerator, MemoryPersistence, Persistence, RandomIds, StoreImage, SystemClock,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Owns every deck and card. All mutations go through here and are written
/// through to the persistence collaborator.
///
/// Operations that name a missing deck or card do nothing and report that
/// through their return value; they never fail.
pub struct DeckStore {
    decks: Vec<Deck>,
    current_deck_id: Option<DeckId>,
    persistence: Box<dyn Persistence>,
    clock: Arc<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl DeckStore {
    pub fn open(persistence: Box<dyn Persistence>) -> Result<Self, CoreError> {
        let image = persistence.load()?;
        let mut store = Self {
            decks: image.decks,
            current_deck_id: image.current_deck_id,
            persistence,
            clock: Arc::new(SystemClock),
            ids: Box::new(RandomIds),
        };
        if let Some(id) = store.current_deck_id {
            if store.deck(id).is_none() {
                debug!(%id, "current deck missing from stored image");
                store.current_deck_id = store.decks.first().map(|d| d.id);
            }
        }
        debug!(decks = store.decks.len(), "deck store opened");
        Ok(store)
    }

    pub fn in_memory() -> Self {
        Self {
            decks: Vec::new(),
            current_deck_id: None,
            persistence: Box::new(MemoryPersistence::new()),
            clock: Arc::new(SystemClock),
            ids: Box::new(RandomIds),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ids(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ===== Queries =====

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn deck(&self, id: DeckId) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == id)
    }

    pub fn card(&self, deck_id: DeckId, card_id: CardId) -> Option<&Card> {
        self.deck(deck_id).and_then(|d| d.card(card_id))
    }

    pub fn current_deck_id(&self) -> Option<DeckId> {
        self.current_deck_id
    }

    pub fn current_deck(&self) -> Option<&Deck> {
        self.current_deck_id.and_then(|id| self.deck(id))
    }

    pub fn image(&self) -> StoreImage {
        StoreImage {
            decks: self.decks.clone(),
            current_deck_id: self.current_deck_id,
        }
    }

    // ===== Decks =====

    /// Creates an empty deck and makes it the current one.
    pub fn add_deck(&mut self, name: &str, description: &str) -> DeckId {
        let deck = Deck::new(self.ids.next_id(), name, description, self.now());
        let id = deck.id;
        self.decks.push(deck);
        self.current_deck_id = Some(id);
        self.persist();
        id
    }

    pub fn edit_deck(&mut self, id: DeckId, name: &str, description: &str) -> bool {
        let Some(deck) = self.deck_mut(id) else {
            return miss("deck", id);
        };
        deck.name = name.to_string();
        deck.description = description.to_string();
        self.persist();
        true
    }

    /// Removes the deck and its cards. If it was current, the first remaining
    /// deck (or none) becomes current.
    pub fn delete_deck(&mut self, id: DeckId) -> bool {
        let before = self.decks.len();
        self.decks.retain(|d| d.id != id);
        if self.decks.len() == before {
            return miss("deck", id);
        }
        if self.current_deck_id == Some(id) {
            self.current_deck_id = self.decks.first().map(|d| d.id);
        }
        self.persist();
        true
    }

    pub fn set_current_deck(&mut self, id: DeckId) -> bool {
        if self.deck(id).is_none() {
            return miss("deck", id);
        }
        self.current_deck_id = Some(id);
        self.persist();
        true
    }

    /// Stamps the deck, and optionally one of its cards, as reviewed now.
    pub fn mark_reviewed(&mut self, deck_id: DeckId, card_id: Option<CardId>) -> bool {
        let now = self.now();
        let Some(deck) = self.deck_mut(deck_id) else {
            return miss("deck", deck_id);
        };
        deck.last_reviewed = Some(now);
        if let Some(card) = card_id.and_then(|cid| deck.card_mut(cid)) {
            card.last_reviewed = Some(now);
        }
        self.persist();
        true
    }

    // ===== Cards =====

    pub fn add_card(&mut self, deck_id: DeckId, front: &str, back: &str) -> Option<CardId> {
        let card = Card::new(self.ids.next_id(), front, back, self.now());
        let Some(deck) = self.deck_mut(deck_id) else {
            miss("deck", deck_id);
            return None;
        };
        let id = card.id;
        deck.cards.push(card);
        self.persist();
        Some(id)
    }

    pub fn edit_card(&mut self, deck_id: DeckId, card_id: CardId, front: &str, back: &str) -> bool {
        let Some(card) = self.card_mut(deck_id, card_id) else {
            return miss("card", card_id);
        };
        card.front = front.to_string();
        card.back = back.to_string();
        self.persist();
        true
    }

    pub fn delete_card(&mut self, deck_id: DeckId, card_id: CardId) -> bool {
        let Some(deck) = self.deck_mut(deck_id) else {
            return miss("deck", deck_id);
        };
        let before = deck.cards.len();
        deck.cards.retain(|c| c.id != card_id);
        if deck.cards.len() == before {
            return miss("card", card_id);
        }
        self.persist();
        true
    }

    /// The mastery rule: see [`record_answer`].
    pub fn update_card_review_count(
        &mut self,
        deck_id: DeckId,
        card_id: CardId,
        was_correct: bool,
    ) -> Option<AnswerOutcome> {
        self.apply_answer(deck_id, card_id, was_correct, false)
    }

    /// Same rule as [`update_card_review_count`](Self::update_card_review_count),
    /// and also stamps the deck as reviewed. Persists once.
    pub fn record_review(
        &mut self,
        deck_id: DeckId,
        card_id: CardId,
        was_correct: bool,
    ) -> Option<AnswerOutcome> {
        self.apply_answer(deck_id, card_id, was_correct, true)
    }

    /// Clears an elapsed cooldown so the card can be studied again. Leaves
    /// the card untouched when there is no cooldown or it is still running.
    pub fn reset_card_review_date(&mut self, deck_id: DeckId, card_id: CardId) -> bool {
        let now = self.now();
        let Some(card) = self.card_mut(deck_id, card_id) else {
            return miss("card", card_id);
        };
        if !expire_cooldown(card, now) {
            return false;
        }
        debug!(%card_id, "cooldown expired");
        self.persist();
        true
    }

    // ===== Helpers =====

    fn apply_answer(
        &mut self,
        deck_id: DeckId,
        card_id: CardId,
        was_correct: bool,
        stamp_deck: bool,
    ) -> Option<AnswerOutcome> {
        let now = self.now();
        let Some(deck) = self.deck_mut(deck_id) else {
            miss("deck", deck_id);
            return None;
        };
        let Some(card) = deck.card_mut(card_id) else {
            miss("card", card_id);
            return None;
        };
        let outcome = record_answer(card, was_correct, now);
        if stamp_deck {
            deck.last_reviewed = Some(now);
        }
        debug!(%card_id, was_correct, review_count = outcome.review_count, "answer recorded");
        self.persist();
        Some(outcome)
    }

    fn deck_mut(&mut self, id: DeckId) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|d| d.id == id)
    }

    fn card_mut(&mut self, deck_id: DeckId, card_id: CardId) -> Option<&mut Card> {
        self.deck_mut(deck_id).and_then(|d| d.card_mut(card_id))
    }

    fn persist(&self) {
        if let Err(err) = self.persistence.save(&self.image()) {
            warn!(error = %err, "failed to persist decks");
        }
    }
}

fn miss(what: &'static str, id: uuid::Uuid) -> bool {
    debug!(%id, "{what} not found, ignoring");
    false
}
