//! Review session engine.
//!
//! A session works on a snapshot of one deck's qualifying cards. The current
//! card is always the head of the active queue: answering removes it, and
//! it either leaves the session (mastered) or goes to the back of the queue.
//! A cycle ends once every card that was queued when the cycle began has
//! been answered; the queue is then reshuffled for the next cycle.

use crate::{
    record_answer, Availability, Card, CardId, CoreError, DeckId, DeckStore, SessionSummary,
    MASTERY_THRESHOLD,
};
use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unavailable {
    DeckNotFound,
    /// Every card is on cooldown, or the deck is empty.
    NoEligibleCards,
    /// The deck or the current card was removed while the session ran.
    DeckChanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Complete,
    Unavailable(Unavailable),
}

pub struct ReviewSession {
    deck_id: DeckId,
    state: SessionState,
    active: Vec<Card>,
    completed: Vec<Card>,
    available_at_start: usize,
    current_index: usize,
    cycle_len: usize,
    review_cycle: u32,
    correct_count: u32,
    incorrect_count: u32,
    rng: Box<dyn RngCore>,
}

impl ReviewSession {
    pub fn start(store: &mut DeckStore, deck_id: DeckId) -> Self {
        Self::start_with_rng(store, deck_id, rand::rng())
    }

    pub fn start_with_rng<R: RngCore + 'static>(
        store: &mut DeckStore,
        deck_id: DeckId,
        rng: R,
    ) -> Self {
        let mut session = Self {
            deck_id,
            state: SessionState::Unavailable(Unavailable::DeckNotFound),
            active: Vec::new(),
            completed: Vec::new(),
            available_at_start: 0,
            current_index: 0,
            cycle_len: 0,
            review_cycle: 1,
            correct_count: 0,
            incorrect_count: 0,
            rng: Box::new(rng),
        };

        let now = store.now();
        let Some(deck) = store.deck(deck_id) else {
            debug!(%deck_id, "review requested for missing deck");
            return session;
        };
        let candidates: Vec<(CardId, Availability)> = deck
            .cards
            .iter()
            .map(|c| (c.id, c.availability(now)))
            .collect();

        let mut available = Vec::with_capacity(candidates.len());
        for (card_id, availability) in candidates {
            if !availability.qualifies() {
                continue;
            }
            if availability == Availability::CooldownExpired {
                store.reset_card_review_date(deck_id, card_id);
            }
            // Read back after any reset so the local streak matches the store.
            if let Some(card) = store.card(deck_id, card_id) {
                available.push(card.clone());
            }
        }

        if available.is_empty() {
            info!(%deck_id, "no cards available for review");
            session.state = SessionState::Unavailable(Unavailable::NoEligibleCards);
            return session;
        }

        available.shuffle(&mut *session.rng);
        session.available_at_start = available.len();
        session.cycle_len = available.len();
        session.active = available;
        session.state = SessionState::InProgress;
        info!(%deck_id, cards = session.available_at_start, "review session started");
        session
    }

    /// Records an answer for the current card and advances the session.
    pub fn answer(
        &mut self,
        store: &mut DeckStore,
        card_id: CardId,
        was_correct: bool,
    ) -> Result<SessionState, CoreError> {
        if self.state != SessionState::InProgress {
            return Err(CoreError::Invalid("session is not in progress"));
        }
        if self.active.first().map(|c| c.id) != Some(card_id) {
            return Err(CoreError::Invalid("card is not the current card"));
        }

        if store
            .record_review(self.deck_id, card_id, was_correct)
            .is_none()
        {
            debug!(deck_id = %self.deck_id, %card_id, "card vanished mid-session");
            self.state = SessionState::Unavailable(Unavailable::DeckChanged);
            return Ok(self.state);
        }

        if was_correct {
            self.correct_count += 1;
        } else {
            self.incorrect_count += 1;
        }

        let mut card = self.active.remove(0);
        let local = record_answer(&mut card, was_correct, store.now());
        if local.mastered {
            self.completed.push(card);
        } else {
            self.active.push(card);
        }
        self.current_index += 1;

        if self.active.is_empty() && self.completed.len() == self.available_at_start {
            self.state = SessionState::Complete;
            info!(
                deck_id = %self.deck_id,
                cycles = self.review_cycle,
                correct = self.correct_count,
                incorrect = self.incorrect_count,
                "review session complete"
            );
            return Ok(self.state);
        }

        if self.current_index >= self.cycle_len {
            self.current_index = 0;
            self.review_cycle += 1;
            self.active.shuffle(&mut *self.rng);
            self.cycle_len = self.active.len();
            debug!(cycle = self.review_cycle, remaining = self.cycle_len, "new review cycle");
        }
        Ok(self.state)
    }

    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_card(&self) -> Option<&Card> {
        match self.state {
            SessionState::InProgress => self.active.first(),
            _ => None,
        }
    }

    /// Correct answers the current card still needs before it is mastered.
    pub fn remaining_for_mastery(&self) -> Option<u32> {
        self.current_card()
            .map(|c| MASTERY_THRESHOLD.saturating_sub(c.review_count))
    }

    pub fn active_cards(&self) -> &[Card] {
        &self.active
    }

    pub fn completed_cards(&self) -> &[Card] {
        &self.completed
    }

    pub fn available_at_start(&self) -> usize {
        self.available_at_start
    }

    /// Cards already answered in the current cycle.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn cycle_len(&self) -> usize {
        self.cycle_len
    }

    pub fn review_cycle(&self) -> u32 {
        self.review_cycle
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            correct: self.correct_count,
            incorrect: self.incorrect_count,
            cycles: self.review_cycle,
            mastered: self.completed.len(),
            available_at_start: self.available_at_start,
        }
    }
}
