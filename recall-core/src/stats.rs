use crate::{Availability, Deck};
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeckProgress {
    pub total: usize,
    /// Cards a new session would pick up, including expired cooldowns.
    pub available: usize,
    pub on_cooldown: usize,
    /// Available cards with a streak already under way.
    pub in_progress: usize,
}

pub fn deck_progress(deck: &Deck, now: DateTime<Utc>) -> DeckProgress {
    let mut progress = DeckProgress {
        total: deck.cards.len(),
        ..DeckProgress::default()
    };
    for card in &deck.cards {
        match card.availability(now) {
            Availability::OnCooldown => progress.on_cooldown += 1,
            Availability::Available => {
                progress.available += 1;
                if card.review_count > 0 {
                    progress.in_progress += 1;
                }
            }
            // The streak restarts when the cooldown is cleared.
            Availability::CooldownExpired => progress.available += 1,
        }
    }
    progress
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub correct: u32,
    pub incorrect: u32,
    pub cycles: u32,
    pub mastered: usize,
    pub available_at_start: usize,
}

impl SessionSummary {
    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }

    pub fn accuracy(&self) -> f32 {
        if self.answered() == 0 {
            0.0
        } else {
            self.correct as f32 / self.answered() as f32
        }
    }
}
