use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type DeckId = uuid::Uuid;
pub type CardId = uuid::Uuid;

/// Consecutive correct answers needed before a card goes on cooldown.
pub const MASTERY_THRESHOLD: u32 = 10;
pub const COOLDOWN_DAYS: i64 = 7;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Never mastered, or cooldown already cleared.
    Available,
    /// Cooldown end has passed but has not been cleared yet.
    CooldownExpired,
    OnCooldown,
}

impl Availability {
    pub fn qualifies(self) -> bool {
        !matches!(self, Availability::OnCooldown)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub next_review_date: Option<DateTime<Utc>>,
}

impl Card {
    pub fn new(
        id: CardId,
        front: impl Into<String>,
        back: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
            created_at,
            last_reviewed: None,
            review_count: 0,
            next_review_date: None,
        }
    }

    pub fn availability(&self, now: DateTime<Utc>) -> Availability {
        match self.next_review_date {
            None => Availability::Available,
            Some(next) if next <= now => Availability::CooldownExpired,
            Some(_) => Availability::OnCooldown,
        }
    }

    pub fn is_mastered(&self) -> bool {
        self.review_count >= MASTERY_THRESHOLD
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(
        id: DeckId,
        name: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            created_at,
            last_reviewed: None,
            cards: Vec::new(),
        }
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }
}
