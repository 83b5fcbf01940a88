use crate::{Availability, Card, Deck, DeckId};
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub deck_id: DeckId,
    pub deck_name: String,
    pub card: Card,
}

fn matches(card: &Card, q: &str) -> bool {
    card.front.to_lowercase().contains(q) || card.back.to_lowercase().contains(q)
}

/// Narrows one deck's cards. A blank query keeps everything.
pub fn filter_cards(cards: &[Card], query: &str) -> Vec<Card> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return cards.to_vec();
    }
    cards.iter().filter(|c| matches(c, &q)).cloned().collect()
}

/// Searches every deck. A blank query finds nothing.
pub fn search_decks(decks: &[Deck], query: &str) -> Vec<SearchHit> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return Vec::new();
    }
    decks
        .iter()
        .flat_map(|d| {
            d.cards.iter().filter(|c| matches(c, &q)).map(|c| SearchHit {
                deck_id: d.id,
                deck_name: d.name.clone(),
                card: c.clone(),
            })
        })
        .collect()
}

pub fn filter_by_availability(cards: &[Card], now: DateTime<Utc>, want: Availability) -> Vec<Card> {
    cards
        .iter()
        .filter(|c| c.availability(now) == want)
        .cloned()
        .collect()
}
