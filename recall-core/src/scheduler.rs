use crate::{Card, COOLDOWN_DAYS};
use chrono::{DateTime, Duration, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub review_count: u32,
    pub mastered: bool,
    pub next_review_date: Option<DateTime<Utc>>,
}

pub fn cooldown_period() -> Duration {
    Duration::days(COOLDOWN_DAYS)
}

/// Applies one answer to `card`.
///
/// A correct answer extends the streak and, once the streak reaches
/// [`MASTERY_THRESHOLD`](crate::MASTERY_THRESHOLD), puts the card on
/// cooldown until `now + 7 days`.
/// An incorrect answer drops the streak to zero and clears any cooldown.
pub fn record_answer(card: &mut Card, was_correct: bool, now: DateTime<Utc>) -> AnswerOutcome {
    card.last_reviewed = Some(now);

    if was_correct {
        card.review_count = card.review_count.saturating_add(1);
        if card.is_mastered() {
            card.next_review_date = Some(now + cooldown_period());
        }
    } else {
        card.review_count = 0;
        card.next_review_date = None;
    }

    AnswerOutcome {
        review_count: card.review_count,
        mastered: was_correct && card.is_mastered(),
        next_review_date: card.next_review_date,
    }
}

/// Clears an elapsed cooldown and restarts the streak. Returns false when
/// there is no cooldown or it has not ended yet.
pub fn expire_cooldown(card: &mut Card, now: DateTime<Utc>) -> bool {
    match card.next_review_date {
        Some(next) if next <= now => {
            card.next_review_date = None;
            card.review_count = 0;
            true
        }
        _ => false,
    }
}
