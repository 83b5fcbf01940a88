use anyhow::Result;
use recall_core::{DeckId, DeckStore, ReviewSession, SessionState, Unavailable};
use std::io::{BufRead, Write};

enum Reply {
    Line(String),
    Quit,
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Reply> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        return Ok(Reply::Quit);
    }
    let s = s.trim().to_lowercase();
    if s == "q" || s == "quit" {
        return Ok(Reply::Quit);
    }
    Ok(Reply::Line(s))
}

pub fn run_review<R: BufRead, W: Write>(
    store: &mut DeckStore,
    deck_id: DeckId,
    input: &mut R,
    out: &mut W,
) -> Result<SessionState> {
    let mut session = ReviewSession::start(store, deck_id);
    drive(store, &mut session, input, out)
}

/// Runs the prompt loop until the session ends or the user quits.
pub fn drive<R: BufRead, W: Write>(
    store: &mut DeckStore,
    session: &mut ReviewSession,
    input: &mut R,
    out: &mut W,
) -> Result<SessionState> {
    let deck_name = store
        .deck(session.deck_id())
        .map(|d| d.name.clone())
        .unwrap_or_default();

    loop {
        match session.state() {
            SessionState::InProgress => {}
            SessionState::Complete => {
                let s = session.summary();
                writeln!(out, "\nReview complete! All cards reached 10 correct reviews in a row.")?;
                writeln!(out, "Correct: {} | Incorrect: {}", s.correct, s.incorrect)?;
                writeln!(out, "Completed in {} review cycle(s).", s.cycles)?;
                writeln!(out, "These cards are on cooldown and come back in one week.")?;
                return Ok(session.state());
            }
            SessionState::Unavailable(why) => {
                let msg = match why {
                    Unavailable::DeckNotFound => "Deck not found.",
                    Unavailable::NoEligibleCards => {
                        "No cards available: every card is on cooldown or the deck is empty. Come back later."
                    }
                    Unavailable::DeckChanged => "The deck changed during review; stopping.",
                };
                writeln!(out, "{msg}")?;
                return Ok(session.state());
            }
        }

        let Some(card) = session.current_card().cloned() else {
            return Ok(session.state());
        };
        let remaining = session.remaining_for_mastery().unwrap_or(0);
        writeln!(
            out,
            "\n[{deck_name}] card {} of {} (cycle {}) - {}/{} mastered",
            session.current_index() + 1,
            session.cycle_len(),
            session.review_cycle(),
            session.completed_cards().len(),
            session.available_at_start()
        )?;
        writeln!(out, "{remaining} more correct review(s) until mastered")?;
        writeln!(out, "Q: {}", card.front)?;
        if let Reply::Quit = prompt(input, out, "[enter=show, q=quit] ")? {
            return stop(session, out);
        }
        writeln!(out, "A: {}", card.back)?;

        let was_correct = loop {
            match prompt(input, out, "correct? [y/n, q=quit] ")? {
                Reply::Quit => return stop(session, out),
                Reply::Line(s) => match s.as_str() {
                    "y" | "yes" | "1" => break true,
                    "n" | "no" | "0" => break false,
                    _ => writeln!(out, "enter y, n, or q")?,
                },
            }
        };
        session.answer(store, card.id, was_correct)?;
    }
}

fn stop<W: Write>(session: &ReviewSession, out: &mut W) -> Result<SessionState> {
    let s = session.summary();
    writeln!(
        out,
        "\nStopped. Correct: {} | Incorrect: {} | Mastered: {}/{}",
        s.correct, s.incorrect, s.mastered, s.available_at_start
    )?;
    Ok(session.state())
}
