use crate::cli::opts::*;
use crate::cli::review::run_review;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local, Utc};
use recall_core::{
    deck_progress, filter_cards, search_decks, Availability, Card, CardId, DeckId, DeckStore,
    SUPPORTED_LANGUAGES,
};
use std::io::{stdin, stdout};
use uuid::Uuid;

pub fn run_cli(cmd: Command, store: &mut DeckStore) -> Result<()> {
    match cmd {
        Command::Deck(cmd) => deck_cmd(store, cmd),
        Command::Card(cmd) => card_cmd(store, cmd),
        Command::Search { query } => search_cmd(store, &query),
        Command::Stats { deck } => stats_cmd(store, deck),
        Command::Review(cmd) => review_cmd(store, cmd),
        Command::Languages => {
            for (code, name) in SUPPORTED_LANGUAGES {
                println!("{code}\t{name}");
            }
            Ok(())
        }
    }
}

fn deck_cmd(store: &mut DeckStore, cmd: DeckCmd) -> Result<()> {
    match cmd {
        DeckCmd::Add { name, description } => {
            let name = require_text(&name, "deck name is required")?;
            let id = store.add_deck(name, description.trim());
            println!("{id}");
        }
        DeckCmd::List => {
            let current = store.current_deck_id();
            for d in store.decks() {
                let marker = if Some(d.id) == current { "*" } else { " " };
                let noun = if d.cards.len() == 1 { "card" } else { "cards" };
                println!(
                    "{}\t{marker} {}\t{} {noun}\tlast reviewed: {}",
                    d.id,
                    d.name,
                    d.cards.len(),
                    fmt_day(d.last_reviewed)
                );
            }
        }
        DeckCmd::Edit { deck, name, description } => {
            let id = resolve_deck(store, &deck)?;
            let (old_name, old_description) = store
                .deck(id)
                .map(|d| (d.name.clone(), d.description.clone()))
                .ok_or_else(|| anyhow!("deck not found: {deck}"))?;
            let name = name.unwrap_or(old_name);
            let name = require_text(&name, "deck name is required")?;
            let description = description.unwrap_or(old_description);
            store.edit_deck(id, name, description.trim());
            println!("ok");
        }
        DeckCmd::Rm { deck } => {
            let id = resolve_deck(store, &deck)?;
            store.delete_deck(id);
            println!("ok");
        }
        DeckCmd::Use { deck } => {
            let id = resolve_deck(store, &deck)?;
            store.set_current_deck(id);
            println!("ok");
        }
    }
    Ok(())
}

fn card_cmd(store: &mut DeckStore, cmd: CardCmd) -> Result<()> {
    match cmd {
        CardCmd::Add(a) => {
            let deck = resolve_deck(store, &a.deck)?;
            let (front, back) = require_sides(&a.front, &a.back)?;
            let id = store
                .add_card(deck, front, back)
                .ok_or_else(|| anyhow!("deck not found: {}", a.deck))?;
            println!("{id}");
        }
        CardCmd::List { deck, query } => {
            let ids: Vec<DeckId> = match deck {
                Some(sel) => vec![resolve_deck(store, &sel)?],
                None => store.decks().iter().map(|d| d.id).collect(),
            };
            let now = store.now();
            for id in ids {
                let Some(d) = store.deck(id) else { continue };
                for c in filter_cards(&d.cards, query.as_deref().unwrap_or("")) {
                    println!(
                        "{}\t{}\t{}\tdeck={}\tstreak={}\t{}",
                        c.id,
                        c.front,
                        c.back,
                        d.name,
                        c.review_count,
                        availability_label(&c, now)
                    );
                }
            }
        }
        CardCmd::Edit(e) => {
            let deck = resolve_deck(store, &e.deck)?;
            let card_id = parse_uuid(&e.card_id)?;
            let card = store
                .card(deck, card_id)
                .ok_or_else(|| anyhow!("card not found: {}", e.card_id))?;
            let front = e.front.unwrap_or_else(|| card.front.clone());
            let back = e.back.unwrap_or_else(|| card.back.clone());
            let (front, back) = require_sides(&front, &back)?;
            store.edit_card(deck, card_id, front, back);
            println!("ok");
        }
        CardCmd::Rm { card_id, deck } => {
            let deck = resolve_deck(store, &deck)?;
            let card_id = parse_uuid(&card_id)?;
            if !store.delete_card(deck, card_id) {
                bail!("card not found: {card_id}");
            }
            println!("ok");
        }
    }
    Ok(())
}

fn search_cmd(store: &DeckStore, query: &str) -> Result<()> {
    if query.trim().is_empty() {
        bail!("enter a search term to find cards across all decks");
    }
    let hits = search_decks(store.decks(), query);
    if hits.is_empty() {
        println!("no cards found matching \"{query}\"");
        return Ok(());
    }
    for h in hits {
        println!("{}\t{}\t{}\tfrom deck: {}", h.card.id, h.card.front, h.card.back, h.deck_name);
    }
    Ok(())
}

fn stats_cmd(store: &DeckStore, deck: Option<String>) -> Result<()> {
    let ids: Vec<DeckId> = match deck {
        Some(sel) => vec![resolve_deck(store, &sel)?],
        None => store.decks().iter().map(|d| d.id).collect(),
    };
    let now = store.now();
    for d in ids.into_iter().filter_map(|id| store.deck(id)) {
        let p = deck_progress(d, now);
        println!(
            "{}\ttotal={}\tavailable={}\tin_progress={}\ton_cooldown={}\tlast reviewed: {}",
            d.name,
            p.total,
            p.available,
            p.in_progress,
            p.on_cooldown,
            fmt_day(d.last_reviewed)
        );
    }
    Ok(())
}

fn review_cmd(store: &mut DeckStore, cmd: ReviewCmd) -> Result<()> {
    let deck = match cmd.deck {
        Some(sel) => resolve_deck(store, &sel)?,
        None => store
            .current_deck_id()
            .ok_or_else(|| anyhow!("no current deck; pass --deck or run `deck use`"))?,
    };
    let mut input = stdin().lock();
    let mut out = stdout();
    run_review(store, deck, &mut input, &mut out)?;
    Ok(())
}

// ===== Helpers =====

fn parse_uuid(s: &str) -> Result<CardId> {
    Uuid::parse_str(s.trim()).map_err(|_| anyhow!("invalid uuid: {s}"))
}

/// Accepts a deck id or a case-insensitive deck name.
pub fn resolve_deck(store: &DeckStore, sel: &str) -> Result<DeckId> {
    if let Ok(id) = Uuid::parse_str(sel.trim()) {
        if store.deck(id).is_some() {
            return Ok(id);
        }
    }
    let wanted = sel.trim().to_lowercase();
    store
        .decks()
        .iter()
        .find(|d| d.name.to_lowercase() == wanted)
        .map(|d| d.id)
        .ok_or_else(|| anyhow!("deck not found: {sel}"))
}

fn require_text<'a>(s: &'a str, msg: &'static str) -> Result<&'a str> {
    let t = s.trim();
    if t.is_empty() {
        bail!(msg);
    }
    Ok(t)
}

fn require_sides<'a>(front: &'a str, back: &'a str) -> Result<(&'a str, &'a str)> {
    if front.trim().is_empty() || back.trim().is_empty() {
        bail!("both front and back text are required");
    }
    Ok((front, back))
}

fn availability_label(card: &Card, now: DateTime<Utc>) -> String {
    match card.availability(now) {
        Availability::Available => "available".to_string(),
        Availability::CooldownExpired => "cooldown over".to_string(),
        Availability::OnCooldown => {
            format!("on cooldown until {}", fmt_day(card.next_review_date))
        }
    }
}

fn fmt_day(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "never".to_string())
}
