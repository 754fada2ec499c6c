// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use duecards_core::error::Fallible;
use duecards_core::postpone::filter_safe_postponable_cards;
use duecards_core::postpone::postpone;
use duecards_core::queue::OutstandingQueue;
use duecards_core::queue::generate_outstanding_queue;
use duecards_core::types::card::Card;
use duecards_core::types::card_id::CardId;
use duecards_core::types::timestamp::Timestamp;

use crate::store::CardStore;
use crate::store::replace;

#[derive(ValueEnum, Clone, Copy)]
pub enum QueueFormat {
    /// One line per card.
    Text,
    /// JSON output.
    Json,
}

impl Display for QueueFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueFormat::Text => write!(f, "text"),
            QueueFormat::Json => write!(f, "json"),
        }
    }
}

fn build_queue(store: &CardStore, cards: &[Card], now: Timestamp) -> Fallible<OutstandingQueue> {
    let config = store.config()?;
    generate_outstanding_queue(cards, now, &config.queue, &config.weights()?)
}

fn render_text(queue: &OutstandingQueue) -> String {
    let mut out = String::new();
    for (i, card) in queue.outstanding.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {} [{}] {:?} priority={:.2}\n",
            i + 1,
            card.id,
            card.category(),
            card.state,
            card.priority
        ));
    }
    out.push_str(&format!(
        "{} outstanding, {} postponed\n",
        queue.outstanding.len(),
        queue.postponed.len()
    ));
    out
}

pub fn print_queue(directory: Option<String>, format: QueueFormat, now: Timestamp) -> Fallible<()> {
    let store = CardStore::open(directory)?;
    let cards = store.load()?;
    let queue = build_queue(&store, &cards, now)?;
    match format {
        QueueFormat::Text => print!("{}", render_text(&queue)),
        QueueFormat::Json => println!("{}", serde_json::to_string_pretty(&queue)?),
    }
    Ok(())
}

/// The cards named by `ids`, each once, in the order first given. Unknown ids
/// are skipped.
fn named_cards(cards: &[Card], ids: Vec<String>) -> Vec<Card> {
    let mut seen = BTreeSet::new();
    let mut targets = Vec::new();
    for id in ids {
        let id = CardId::new(id);
        if !seen.insert(id.clone()) {
            continue;
        }
        match cards.iter().find(|card| card.id == id) {
            Some(card) => targets.push(card.clone()),
            None => log::warn!("Skipping unknown card '{id}'."),
        }
    }
    targets
}

/// Postpone the given cards, or, if none are given, the safe subset of
/// those that did not fit in today's queue.
pub fn postpone_cards(directory: Option<String>, ids: Vec<String>, now: Timestamp) -> Fallible<()> {
    let store = CardStore::open(directory)?;
    let cards = store.load()?;
    let targets: Vec<Card> = if ids.is_empty() {
        let weights = store.config()?.weights()?;
        let queue = build_queue(&store, &cards, now)?;
        filter_safe_postponable_cards(&queue.postponed, now, &weights)
    } else {
        named_cards(&cards, ids)
    };
    let mut cards = cards;
    for card in postpone(&targets, now) {
        cards = replace(&cards, card)?;
    }
    println!("Postponed {} cards.", targets.len());
    store.save(&cards)
}
