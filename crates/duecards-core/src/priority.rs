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

use crate::error::Fallible;
use crate::error::fail;
use crate::rng::fnv1a;
use crate::types::card::Card;
use crate::types::card_id::CardId;

pub const MIN_PRIORITY: f64 = 0.0;
pub const MAX_PRIORITY: f64 = 100.0;

/// Upper bound (exclusive) on the jitter added to a requested priority.
pub const JITTER_SCALE: f64 = 0.9999;

const U32_RANGE: f64 = 4_294_967_296.0;

/// A value in [0, 1) derived from the card id alone.
pub fn jitter(id: &CardId) -> f64 {
    fnv1a(id.as_str().as_bytes()) as f64 / U32_RANGE
}

/// A copy of `card` with priority `requested` plus the card's jitter, clamped
/// to [0, 100].
pub fn apply_priority(card: &Card, requested: f64) -> Card {
    let requested = if requested.is_nan() { 0.0 } else { requested };
    let priority = (requested + jitter(&card.id) * JITTER_SCALE).clamp(MIN_PRIORITY, MAX_PRIORITY);
    Card {
        priority,
        ..card.clone()
    }
}

/// Sort by priority (stable) and renumber `position` by rank.
pub fn reposition(cards: &[Card]) -> Vec<Card> {
    let mut cards = cards.to_vec();
    cards.sort_by(|a, b| a.priority.total_cmp(&b.priority));
    for (position, card) in cards.iter_mut().enumerate() {
        card.position = position;
    }
    cards
}

/// Re-prioritise the card with the given id, then reposition the whole
/// collection.
pub fn set_priority(cards: &[Card], id: &CardId, requested: f64) -> Fallible<Vec<Card>> {
    let Some(index) = cards.iter().position(|card| &card.id == id) else {
        return fail(format!("no card with id '{id}'"));
    };
    let mut cards = cards.to_vec();
    cards[index] = apply_priority(&cards[index], requested);
    log::debug!("Set priority of '{id}' to {:.4}.", cards[index].priority);
    Ok(reposition(&cards))
}
