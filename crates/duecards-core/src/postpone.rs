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

use crate::fsrs::Weights;
use crate::queue::score::odds_ratio;
use crate::rng::seed_from_str;
use crate::rng::unit_from_seed;
use crate::types::card::Card;
use crate::types::card::CardKind;
use crate::types::timestamp::Timestamp;

/// Items more overdue than this are not safe to push back.
pub const SAFE_POSTPONE_ODDS_RATIO: f64 = 0.5;

/// Push each card's due date back by a slightly grown interval. The growth
/// is between 5% and 10% of the current interval, derived from the id and
/// the interval so that repeated calls are reproducible.
pub fn postpone(cards: &[Card], now: Timestamp) -> Vec<Card> {
    cards.iter().map(|card| postpone_card(card, now)).collect()
}

fn postpone_card(card: &Card, now: Timestamp) -> Card {
    let scheduled = card.scheduled_days;
    let rand = unit_from_seed(seed_from_str(&format!("{}{}", card.id, scheduled)));
    let delay = card.elapsed_days(now) - scheduled;
    let grown = (scheduled * (1.05 + 0.05 * rand)).ceil() + delay;
    let scheduled_days = grown.max(1.0).min(card.max_interval);
    log::trace!(
        "Postponing '{}' by {scheduled_days:.2} days (was {scheduled:.2}).",
        card.id
    );
    Card {
        due: card.due.map(|due| due.add_days(scheduled_days)),
        scheduled_days,
        postpones: card.postpones + 1,
        ..card.clone()
    }
}

/// The cards that can be postponed without much risk: all topics, all new
/// cards, and items that are not too far past their desired retention.
pub fn filter_safe_postponable_cards(cards: &[Card], now: Timestamp, weights: &Weights) -> Vec<Card> {
    cards
        .iter()
        .filter(|card| match card.kind {
            CardKind::Topic(_) => true,
            CardKind::Item(_) if card.is_new() => true,
            CardKind::Item(_) => {
                odds_ratio(card, now, weights).is_some_and(|o| o <= SAFE_POSTPONE_ODDS_RATIO)
            }
        })
        .cloned()
        .collect()
}
