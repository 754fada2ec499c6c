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
use crate::fsrs::retrievability;
use crate::queue::Direction;
use crate::queue::QueueParams;
use crate::rng::seed_from_timestamp;
use crate::rng::unit_from_seed;
use crate::types::card::Card;
use crate::types::card::CardKind;
use crate::types::timestamp::Timestamp;

/// How overdue an item is relative to its target retention. Zero when the
/// item is exactly at its desired retention, negative before that, positive
/// after. `None` for topics and for items that were never graded.
pub fn odds_ratio(card: &Card, now: Timestamp, weights: &Weights) -> Option<f64> {
    let CardKind::Item(memory) = card.kind else {
        return None;
    };
    let r = retrievability(card.elapsed_days(now), memory.stability, weights);
    if r <= 0.0 {
        return None;
    }
    let desired = memory.desired_retention;
    let odds = (1.0 / r - 1.0) / (1.0 / desired - 1.0) - 1.0;
    odds.is_finite().then_some(odds)
}

/// Blend normalized priority with noise. `weight` is the share of priority.
fn mix(weight: f64, priority: f64, noise: f64) -> f64 {
    if weight <= 0.0 {
        noise
    } else if weight >= 1.0 {
        priority
    } else {
        weight * priority + (1.0 - weight) * noise
    }
}

/// The observed range of some values, or `fallback` if there are none.
/// A degenerate range has width one.
fn range(values: impl Iterator<Item = f64>, fallback: (f64, f64)) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let (min, max) = if min.is_finite() { (min, max) } else { fallback };
    let width = max - min;
    (min, if width > 0.0 { width } else { 1.0 })
}

/// Rank cards by a composite of priority, per-day noise and, for items,
/// urgency. Equal scores keep their input order.
pub fn sort_cards(
    cards: &[Card],
    now: Timestamp,
    params: &QueueParams,
    direction: Direction,
    weights: &Weights,
) -> Vec<Card> {
    let odds: Vec<Option<f64>> = cards.iter().map(|c| odds_ratio(c, now, weights)).collect();
    let (min_p, range_p) = range(cards.iter().map(|c| c.priority), (0.0, 1.0));
    let (min_o, range_o) = range(odds.iter().flatten().copied(), (0.0, 1.0));
    let now_seed = seed_from_timestamp(now);

    let mut scored: Vec<(f64, &Card)> = cards
        .iter()
        .zip(&odds)
        .map(|(card, odds)| {
            let norm_p = (card.priority - min_p) / range_p;
            let noise = unit_from_seed(now_seed ^ card.id.seed());
            let score = match card.kind {
                CardKind::Item(_) => {
                    let mixed = mix(params.item_priority_ratio, norm_p, noise);
                    let norm_o = odds.map(|o| (o - min_o) / range_o).unwrap_or(0.0);
                    params.odds_weight * norm_o + (1.0 - params.odds_weight) * mixed
                }
                CardKind::Topic(_) => mix(params.topic_priority_ratio, norm_p, noise),
            };
            (score, card)
        })
        .collect();

    // `sort_by` is stable, so ties keep their input order in both directions.
    match direction {
        Direction::Ascending => scored.sort_by(|a, b| a.0.total_cmp(&b.0)),
        Direction::Descending => scored.sort_by(|a, b| b.0.total_cmp(&a.0)),
    }
    scored.into_iter().map(|(_, card)| card.clone()).collect()
}
