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

//! Building a day's queue.
//!
//! The pipeline runs over the whole collection at once: the candidates are
//! the new cards and everything due on or before today, each category is
//! ranked on its own, the two rankings are interleaved, and the daily limits
//! split the result into what to review today and what to postpone.

pub mod interleave;
pub mod quota;
pub mod score;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::fsrs::Weights;
use crate::queue::interleave::interleave;
use crate::queue::quota::apply_daily_limits;
use crate::queue::score::sort_cards;
use crate::types::card::Card;
use crate::types::card::CardState;
use crate::types::card::Category;
use crate::types::timestamp::Timestamp;

/// Sort order of the ranking score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl TryFrom<String> for Direction {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "asc" | "ascending" => Ok(Direction::Ascending),
            "desc" | "descending" => Ok(Direction::Descending),
            _ => fail(format!("invalid direction: {value}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueParams {
    /// Zero keeps items out of the queue entirely.
    pub max_items_per_day: usize,
    pub max_topics_per_day: usize,
    pub max_new_items_per_day: usize,
    pub max_new_topics_per_day: usize,
    /// Share of priority, as opposed to noise, in an item's rank.
    pub item_priority_ratio: f64,
    pub topic_priority_ratio: f64,
    /// Share of urgency in an item's rank.
    pub odds_weight: f64,
    /// Topics per item when merging the two rankings.
    pub topic_to_item_ratio: f64,
    pub direction: Direction,
}

impl Default for QueueParams {
    fn default() -> Self {
        Self {
            max_items_per_day: 100,
            max_topics_per_day: 20,
            max_new_items_per_day: 20,
            max_new_topics_per_day: 5,
            item_priority_ratio: 0.5,
            topic_priority_ratio: 0.5,
            odds_weight: 0.5,
            topic_to_item_ratio: 0.25,
            direction: Direction::Ascending,
        }
    }
}

impl QueueParams {
    pub fn validate(&self) -> Fallible<()> {
        let unit = [
            ("item_priority_ratio", self.item_priority_ratio),
            ("topic_priority_ratio", self.topic_priority_ratio),
            ("odds_weight", self.odds_weight),
        ];
        for (name, value) in unit {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return fail(format!("{name} must be between 0 and 1, got {value}"));
            }
        }
        if !self.topic_to_item_ratio.is_finite() || self.topic_to_item_ratio <= 0.0 {
            return fail(format!(
                "topic_to_item_ratio must be a positive number, got {}",
                self.topic_to_item_ratio
            ));
        }
        Ok(())
    }
}

/// The result of [`generate_outstanding_queue`].
#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct OutstandingQueue {
    /// Today's cards, in review order.
    pub outstanding: Vec<Card>,
    /// Candidates that did not fit today's limits.
    pub postponed: Vec<Card>,
}

/// Cards in the given state.
pub fn filter_cards(cards: &[Card], state: CardState) -> Vec<Card> {
    cards.iter().filter(|c| c.state == state).cloned().collect()
}

/// Cards that can be reviewed today: unscheduled new cards, and cards due on
/// or before the date of `now`. A due date always wins, so a new card that was
/// skipped or given a date waits for it.
pub fn due_cards(cards: &[Card], now: Timestamp) -> Vec<Card> {
    let today = now.date();
    cards
        .iter()
        .filter(|card| card.due.map_or(card.is_new(), |due| due.date() <= today))
        .cloned()
        .collect()
}

pub fn generate_outstanding_queue(
    cards: &[Card],
    now: Timestamp,
    params: &QueueParams,
    weights: &Weights,
) -> Fallible<OutstandingQueue> {
    params.validate()?;
    let candidates = due_cards(cards, now);
    let (items, topics): (Vec<Card>, Vec<Card>) = candidates
        .into_iter()
        .partition(|card| card.category() == Category::Item);
    let items = sort_cards(&items, now, params, params.direction, weights);
    let topics = sort_cards(&topics, now, params, params.direction, weights);
    let merged = interleave(&items, &topics, params.topic_to_item_ratio);
    let (outstanding, postponed) = apply_daily_limits(&merged, params);
    log::debug!(
        "Queue: {} candidates ({} items, {} topics), {} outstanding, {} postponed.",
        merged.len(),
        items.len(),
        topics.len(),
        outstanding.len(),
        postponed.len()
    );
    Ok(OutstandingQueue {
        outstanding,
        postponed,
    })
}
