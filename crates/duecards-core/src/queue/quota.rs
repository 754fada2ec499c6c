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

use crate::queue::QueueParams;
use crate::types::card::Card;
use crate::types::card::Category;

#[derive(Default)]
struct Counter {
    total: usize,
    new: usize,
}

impl Counter {
    /// Count the card if there is still room for it.
    fn admit(&mut self, is_new: bool, max_total: usize, max_new: usize) -> bool {
        if self.total >= max_total || (is_new && self.new >= max_new) {
            return false;
        }
        self.total += 1;
        if is_new {
            self.new += 1;
        }
        true
    }
}

/// Split a ranked sequence into the cards that fit today's limits and the
/// ones that do not, preserving order within each.
pub fn apply_daily_limits(cards: &[Card], params: &QueueParams) -> (Vec<Card>, Vec<Card>) {
    let mut items = Counter::default();
    let mut topics = Counter::default();
    let mut outstanding = Vec::new();
    let mut postponed = Vec::new();
    for card in cards {
        let admitted = match card.category() {
            Category::Item => items.admit(
                card.is_new(),
                params.max_items_per_day,
                params.max_new_items_per_day,
            ),
            Category::Topic => topics.admit(
                card.is_new(),
                params.max_topics_per_day,
                params.max_new_topics_per_day,
            ),
        };
        if admitted {
            outstanding.push(card.clone());
        } else {
            postponed.push(card.clone());
        }
    }
    (outstanding, postponed)
}
