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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;
use crate::fsrs::DEFAULT_DESIRED_RETENTION;
use crate::fsrs::Difficulty;
use crate::fsrs::Stability;
use crate::types::card_id::CardId;
use crate::types::review_log::ReviewLog;
use crate::types::timestamp::Timestamp;

/// The default upper bound on a card's interval, in days.
pub const DEFAULT_MAX_INTERVAL: f64 = 36500.0;

/// Which model schedules a card.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Graded by recall, scheduled by the memory model.
    Item,
    /// Read incrementally, scheduled by the progress model.
    Topic,
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Item => "item",
            Category::Topic => "topic",
        }
    }

    pub(crate) fn with_article(&self) -> &str {
        match self {
            Category::Item => "an item",
            Category::Topic => "a topic",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Category {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "item" => Ok(Category::Item),
            "topic" => Ok(Category::Topic),
            _ => fail(format!("invalid category: {value}")),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum CardState {
    New,
    Learning,
    Review,
    Relearning,
}

/// How far a topic has been read.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comprehension {
    #[default]
    Unread,
    Browsed,
    Partial,
    /// Never rescheduled again.
    Mastered,
}

impl TryFrom<String> for Comprehension {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "unread" => Ok(Comprehension::Unread),
            "browsed" => Ok(Comprehension::Browsed),
            "partial" => Ok(Comprehension::Partial),
            "mastered" => Ok(Comprehension::Mastered),
            _ => fail(format!("invalid comprehension level: {value}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    /// Zero until the first grading.
    pub difficulty: Difficulty,
    /// Zero until the first grading.
    pub stability: Stability,
    pub desired_retention: f64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            difficulty: 0.0,
            stability: 0.0,
            desired_retention: DEFAULT_DESIRED_RETENTION,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicState {
    pub comprehension: Comprehension,
}

/// Category-specific card data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum CardKind {
    Item(MemoryState),
    Topic(TopicState),
}

impl CardKind {
    pub fn new(category: Category) -> Self {
        match category {
            Category::Item => CardKind::Item(MemoryState::default()),
            Category::Topic => CardKind::Topic(TopicState::default()),
        }
    }
}

/// A schedulable card. Operations never mutate a card in place: they take a
/// reference and return the replacement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
    pub state: CardState,
    /// `None` until the card is first scheduled.
    pub due: Option<Timestamp>,
    /// In [0, 100]. Lower values rank earlier in ascending order.
    pub priority: f64,
    /// Rank after the last global re-prioritisation.
    pub position: usize,
    pub scheduled_days: f64,
    pub max_interval: f64,
    pub last_review: Option<Timestamp>,
    pub postpones: u32,
    pub review_logs: Vec<ReviewLog>,
}

impl Card {
    pub fn category(&self) -> Category {
        match self.kind {
            CardKind::Item(_) => Category::Item,
            CardKind::Topic(_) => Category::Topic,
        }
    }

    pub fn is_new(&self) -> bool {
        self.state == CardState::New
    }

    pub fn memory(&self) -> Option<&MemoryState> {
        match &self.kind {
            CardKind::Item(memory) => Some(memory),
            CardKind::Topic(_) => None,
        }
    }

    /// Days since the last review, or zero if the card was never reviewed.
    pub fn elapsed_days(&self, now: Timestamp) -> f64 {
        match self.last_review {
            Some(last_review) => now.days_since(last_review),
            None => 0.0,
        }
    }

    /// Number of logged events past the initial `New` entry.
    pub fn repetitions(&self) -> usize {
        self.review_logs
            .iter()
            .filter(|log| log.state > CardState::New)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::create_card;
    use crate::error::Fallible;

    fn now() -> Fallible<Timestamp> {
        Timestamp::from_millis(1_700_000_000_000)
    }

    #[test]
    fn test_new_item_defaults() -> Fallible<()> {
        let card = create_card("1", Category::Item, 50.0, now()?);
        assert_eq!(card.id, CardId::new("1"));
        assert_eq!(card.category(), Category::Item);
        assert_eq!(card.state, CardState::New);
        assert_eq!(card.due, None);
        let memory = card.memory().copied().unwrap_or_default();
        assert_eq!(memory.difficulty, 0.0);
        assert_eq!(memory.stability, 0.0);
        assert_eq!(memory.desired_retention, DEFAULT_DESIRED_RETENTION);
        assert!(card.priority >= 50.0 && card.priority < 51.0);
        assert_eq!(card.review_logs.len(), 1);
        assert_eq!(card.review_logs[0].state, CardState::New);
        assert_eq!(card.repetitions(), 0);
        Ok(())
    }

    #[test]
    fn test_new_topic_defaults() -> Fallible<()> {
        let card = create_card("topic", Category::Topic, 30.0, now()?);
        assert_eq!(card.category(), Category::Topic);
        assert!(card.memory().is_none());
        assert_eq!(
            card.kind,
            CardKind::Topic(TopicState {
                comprehension: Comprehension::Unread
            })
        );
        Ok(())
    }

    #[test]
    fn test_elapsed_days() -> Fallible<()> {
        let now = now()?;
        let mut card = create_card("a", Category::Item, 1.0, now);
        assert_eq!(card.elapsed_days(now), 0.0);
        card.last_review = Some(now.add_days(-2.0));
        assert_eq!(card.elapsed_days(now), 2.0);
        Ok(())
    }

    #[test]
    fn test_json_roundtrip() -> Fallible<()> {
        let card = create_card("a", Category::Item, 10.0, now()?);
        let json = serde_json::to_string(&card)?;
        assert!(json.contains(r#""kind":{"category":"item""#));
        let back: Card = serde_json::from_str(&json)?;
        assert_eq!(back, card);
        let topic = create_card("b", Category::Topic, 10.0, now()?);
        let back: Card = serde_json::from_str(&serde_json::to_string(&topic)?)?;
        assert_eq!(back, topic);
        Ok(())
    }
}
