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

use clap::ValueEnum;
use duecards_core::card::ReadingAction;
use duecards_core::card::apply_reading_action;
use duecards_core::card::create_card;
use duecards_core::card::grade;
use duecards_core::card::next_reading_step;
use duecards_core::card::predict_rating_intervals;
use duecards_core::error::Fallible;
use duecards_core::error::fail;
use duecards_core::fsrs::Rating;
use duecards_core::priority::reposition;
use duecards_core::types::card::Card;
use duecards_core::types::card::Category;
use duecards_core::types::card::Comprehension;
use duecards_core::types::card_id::CardId;
use duecards_core::types::timestamp::Timestamp;

use crate::store::CardStore;
use crate::store::find;
use crate::store::replace;

pub fn create(
    directory: Option<String>,
    id: String,
    topic: bool,
    priority: f64,
    now: Timestamp,
) -> Fallible<()> {
    let store = CardStore::open(directory)?;
    let cards = store.load()?;
    let id = CardId::new(id);
    if cards.iter().any(|card| card.id == id) {
        return fail(format!("a card with id '{id}' already exists"));
    }
    let category = if topic { Category::Topic } else { Category::Item };
    let card = create_card(id, category, priority, now);
    println!("Created {category} '{}' with priority {:.4}.", card.id, card.priority);
    let mut cards = cards;
    cards.push(card);
    store.save(&reposition(&cards))
}

fn describe_due(card: &Card) -> String {
    match card.due {
        Some(due) => format!("due {due} ({:.2} days)", card.scheduled_days),
        None => "not scheduled".to_string(),
    }
}

pub fn grade_card(
    directory: Option<String>,
    id: String,
    rating: String,
    duration_ms: Option<u64>,
    now: Timestamp,
) -> Fallible<()> {
    let store = CardStore::open(directory)?;
    let weights = store.config()?.weights()?;
    let rating = Rating::try_from(rating)?;
    let cards = store.load()?;
    let card = find(&cards, &CardId::new(id))?;
    let card = grade(card, rating, now, duration_ms, &weights)?;
    println!("Graded '{}' {rating}: {}.", card.id, describe_due(&card));
    store.save(&replace(&cards, card)?)
}

pub fn preview(directory: Option<String>, id: String, now: Timestamp) -> Fallible<()> {
    let store = CardStore::open(directory)?;
    let weights = store.config()?.weights()?;
    let cards = store.load()?;
    let card = find(&cards, &CardId::new(id))?;
    for (rating, days) in predict_rating_intervals(card, now, &weights)? {
        println!("{rating}: {days:.2} days");
    }
    Ok(())
}

#[derive(ValueEnum, Clone, Copy)]
pub enum ReadAction {
    /// Read the topic and schedule the next reading.
    Step,
    /// Skip it for now.
    Skip,
    /// Read part of it; see `--level`.
    Partial,
    /// Finish it; it will not be scheduled again.
    Done,
}

impl Display for ReadAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadAction::Step => write!(f, "step"),
            ReadAction::Skip => write!(f, "skip"),
            ReadAction::Partial => write!(f, "partial"),
            ReadAction::Done => write!(f, "done"),
        }
    }
}

pub fn read(
    directory: Option<String>,
    id: String,
    action: ReadAction,
    level: Option<String>,
    duration_ms: Option<u64>,
    now: Timestamp,
) -> Fallible<()> {
    let store = CardStore::open(directory)?;
    let config = store.config()?;
    let cards = store.load()?;
    let card = find(&cards, &CardId::new(id))?;
    let ladder = &config.ladder;
    let card = match action {
        ReadAction::Step => next_reading_step(card, now, duration_ms, &config.progress)?,
        ReadAction::Skip => apply_reading_action(card, ReadingAction::Skip, now, ladder)?,
        ReadAction::Partial => {
            let Some(level) = level else {
                return fail("--action partial needs a --level.");
            };
            let level = Comprehension::try_from(level)?;
            apply_reading_action(card, ReadingAction::Partial(level), now, ladder)?
        }
        ReadAction::Done => apply_reading_action(card, ReadingAction::Done, now, ladder)?,
    };
    println!("Read '{}' ({action}): {}.", card.id, describe_due(&card));
    store.save(&replace(&cards, card)?)
}
