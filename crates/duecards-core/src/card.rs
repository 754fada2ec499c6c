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

//! Per-card operations: creation, grading, reading and manual rescheduling.
//! None of these look at any card other than the one they are given.

use std::collections::BTreeMap;

use crate::error::CategoryMismatch;
use crate::error::Fallible;
use crate::error::fail;
use crate::fsrs::Rating;
use crate::fsrs::Weights;
use crate::fsrs::interval;
use crate::fsrs::update_stability;
use crate::priority::apply_priority;
use crate::progress::LadderParams;
use crate::progress::ProgressParams;
use crate::progress::ladder_interval;
use crate::progress::next_interval;
use crate::progress::skip_interval;
use crate::types::card::Card;
use crate::types::card::CardKind;
use crate::types::card::CardState;
use crate::types::card::Category;
use crate::types::card::Comprehension;
use crate::types::card::DEFAULT_MAX_INTERVAL;
use crate::types::card::MemoryState;
use crate::types::card::TopicState;
use crate::types::card_id::CardId;
use crate::types::review_log::ReviewLog;
use crate::types::review_log::append_review_log;
use crate::types::timestamp::Timestamp;

/// A fresh, unscheduled card with a jittered priority and a creation log.
pub fn create_card(id: impl Into<CardId>, category: Category, priority: f64, now: Timestamp) -> Card {
    let id: CardId = id.into();
    let log = ReviewLog::new(&id, now, CardState::New);
    let card = Card {
        id,
        kind: CardKind::new(category),
        state: CardState::New,
        due: None,
        priority: 0.0,
        position: 0,
        scheduled_days: 0.0,
        max_interval: DEFAULT_MAX_INTERVAL,
        last_review: None,
        postpones: 0,
        review_logs: vec![log],
    };
    apply_priority(&card, priority)
}

fn item_memory(card: &Card) -> Fallible<MemoryState> {
    match card.kind {
        CardKind::Item(memory) => Ok(memory),
        CardKind::Topic(_) => Err(CategoryMismatch::new(&card.id, Category::Item).into()),
    }
}

fn topic_state(card: &Card) -> Fallible<TopicState> {
    match card.kind {
        CardKind::Topic(topic) => Ok(topic),
        CardKind::Item(_) => Err(CategoryMismatch::new(&card.id, Category::Topic).into()),
    }
}

/// A topic that can still be scheduled, i.e. one that is not mastered.
fn open_topic(card: &Card) -> Fallible<TopicState> {
    let topic = topic_state(card)?;
    if topic.comprehension == Comprehension::Mastered {
        return fail(format!("topic '{}' is mastered and is not scheduled again", card.id));
    }
    Ok(topic)
}

fn graded_state(previous: CardState, rating: Rating) -> CardState {
    if rating >= Rating::Good {
        return CardState::Review;
    }
    match previous {
        CardState::Review | CardState::Relearning => CardState::Relearning,
        CardState::New | CardState::Learning => CardState::Learning,
    }
}

/// Grade an item that was reviewed at `review_time`.
pub fn grade(
    card: &Card,
    rating: Rating,
    review_time: Timestamp,
    duration_ms: Option<u64>,
    weights: &Weights,
) -> Fallible<Card> {
    let memory = item_memory(card)?;
    let elapsed = card.elapsed_days(review_time);
    let update = update_stability(memory.difficulty, memory.stability, elapsed, rating, weights);
    let scheduled_days = interval(memory.desired_retention, update.stability, weights)
        .max(0.0)
        .min(card.max_interval);
    let state = graded_state(card.state, rating);
    let log = ReviewLog::new(&card.id, review_time, state)
        .with_rating(rating)
        .with_duration(duration_ms);
    log::trace!(
        "Graded '{}' {rating}: d={:.3} s={:.3} next in {scheduled_days:.2} days.",
        card.id,
        update.difficulty,
        update.stability
    );
    Ok(Card {
        kind: CardKind::Item(MemoryState {
            difficulty: update.difficulty,
            stability: update.stability,
            ..memory
        }),
        state,
        due: Some(review_time.add_days(scheduled_days)),
        scheduled_days,
        last_review: Some(review_time),
        review_logs: append_review_log(&card.review_logs, log),
        ..card.clone()
    })
}

/// The interval each rating would produce, without changing the card.
pub fn predict_rating_intervals(
    card: &Card,
    review_time: Timestamp,
    weights: &Weights,
) -> Fallible<BTreeMap<Rating, f64>> {
    let memory = item_memory(card)?;
    let elapsed = card.elapsed_days(review_time);
    let mut intervals = BTreeMap::new();
    for rating in Rating::ALL {
        let update = update_stability(memory.difficulty, memory.stability, elapsed, rating, weights);
        let days = interval(memory.desired_retention, update.stability, weights)
            .max(0.0)
            .min(card.max_interval);
        intervals.insert(rating, days);
    }
    Ok(intervals)
}

/// Record a reading of a topic and schedule the next one.
pub fn next_reading_step(
    card: &Card,
    review_time: Timestamp,
    duration_ms: Option<u64>,
    params: &ProgressParams,
) -> Fallible<Card> {
    open_topic(card)?;
    let state = CardState::Learning;
    let scheduled_days = next_interval(card.repetitions(), params).min(card.max_interval);
    let log = ReviewLog::new(&card.id, review_time, state).with_duration(duration_ms);
    Ok(Card {
        state,
        due: Some(review_time.add_days(scheduled_days)),
        scheduled_days,
        last_review: Some(review_time),
        review_logs: append_review_log(&card.review_logs, log),
        ..card.clone()
    })
}

/// What the reader did with a topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadingAction {
    /// Not read today. Comes back sooner the fewer times it was skipped.
    Skip,
    /// Read up to the given level.
    Partial(Comprehension),
    /// Fully read. Never scheduled again.
    Done,
}

/// Move a topic along the comprehension ladder. A mastered topic can be
/// reopened with `Partial`, but not skipped.
pub fn apply_reading_action(
    card: &Card,
    action: ReadingAction,
    now: Timestamp,
    params: &LadderParams,
) -> Fallible<Card> {
    topic_state(card)?;
    let card = match action {
        ReadingAction::Skip => {
            open_topic(card)?;
            let postpones = card.postpones + 1;
            Card {
                due: Some(now.add_days(skip_interval(postpones))),
                postpones,
                ..card.clone()
            }
        }
        ReadingAction::Partial(comprehension) => {
            let days = ladder_interval(
                comprehension,
                card.review_logs.len(),
                card.priority,
                params,
            );
            // Partial(Mastered) has an infinite interval, same as Done.
            let (due, scheduled_days) = if days.is_finite() {
                let days = days.min(card.max_interval);
                (Some(now.add_days(days)), days)
            } else {
                (None, card.scheduled_days)
            };
            Card {
                kind: CardKind::Topic(TopicState { comprehension }),
                state: CardState::Learning,
                due,
                scheduled_days,
                last_review: Some(now),
                ..card.clone()
            }
        }
        ReadingAction::Done => Card {
            kind: CardKind::Topic(TopicState {
                comprehension: Comprehension::Mastered,
            }),
            state: CardState::Learning,
            due: None,
            last_review: Some(now),
            ..card.clone()
        },
    };
    let log = ReviewLog::new(&card.id, now, card.state).with_duration(Some(0));
    Ok(Card {
        review_logs: append_review_log(&card.review_logs, log),
        ..card
    })
}

/// Pin the card's due date, recomputing `scheduled_days` relative to the
/// last review (or `now` when never reviewed).
pub fn set_due_date(card: &Card, due: Timestamp, now: Timestamp) -> Card {
    let base = card.last_review.unwrap_or(now);
    let days = due.days_since(base);
    Card {
        due: Some(due),
        scheduled_days: days.round().max(0.0),
        ..card.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsrs::initial_difficulty;
    use crate::fsrs::initial_stability;

    fn feq(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.001
    }

    fn now() -> Fallible<Timestamp> {
        Timestamp::from_millis(1_700_000_000_000)
    }

    fn memory(card: &Card) -> MemoryState {
        card.memory().copied().unwrap_or_default()
    }

    fn comprehension(card: &Card) -> Option<Comprehension> {
        match card.kind {
            CardKind::Topic(topic) => Some(topic.comprehension),
            CardKind::Item(_) => None,
        }
    }

    #[test]
    fn test_first_grade_initialises_from_weights() -> Fallible<()> {
        let now = now()?;
        let w = Weights::fsrs6();
        let card = create_card("a", Category::Item, 10.0, now);
        let graded = grade(&card, Rating::Good, now, Some(1200), &w)?;
        let m = memory(&graded);
        assert_eq!(m.stability, initial_stability(Rating::Good, &w));
        assert_eq!(m.difficulty, initial_difficulty(Rating::Good, &w));
        assert_eq!(graded.state, CardState::Review);
        assert_eq!(graded.last_review, Some(now));
        assert!(feq(graded.scheduled_days, m.stability));
        assert_eq!(graded.due, Some(now.add_days(graded.scheduled_days)));
        assert_eq!(graded.review_logs.len(), 2);
        let log = &graded.review_logs[1];
        assert_eq!(log.rating, Some(Rating::Good));
        assert_eq!(log.duration_ms, Some(1200));
        assert_eq!(log.state, CardState::Review);
        // The input is untouched.
        assert_eq!(card.review_logs.len(), 1);
        assert_eq!(card.state, CardState::New);
        Ok(())
    }

    #[test]
    fn test_grade_state_machine() -> Fallible<()> {
        let now = now()?;
        let w = Weights::default();
        let card = create_card("a", Category::Item, 10.0, now);
        let card = grade(&card, Rating::Again, now, None, &w)?;
        assert_eq!(card.state, CardState::Learning);
        let card = grade(&card, Rating::Hard, now.add_days(1.0), None, &w)?;
        assert_eq!(card.state, CardState::Learning);
        let card = grade(&card, Rating::Easy, now.add_days(2.0), None, &w)?;
        assert_eq!(card.state, CardState::Review);
        let card = grade(&card, Rating::Again, now.add_days(20.0), None, &w)?;
        assert_eq!(card.state, CardState::Relearning);
        let card = grade(&card, Rating::Hard, now.add_days(21.0), None, &w)?;
        assert_eq!(card.state, CardState::Relearning);
        let card = grade(&card, Rating::Good, now.add_days(22.0), None, &w)?;
        assert_eq!(card.state, CardState::Review);
        assert_eq!(card.repetitions(), 6);
        Ok(())
    }

    #[test]
    fn test_grade_respects_max_interval() -> Fallible<()> {
        let now = now()?;
        let mut card = create_card("a", Category::Item, 10.0, now);
        card.max_interval = 2.0;
        let graded = grade(&card, Rating::Easy, now, None, &Weights::default())?;
        assert_eq!(graded.scheduled_days, 2.0);
        assert_eq!(graded.due, Some(now.add_days(2.0)));
        Ok(())
    }

    #[test]
    fn test_grade_topic_is_mismatch() -> Fallible<()> {
        let now = now()?;
        let card = create_card("t", Category::Topic, 10.0, now);
        let err = grade(&card, Rating::Good, now, None, &Weights::default());
        assert_eq!(
            err.err().map(|e| e.to_string()),
            Some("error: card 't' is not an item card".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_predict_rating_intervals() -> Fallible<()> {
        let now = now()?;
        let w = Weights::fsrs6();
        let card = create_card("a", Category::Item, 10.0, now);
        let card = grade(&card, Rating::Good, now, None, &w)?;
        let later = now.add_days(3.0);
        let intervals = predict_rating_intervals(&card, later, &w)?;
        assert_eq!(intervals.len(), 4);
        assert!(intervals[&Rating::Again] < intervals[&Rating::Hard]);
        assert!(intervals[&Rating::Hard] < intervals[&Rating::Good]);
        assert!(intervals[&Rating::Good] < intervals[&Rating::Easy]);
        let graded = grade(&card, Rating::Good, later, None, &w)?;
        assert!(feq(graded.scheduled_days, intervals[&Rating::Good]));
        Ok(())
    }

    #[test]
    fn test_next_reading_step() -> Fallible<()> {
        let now = now()?;
        let params = ProgressParams::default();
        let card = create_card("t", Category::Topic, 10.0, now);
        let card = next_reading_step(&card, now, Some(60_000), &params)?;
        assert_eq!(card.state, CardState::Learning);
        assert_eq!(card.scheduled_days, 2.0);
        assert_eq!(card.due, Some(now.add_days(2.0)));
        assert_eq!(card.last_review, Some(now));
        assert_eq!(card.review_logs.len(), 2);
        assert_eq!(card.review_logs[1].duration_ms, Some(60_000));

        let later = now.add_days(2.0);
        let card = next_reading_step(&card, later, None, &params)?;
        assert_eq!(card.scheduled_days, 2.0);
        let card = next_reading_step(&card, later.add_days(2.0), None, &params)?;
        assert_eq!(card.scheduled_days, 3.0);
        Ok(())
    }

    #[test]
    fn test_next_reading_step_item_is_mismatch() -> Fallible<()> {
        let now = now()?;
        let card = create_card("i", Category::Item, 10.0, now);
        let result = next_reading_step(&card, now, None, &ProgressParams::default());
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_reading_skip() -> Fallible<()> {
        let now = now()?;
        let ladder = LadderParams::default();
        let card = create_card("t", Category::Topic, 10.0, now);
        let card = apply_reading_action(&card, ReadingAction::Skip, now, &ladder)?;
        assert_eq!(card.postpones, 1);
        assert_eq!(card.due, Some(now.add_days(1.0)));
        let card = apply_reading_action(&card, ReadingAction::Skip, now, &ladder)?;
        assert_eq!(card.postpones, 2);
        assert_eq!(card.due, Some(now.add_days(3.0)));
        assert_eq!(card.state, CardState::New);
        assert_eq!(card.review_logs.len(), 3);
        Ok(())
    }

    #[test]
    fn test_reading_partial() -> Fallible<()> {
        let now = now()?;
        let ladder = LadderParams::default();
        let card = create_card("t", Category::Topic, 50.0, now);
        // One log so far; priority is just above 50.
        // ceil(2 * 1.5 * (0.5 + 0.50x)) = 4
        let browsed = ReadingAction::Partial(Comprehension::Browsed);
        let card = apply_reading_action(&card, browsed, now, &ladder)?;
        assert_eq!(comprehension(&card), Some(Comprehension::Browsed));
        assert_eq!(card.scheduled_days, 4.0);
        assert_eq!(card.due, Some(now.add_days(4.0)));
        assert_eq!(card.state, CardState::Learning);
        assert_eq!(card.last_review, Some(now));
        Ok(())
    }

    #[test]
    fn test_reading_done() -> Fallible<()> {
        let now = now()?;
        let ladder = LadderParams::default();
        let card = create_card("t", Category::Topic, 50.0, now);
        let card = next_reading_step(&card, now, None, &ProgressParams::default())?;
        assert!(card.due.is_some());
        let card = apply_reading_action(&card, ReadingAction::Done, now, &ladder)?;
        assert_eq!(comprehension(&card), Some(Comprehension::Mastered));
        assert_eq!(card.due, None);
        Ok(())
    }

    #[test]
    fn test_mastered_topic_is_not_rescheduled() -> Fallible<()> {
        let now = now()?;
        let ladder = LadderParams::default();
        let card = create_card("t", Category::Topic, 50.0, now);
        let card = apply_reading_action(&card, ReadingAction::Done, now, &ladder)?;
        let later = now.add_days(2.0);
        let step = next_reading_step(&card, later, None, &ProgressParams::default());
        assert_eq!(
            step.err().map(|e| e.to_string()),
            Some("error: topic 't' is mastered and is not scheduled again".to_string())
        );
        assert!(apply_reading_action(&card, ReadingAction::Skip, later, &ladder).is_err());

        // Reading it again below mastery reopens it.
        let partial = ReadingAction::Partial(Comprehension::Partial);
        let card = apply_reading_action(&card, partial, later, &ladder)?;
        assert_eq!(comprehension(&card), Some(Comprehension::Partial));
        assert!(card.due.is_some());
        assert!(next_reading_step(&card, later, None, &ProgressParams::default()).is_ok());
        Ok(())
    }

    #[test]
    fn test_reading_partial_custom_ladder() -> Fallible<()> {
        let now = now()?;
        let ladder = LadderParams {
            base_steps: [3.0, 6.0, 9.0],
            growth_factor: 0.0,
            priority_factor: 1.0,
        };
        let card = create_card("t", Category::Topic, 0.0, now);
        // 3 * 1 * (1 + 0.0x) rounds up to 4 once the jitter is added.
        let unread = ReadingAction::Partial(Comprehension::Unread);
        let card = apply_reading_action(&card, unread, now, &ladder)?;
        assert_eq!(card.scheduled_days, 4.0);
        Ok(())
    }

    #[test]
    fn test_reading_action_item_is_mismatch() -> Fallible<()> {
        let now = now()?;
        let ladder = LadderParams::default();
        let card = create_card("i", Category::Item, 10.0, now);
        assert!(apply_reading_action(&card, ReadingAction::Done, now, &ladder).is_err());
        Ok(())
    }

    #[test]
    fn test_set_due_date() -> Fallible<()> {
        let now = now()?;
        let card = create_card("a", Category::Item, 10.0, now);
        let card = set_due_date(&card, now.add_days(5.4), now);
        assert_eq!(card.scheduled_days, 5.0);
        assert_eq!(card.due, Some(now.add_days(5.4)));

        let reviewed = Card {
            last_review: Some(now.add_days(-3.0)),
            ..card
        };
        let reviewed = set_due_date(&reviewed, now.add_days(2.0), now);
        assert_eq!(reviewed.scheduled_days, 5.0);

        let past = set_due_date(&reviewed, now.add_days(-10.0), now);
        assert_eq!(past.scheduled_days, 0.0);
        Ok(())
    }
}
