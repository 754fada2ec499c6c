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

//! duecards-core: scheduling core for the duecards review system.
//!
//! This library provides deterministic, I/O-free types and algorithms for:
//! - FSRS-5 and FSRS-6 memory models for graded items
//! - A geometric progress model and comprehension ladder for topics
//! - Ranking, interleaving and daily limits for the review queue
//! - Postponing cards that are not reviewed today

pub mod card;
pub mod config;
pub mod error;
pub mod fsrs;
pub mod postpone;
pub mod priority;
pub mod progress;
pub mod queue;
pub mod rng;
pub mod types;

// Re-exports for convenience
pub use card::{
    ReadingAction, apply_reading_action, create_card, grade, next_reading_step,
    predict_rating_intervals, set_due_date,
};
pub use config::Config;
pub use error::{CategoryMismatch, ErrorReport, Fallible, fail};
pub use fsrs::{Algorithm, Rating, Weights};
pub use postpone::{filter_safe_postponable_cards, postpone};
pub use priority::{apply_priority, jitter, reposition, set_priority};
pub use progress::{LadderParams, ProgressParams};
pub use queue::{Direction, OutstandingQueue, QueueParams, generate_outstanding_queue};
pub use types::card::{Card, CardKind, CardState, Category, Comprehension};
pub use types::card_id::CardId;
pub use types::date::Date;
pub use types::timestamp::Timestamp;
