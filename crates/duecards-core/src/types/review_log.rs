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

use serde::Deserialize;
use serde::Serialize;

use crate::fsrs::Rating;
use crate::types::card::CardState;
use crate::types::card_id::CardId;
use crate::types::timestamp::Timestamp;

/// An audit record of a single creation, grading or reading event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
    pub card_id: CardId,
    pub review_time: Timestamp,
    /// The card's state after the event.
    pub state: CardState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl ReviewLog {
    pub fn new(card_id: &CardId, review_time: Timestamp, state: CardState) -> Self {
        Self {
            card_id: card_id.clone(),
            review_time,
            state,
            duration_ms: None,
            rating: None,
        }
    }

    pub fn with_duration(self, duration_ms: Option<u64>) -> Self {
        Self {
            duration_ms,
            ..self
        }
    }

    pub fn with_rating(self, rating: Rating) -> Self {
        Self {
            rating: Some(rating),
            ..self
        }
    }
}

/// A new list with `log` at the end.
pub fn append_review_log(logs: &[ReviewLog], log: ReviewLog) -> Vec<ReviewLog> {
    let mut logs = logs.to_vec();
    logs.push(log);
    logs
}

/// A new list without the logs belonging to `card_id`.
pub fn without_review_logs(logs: &[ReviewLog], card_id: &CardId) -> Vec<ReviewLog> {
    logs.iter()
        .filter(|log| &log.card_id != card_id)
        .cloned()
        .collect()
}
