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

use crate::error::Fallible;
use crate::fsrs::Algorithm;
use crate::fsrs::Weights;
use crate::progress::LadderParams;
use crate::progress::ProgressParams;
use crate::queue::QueueParams;

/// Collection settings. Every section is optional, so an empty document is a
/// valid configuration.
///
/// ```toml
/// algorithm = "fsrs5"
///
/// [queue]
/// max_items_per_day = 50
/// topic_to_item_ratio = 0.5
///
/// [progress]
/// multiplier = 2.0
///
/// [ladder]
/// base_steps = [1.0, 3.0, 7.0]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub algorithm: Algorithm,
    /// Replaces the published weights of `algorithm`.
    pub weights: Option<Vec<f64>>,
    pub queue: QueueParams,
    pub progress: ProgressParams,
    /// Intervals for partial readings of topics.
    pub ladder: LadderParams,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn parse(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)?;
        config.queue.validate()?;
        config.progress.validate()?;
        config.ladder.validate()?;
        config.weights()?;
        Ok(config)
    }

    /// The memory-model parameters this configuration selects.
    pub fn weights(&self) -> Fallible<Weights> {
        match &self.weights {
            Some(w) => Weights::custom(self.algorithm, w),
            None => Ok(Weights::default_for(self.algorithm)),
        }
    }
}
