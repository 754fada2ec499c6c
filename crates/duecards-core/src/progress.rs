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

//! Interval model for topics. Topics are read rather than recalled, so their
//! intervals grow geometrically with the number of readings instead of
//! following a forgetting curve.

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Comprehension;

pub const DEFAULT_MULTIPLIER: f64 = 1.5;

/// Skipped topics come back no later than this many days out.
pub const MAX_SKIP_INTERVAL: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressParams {
    pub multiplier: f64,
}

impl Default for ProgressParams {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl ProgressParams {
    pub fn validate(&self) -> Fallible<()> {
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return fail(format!(
                "progress multiplier must be a finite number >= 1, got {}",
                self.multiplier
            ));
        }
        Ok(())
    }
}

/// Days until the next reading after `repetitions` readings.
pub fn next_interval(repetitions: usize, params: &ProgressParams) -> f64 {
    let n = repetitions.clamp(1, i32::MAX as usize) as i32;
    params.multiplier.powi(n).ceil()
}

/// Parameters of the comprehension ladder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderParams {
    /// Base step for Unread, Browsed and Partial.
    pub base_steps: [f64; 3],
    pub growth_factor: f64,
    pub priority_factor: f64,
}

impl Default for LadderParams {
    fn default() -> Self {
        Self {
            base_steps: [1.0, 2.0, 4.0],
            growth_factor: 0.5,
            priority_factor: 0.5,
        }
    }
}

impl LadderParams {
    pub fn validate(&self) -> Fallible<()> {
        if self.base_steps.iter().any(|step| !step.is_finite() || *step <= 0.0) {
            return fail(format!(
                "ladder base steps must be positive numbers, got {:?}",
                self.base_steps
            ));
        }
        if !self.growth_factor.is_finite() || self.growth_factor < 0.0 {
            return fail(format!(
                "ladder growth factor must be a finite number >= 0, got {}",
                self.growth_factor
            ));
        }
        if !self.priority_factor.is_finite() || self.priority_factor <= 0.0 {
            return fail(format!(
                "ladder priority factor must be a positive number, got {}",
                self.priority_factor
            ));
        }
        Ok(())
    }
}

/// Days until a topic at `comprehension`, read `read_count` times, comes up
/// again. Infinite once mastered.
pub fn ladder_interval(
    comprehension: Comprehension,
    read_count: usize,
    priority: f64,
    params: &LadderParams,
) -> f64 {
    let base = match comprehension {
        Comprehension::Unread => params.base_steps[0],
        Comprehension::Browsed => params.base_steps[1],
        Comprehension::Partial => params.base_steps[2],
        Comprehension::Mastered => return f64::INFINITY,
    };
    let growth = 1.0 + read_count as f64 * params.growth_factor;
    // Maps priority [0, 100] onto a multiplier in [0.5, 1.5].
    let weight = params.priority_factor + priority.clamp(0.0, 100.0) / 100.0;
    (base * growth * weight).ceil()
}

/// Days a topic is pushed back after its `postpones`-th skip.
pub fn skip_interval(postpones: u32) -> f64 {
    (postpones as f64).powf(1.5).round().min(MAX_SKIP_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_interval() {
        let params = ProgressParams::default();
        assert_eq!(next_interval(0, &params), 2.0);
        assert_eq!(next_interval(1, &params), 2.0);
        assert_eq!(next_interval(2, &params), 3.0);
        assert_eq!(next_interval(3, &params), 4.0);
        assert_eq!(next_interval(4, &params), 6.0);
        assert_eq!(next_interval(10, &params), 58.0);
    }

    #[test]
    fn test_next_interval_custom_multiplier() {
        let params = ProgressParams { multiplier: 2.0 };
        assert_eq!(next_interval(5, &params), 32.0);
    }

    #[test]
    fn test_validate() {
        assert!(ProgressParams::default().validate().is_ok());
        assert!(ProgressParams { multiplier: 0.5 }.validate().is_err());
        assert!(ProgressParams { multiplier: f64::NAN }.validate().is_err());
    }

    #[test]
    fn test_ladder_interval() {
        let params = LadderParams::default();
        assert_eq!(ladder_interval(Comprehension::Unread, 0, 50.0, &params), 1.0);
        assert_eq!(ladder_interval(Comprehension::Browsed, 0, 50.0, &params), 2.0);
        assert_eq!(ladder_interval(Comprehension::Partial, 0, 50.0, &params), 4.0);
        // 4 * (1 + 2 * 0.5) * 1.5
        assert_eq!(ladder_interval(Comprehension::Partial, 2, 100.0, &params), 12.0);
        // 2 * 1 * 0.5
        assert_eq!(ladder_interval(Comprehension::Browsed, 0, 0.0, &params), 1.0);
    }

    #[test]
    fn test_ladder_validate() {
        assert!(LadderParams::default().validate().is_ok());
        let zero_step = LadderParams {
            base_steps: [0.0, 2.0, 4.0],
            ..LadderParams::default()
        };
        assert!(zero_step.validate().is_err());
        let shrinking = LadderParams {
            growth_factor: -0.5,
            ..LadderParams::default()
        };
        assert!(shrinking.validate().is_err());
        let no_weight = LadderParams {
            priority_factor: 0.0,
            ..LadderParams::default()
        };
        assert!(no_weight.validate().is_err());
    }

    #[test]
    fn test_ladder_mastered_is_infinite() {
        let params = LadderParams::default();
        let interval = ladder_interval(Comprehension::Mastered, 3, 10.0, &params);
        assert!(interval.is_infinite());
    }

    #[test]
    fn test_skip_interval() {
        assert_eq!(skip_interval(1), 1.0);
        assert_eq!(skip_interval(2), 3.0);
        assert_eq!(skip_interval(4), 8.0);
        assert_eq!(skip_interval(9), 27.0);
        assert_eq!(skip_interval(10), 30.0);
        assert_eq!(skip_interval(100), 30.0);
    }
}
