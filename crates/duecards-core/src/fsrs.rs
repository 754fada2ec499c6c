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

//! The memory model: FSRS difficulty, stability and retrievability.
//!
//! Two published parameter sets are supported and selected through
//! [`Weights`]. They differ in the forgetting curve decay (a fixed `-0.5`
//! for FSRS-5, `-w20` for FSRS-6) and in same-day stability (FSRS-6 adds a
//! `S^-w19` term). A `Weights` value always belongs to exactly one
//! algorithm, so the two sets are never mixed.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

pub const FSRS5_WEIGHTS: [f64; 19] = [
    0.40255, 1.18385, 3.173, 15.69105, 7.1949, 0.5345, 1.4604, 0.0046, 1.54575, 0.1192, 1.01925,
    1.9395, 0.11, 0.29605, 2.2698, 0.2315, 2.9898, 0.51655, 0.6621,
];

pub const FSRS6_WEIGHTS: [f64; 21] = [
    0.212, 1.2931, 2.3065, 8.2956, 6.4133, 0.8334, 3.0194, 0.001, 1.8722, 0.1666, 0.796, 1.4835,
    0.0614, 0.2629, 1.6483, 0.6014, 1.8729, 0.5425, 0.0912, 0.0658, 0.1542,
];

/// FSRS-5 decay, fixed.
const FSRS5_DECAY: f64 = 0.5;

pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;
pub const MIN_STABILITY: f64 = 0.01;
pub const MAX_STABILITY: f64 = 36500.0;
pub const DEFAULT_DESIRED_RETENTION: f64 = 0.9;

pub type Recall = f64;
pub type Stability = f64;
pub type Difficulty = f64;
pub type Interval = f64;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn as_str(&self) -> &str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }

    fn index(self) -> usize {
        match self {
            Rating::Again => 0,
            Rating::Hard => 1,
            Rating::Good => 2,
            Rating::Easy => 3,
        }
    }
}

impl From<Rating> for f64 {
    fn from(r: Rating) -> f64 {
        match r {
            Rating::Again => 1.0,
            Rating::Hard => 2.0,
            Rating::Good => 3.0,
            Rating::Easy => 4.0,
        }
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Rating {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "again" | "1" => Ok(Rating::Again),
            "hard" | "2" => Ok(Rating::Hard),
            "good" | "3" => Ok(Rating::Good),
            "easy" | "4" => Ok(Rating::Easy),
            _ => fail(format!("invalid rating string: {value}")),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Fsrs5,
    #[default]
    Fsrs6,
}

impl Algorithm {
    /// Number of weights the algorithm reads.
    pub fn weight_count(self) -> usize {
        match self {
            Algorithm::Fsrs5 => 19,
            Algorithm::Fsrs6 => 21,
        }
    }
}

/// A parameter vector tied to the algorithm it was published for.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Weights {
    algorithm: Algorithm,
    w: [f64; 21],
}

impl Weights {
    pub fn fsrs5() -> Self {
        let mut w = [0.0; 21];
        w[..19].copy_from_slice(&FSRS5_WEIGHTS);
        w[20] = FSRS5_DECAY;
        Self {
            algorithm: Algorithm::Fsrs5,
            w,
        }
    }

    pub fn fsrs6() -> Self {
        Self {
            algorithm: Algorithm::Fsrs6,
            w: FSRS6_WEIGHTS,
        }
    }

    pub fn default_for(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Fsrs5 => Self::fsrs5(),
            Algorithm::Fsrs6 => Self::fsrs6(),
        }
    }

    /// Custom (e.g. optimized) weights for the given algorithm.
    pub fn custom(algorithm: Algorithm, weights: &[f64]) -> Fallible<Self> {
        let expected = algorithm.weight_count();
        if weights.len() != expected {
            return fail(format!(
                "expected {expected} weights for {algorithm:?}, got {}",
                weights.len()
            ));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return fail("weights must be finite numbers");
        }
        let mut this = Self::default_for(algorithm);
        this.w[..expected].copy_from_slice(weights);
        if algorithm == Algorithm::Fsrs6 && this.w[20] <= 0.0 {
            return fail("the decay weight (w20) must be positive");
        }
        Ok(this)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn decay(&self) -> f64 {
        match self.algorithm {
            Algorithm::Fsrs5 => -FSRS5_DECAY,
            Algorithm::Fsrs6 => -self.w[20],
        }
    }

    /// Chosen so that `R(S, S) = 0.9`.
    fn factor(&self) -> f64 {
        0.9f64.powf(1.0 / self.decay()) - 1.0
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::fsrs6()
    }
}

impl std::ops::Index<usize> for Weights {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.w[index]
    }
}

fn clamp_d(d: Difficulty) -> Difficulty {
    d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

fn clamp_s(s: Stability) -> Stability {
    s.clamp(MIN_STABILITY, MAX_STABILITY)
}

/// The forgetting curve. Zero when `s <= 0`; negative elapsed time counts
/// as zero.
pub fn retrievability(t: Interval, s: Stability, w: &Weights) -> Recall {
    if s.is_nan() || s <= 0.0 {
        return 0.0;
    }
    let t = t.max(0.0);
    (1.0 + w.factor() * (t / s)).powf(w.decay())
}

/// Inverse of [`retrievability`]: the elapsed time at which recall decays to
/// `r_d`.
pub fn interval(r_d: Recall, s: Stability, w: &Weights) -> Interval {
    (s / w.factor()) * (r_d.powf(1.0 / w.decay()) - 1.0)
}

pub fn initial_stability(g: Rating, w: &Weights) -> Stability {
    clamp_s(w[g.index()])
}

pub fn initial_difficulty(g: Rating, w: &Weights) -> Difficulty {
    let g: f64 = g.into();
    clamp_d(w[4] - f64::exp(w[5] * (g - 1.0)) + 1.0)
}

pub fn next_difficulty(d: Difficulty, g: Rating, w: &Weights) -> Difficulty {
    clamp_d(w[7] * initial_difficulty(Rating::Easy, w) + (1.0 - w[7]) * dp(d, g, w))
}

fn dp(d: Difficulty, g: Rating, w: &Weights) -> f64 {
    d + delta_d(g, w) * ((10.0 - d) / 9.0)
}

fn delta_d(g: Rating, w: &Weights) -> f64 {
    let g: f64 = g.into();
    -w[6] * (g - 3.0)
}

/// Stability after a review less than a day after the previous one.
pub fn same_day_stability(s: Stability, g: Rating, w: &Weights) -> Stability {
    let g: f64 = g.into();
    let inc = f64::exp(w[17] * (g - 3.0 + w[18]));
    let inc = match w.algorithm() {
        Algorithm::Fsrs5 => inc,
        Algorithm::Fsrs6 => inc * s.powf(-w[19]),
    };
    clamp_s(s * inc)
}

/// Stability after a successful recall.
pub fn recall_stability(d: Difficulty, s: Stability, r: Recall, g: Rating, w: &Weights) -> Stability {
    let t_d = 11.0 - d;
    let t_s = s.powf(-w[9]);
    let t_r = f64::exp(w[10] * (1.0 - r)) - 1.0;
    let h = if g == Rating::Hard { w[15] } else { 1.0 };
    let b = if g == Rating::Easy { w[16] } else { 1.0 };
    let c = f64::exp(w[8]);
    let alpha = 1.0 + t_d * t_s * t_r * h * b * c;
    clamp_s(s * alpha)
}

/// Stability after a lapse.
pub fn forget_stability(d: Difficulty, s: Stability, r: Recall, w: &Weights) -> Stability {
    let d_f = d.powf(-w[12]);
    let s_f = (s + 1.0).powf(w[13]) - 1.0;
    let r_f = f64::exp(w[14] * (1.0 - r));
    clamp_s(w[11] * d_f * s_f * r_f)
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MemoryUpdate {
    pub difficulty: Difficulty,
    pub stability: Stability,
}

/// The state after a review graded `g`, `elapsed` days after the last one.
///
/// An unset (zero) difficulty or stability means the card has never been
/// graded, and both are initialised from the rating alone.
pub fn update_stability(
    d: Difficulty,
    s: Stability,
    elapsed: Interval,
    g: Rating,
    w: &Weights,
) -> MemoryUpdate {
    if d.is_nan() || s.is_nan() || d <= 0.0 || s <= 0.0 {
        return MemoryUpdate {
            difficulty: initial_difficulty(g, w),
            stability: initial_stability(g, w),
        };
    }
    let r = retrievability(elapsed, s, w);
    let difficulty = next_difficulty(d, g, w);
    let stability = if elapsed < 1.0 {
        same_day_stability(s, g, w)
    } else if g != Rating::Again {
        recall_stability(d, s, r, g, w)
    } else {
        forget_stability(d, s, r, w)
    };
    MemoryUpdate {
        difficulty,
        stability,
    }
}
