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

/// Longest run the dominant side may emit in one round.
pub const MAX_RUN: usize = 10;

/// Merge two ranked sequences so that about `topic_to_item_ratio` topics
/// appear per item. Each round emits a run from the dominant side and then
/// a single element from the other. Once either side runs out the rest of
/// the other is appended as is.
pub fn interleave<T: Clone>(items: &[T], topics: &[T], topic_to_item_ratio: f64) -> Vec<T> {
    let ratio = topic_to_item_ratio;
    if !ratio.is_finite() || ratio <= 0.0 || items.is_empty() || topics.is_empty() {
        return items.iter().chain(topics).cloned().collect();
    }
    let items_dominate = ratio < 1.0;
    let (major, minor) = if items_dominate {
        (items, topics)
    } else {
        (topics, items)
    };
    let run = run_length(if items_dominate { 1.0 / ratio } else { ratio });

    let mut out = Vec::with_capacity(items.len() + topics.len());
    let mut major = major.iter();
    let mut minor = minor.iter();
    loop {
        let before = out.len();
        out.extend(major.by_ref().take(run).cloned());
        if out.len() - before < run {
            out.extend(minor.cloned());
            break;
        }
        match minor.next() {
            Some(x) => out.push(x.clone()),
            None => {
                out.extend(major.cloned());
                break;
            }
        }
    }
    out
}

fn run_length(quota: f64) -> usize {
    (quota.round() as usize).clamp(1, MAX_RUN)
}
