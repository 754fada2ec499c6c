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

use chrono::DateTime;
use clap::Parser;
use clap::Subcommand;
use duecards_core::error::ErrorReport;
use duecards_core::error::Fallible;
use duecards_core::types::timestamp::Timestamp;

use crate::cmd::card::ReadAction;
use crate::cmd::card::create;
use crate::cmd::card::grade_card;
use crate::cmd::card::preview;
use crate::cmd::card::read;
use crate::cmd::queue::QueueFormat;
use crate::cmd::queue::postpone_cards;
use crate::cmd::queue::print_queue;
use crate::cmd::schedule::set_due;
use crate::cmd::schedule::set_card_priority;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the collection directory. By default, the current working directory is used.
    #[arg(long, short, global = true)]
    directory: Option<String>,
    /// Act as if it were this instant (RFC 3339). By default, the current time is used.
    #[arg(long, global = true)]
    now: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new card to the collection.
    Create {
        /// The card's identifier. Must be unique within the collection.
        id: String,
        /// Create a topic (read incrementally) rather than an item (graded by recall).
        #[arg(long)]
        topic: bool,
        /// Priority between 0 and 100. Lower values are reviewed first.
        #[arg(long, default_value_t = 50.0)]
        priority: f64,
    },
    /// Print today's review queue.
    Queue {
        /// Which output format to use.
        #[arg(long, default_value_t = QueueFormat::Text)]
        format: QueueFormat,
    },
    /// Grade a reviewed item.
    Grade {
        id: String,
        /// One of again, hard, good, easy, or 1 to 4.
        rating: String,
        /// How long the review took, in milliseconds.
        #[arg(long)]
        duration_ms: Option<u64>,
    },
    /// Show the interval each rating would give an item.
    Preview { id: String },
    /// Record reading a topic.
    Read {
        id: String,
        /// What was done with the topic.
        #[arg(long, default_value_t = ReadAction::Step)]
        action: ReadAction,
        /// Comprehension reached, for `--action partial`: unread, browsed, or partial.
        #[arg(long)]
        level: Option<String>,
        /// How long the reading took, in milliseconds.
        #[arg(long)]
        duration_ms: Option<u64>,
    },
    /// Push cards back without reviewing them. With no ids, postpones the
    /// cards that did not fit in today's queue and are safe to delay.
    Postpone { ids: Vec<String> },
    /// Change a card's priority and renumber the collection.
    Priority { id: String, value: f64 },
    /// Set a card's due date (YYYY-MM-DD).
    Due { id: String, date: String },
}

fn parse_now(now: Option<String>) -> Fallible<Timestamp> {
    match now {
        Some(text) => {
            let dt = DateTime::parse_from_rfc3339(&text)
                .map_err(|e| ErrorReport::new(format!("invalid timestamp '{text}': {e}")))?;
            Timestamp::from_millis(dt.timestamp_millis())
        }
        None => Ok(Timestamp::now()),
    }
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let directory = cli.directory;
    let now = parse_now(cli.now)?;
    match cli.command {
        Command::Create {
            id,
            topic,
            priority,
        } => create(directory, id, topic, priority, now),
        Command::Queue { format } => print_queue(directory, format, now),
        Command::Grade {
            id,
            rating,
            duration_ms,
        } => grade_card(directory, id, rating, duration_ms, now),
        Command::Preview { id } => preview(directory, id, now),
        Command::Read {
            id,
            action,
            level,
            duration_ms,
        } => read(directory, id, action, level, duration_ms, now),
        Command::Postpone { ids } => postpone_cards(directory, ids, now),
        Command::Priority { id, value } => set_card_priority(directory, id, value),
        Command::Due { id, date } => set_due(directory, id, date, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_now() -> Fallible<()> {
        let now = parse_now(Some("2025-05-05T00:00:00Z".to_string()))?;
        assert_eq!(now.as_millis(), 1_746_403_200_000);
        let now = parse_now(Some("2025-05-05T02:00:00+02:00".to_string()))?;
        assert_eq!(now.as_millis(), 1_746_403_200_000);
        assert!(parse_now(Some("yesterday".to_string())).is_err());
        Ok(())
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "duecards",
            "--directory",
            "/tmp/x",
            "read",
            "t1",
            "--action",
            "partial",
            "--level",
            "browsed",
        ]);
        assert!(cli.is_ok());
        let cli = Cli::try_parse_from([
            "duecards",
            "grade",
            "a",
            "good",
            "--now",
            "2025-01-01T00:00:00Z",
        ]);
        assert!(cli.is_ok());
        assert!(Cli::try_parse_from(["duecards", "frobnicate"]).is_err());
    }
}
