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

use std::env::current_dir;
use std::fs::read_to_string;
use std::fs::rename;
use std::fs::write;
use std::path::PathBuf;
use std::time::Instant;

use duecards_core::config::Config;
use duecards_core::error::Fallible;
use duecards_core::error::fail;
use duecards_core::types::card::Card;
use duecards_core::types::card_id::CardId;

const CARDS_FILE: &str = "cards.json";
const CONFIG_FILE: &str = "config.toml";

/// A collection directory holding `cards.json` and an optional
/// `config.toml`.
pub struct CardStore {
    pub directory: PathBuf,
}

impl CardStore {
    pub fn open(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };
        Ok(Self { directory })
    }

    fn cards_path(&self) -> PathBuf {
        self.directory.join(CARDS_FILE)
    }

    /// All cards in the collection. A collection without a cards file is
    /// empty.
    pub fn load(&self) -> Fallible<Vec<Card>> {
        let path = self.cards_path();
        if !path.exists() {
            log::debug!("No {CARDS_FILE} in {}, starting empty.", self.directory.display());
            return Ok(Vec::new());
        }
        let start = Instant::now();
        let cards: Vec<Card> = serde_json::from_str(&read_to_string(&path)?)?;
        let duration = start.elapsed().as_millis();
        log::debug!("Loaded {} cards in {duration}ms.", cards.len());
        Ok(cards)
    }

    /// Replace the stored cards. The new file is written next to the old one
    /// and renamed over it, so readers never see a partial write.
    pub fn save(&self, cards: &[Card]) -> Fallible<()> {
        let path = self.cards_path();
        let tmp = self.directory.join(format!("{CARDS_FILE}.tmp"));
        write(&tmp, serde_json::to_string_pretty(cards)?)?;
        rename(&tmp, &path)?;
        log::debug!("Saved {} cards to {}.", cards.len(), path.display());
        Ok(())
    }

    /// The collection's configuration, or the defaults when it has none.
    pub fn config(&self) -> Fallible<Config> {
        let path = self.directory.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        Config::parse(&read_to_string(path)?)
    }
}

pub fn find<'a>(cards: &'a [Card], id: &CardId) -> Fallible<&'a Card> {
    match cards.iter().find(|card| &card.id == id) {
        Some(card) => Ok(card),
        None => fail(format!("no card with id '{id}'")),
    }
}

/// Swap in `card` for the stored card with the same id.
pub fn replace(cards: &[Card], card: Card) -> Fallible<Vec<Card>> {
    let Some(index) = cards.iter().position(|c| c.id == card.id) else {
        return fail(format!("no card with id '{}'", card.id));
    };
    let mut cards = cards.to_vec();
    cards[index] = card;
    Ok(cards)
}
