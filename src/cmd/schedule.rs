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

use duecards_core::card::set_due_date;
use duecards_core::error::Fallible;
use duecards_core::priority::set_priority;
use duecards_core::types::card_id::CardId;
use duecards_core::types::date::Date;
use duecards_core::types::timestamp::Timestamp;

use crate::store::CardStore;
use crate::store::find;
use crate::store::replace;

pub fn set_card_priority(directory: Option<String>, id: String, value: f64) -> Fallible<()> {
    let store = CardStore::open(directory)?;
    let cards = store.load()?;
    let id = CardId::new(id);
    let cards = set_priority(&cards, &id, value)?;
    let card = find(&cards, &id)?;
    println!(
        "'{id}' now has priority {:.4} (position {}).",
        card.priority, card.position
    );
    store.save(&cards)
}

pub fn set_due(directory: Option<String>, id: String, date: String, now: Timestamp) -> Fallible<()> {
    let store = CardStore::open(directory)?;
    let cards = store.load()?;
    let due = Date::try_from(date)?.start();
    let card = set_due_date(find(&cards, &CardId::new(id))?, due, now);
    println!("'{}' is due {due}.", card.id);
    store.save(&replace(&cards, card)?)
}
