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

use duecards_core::error::Fallible;
use duecards_core::types::card::Card;
use duecards_core::types::card_id::CardId;
use duecards_core::types::timestamp::Timestamp;
use tempfile::TempDir;
use tempfile::tempdir;

use crate::store::CardStore;
use crate::store::find;

/// An empty collection in a temporary directory. The directory is removed
/// when the returned guard is dropped.
pub fn empty_collection() -> Fallible<(TempDir, Option<String>)> {
    let dir = tempdir()?;
    let path = dir.path().canonicalize()?.display().to_string();
    Ok((dir, Some(path)))
}

/// 2025-05-05T00:00:00Z
pub fn test_now() -> Fallible<Timestamp> {
    Timestamp::from_millis(1_746_403_200_000)
}

pub fn load_card(directory: &Option<String>, id: &str) -> Fallible<Card> {
    let store = CardStore::open(directory.clone())?;
    let cards = store.load()?;
    Ok(find(&cards, &CardId::new(id))?.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection() -> Fallible<()> {
        let (_guard, directory) = empty_collection()?;
        let store = CardStore::open(directory)?;
        assert!(store.load()?.is_empty());
        Ok(())
    }
}
