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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::types::card::Category;
use crate::types::card_id::CardId;

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorReport {
            message: msg.into(),
        }
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport {
            message: format!("I/O error: {value:#?}"),
        }
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport {
            message: format!("JSON error: {value:#?}"),
        }
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport {
            message: format!("TOML error: {value}"),
        }
    }
}

impl From<CategoryMismatch> for ErrorReport {
    fn from(value: CategoryMismatch) -> Self {
        ErrorReport {
            message: value.to_string(),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {
    fn description(&self) -> &str {
        &self.message
    }
}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport {
        message: msg.into(),
    })
}

/// An operation meant for one category of card was called on the other.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMismatch {
    pub card_id: CardId,
    pub expected: Category,
}

impl CategoryMismatch {
    pub fn new(card_id: &CardId, expected: Category) -> Self {
        Self {
            card_id: card_id.clone(),
            expected,
        }
    }
}

impl Display for CategoryMismatch {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "card '{}' is not {} card",
            self.card_id,
            self.expected.with_article()
        )
    }
}

impl Error for CategoryMismatch {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mismatch_message() {
        let id = CardId::new("abc");
        let err: ErrorReport = CategoryMismatch::new(&id, Category::Item).into();
        assert_eq!(err.to_string(), "error: card 'abc' is not an item card");
        let err: ErrorReport = CategoryMismatch::new(&id, Category::Topic).into();
        assert_eq!(err.to_string(), "error: card 'abc' is not a topic card");
    }

    #[test]
    fn test_fail() {
        let result: Fallible<()> = fail("boom");
        assert_eq!(result, Err(ErrorReport::new("boom")));
    }
}
