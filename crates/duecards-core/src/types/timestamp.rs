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

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::DateTime;
use chrono::Duration;
use chrono::NaiveDateTime;
use chrono::SubsecRound;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::date::Date;

/// Milliseconds in a day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// A UTC timestamp with millisecond precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(ndt: NaiveDateTime) -> Self {
        Self(ndt.trunc_subsecs(3))
    }

    /// The current timestamp, in UTC.
    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self(chrono::Utc::now().naive_utc().trunc_subsecs(3))
    }

    /// Milliseconds since the Unix epoch.
    pub fn from_millis(ms: i64) -> Fallible<Self> {
        let dt = DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| ErrorReport::new(format!("timestamp out of range: {ms}")))?;
        Ok(Self(dt.naive_utc()))
    }

    pub fn as_millis(self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }

    /// The date component of this timestamp.
    pub fn date(self) -> Date {
        Date::new(self.0.date())
    }

    /// Shift by a fractional number of days, rounded to the millisecond.
    /// Saturates at the representable range.
    pub fn add_days(self, days: f64) -> Self {
        let ms = (days * MS_PER_DAY).round();
        let ms = if ms.is_nan() {
            0
        } else {
            ms.clamp(i64::MIN as f64, i64::MAX as f64) as i64
        };
        let shifted = Duration::try_milliseconds(ms)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .unwrap_or(if ms < 0 {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            });
        Self(shifted)
    }

    /// Fractional days elapsed from `earlier` to `self`. Negative when
    /// `earlier` is in the future.
    pub fn days_since(self, earlier: Timestamp) -> f64 {
        (self.as_millis() - earlier.as_millis()) as f64 / MS_PER_DAY
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let ndt = NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.3f")
            .map_err(|_| ErrorReport::new(format!("Failed to parse timestamp: '{value}'.")))?;
        Ok(Timestamp(ndt))
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> String {
        ts.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_string() -> Fallible<()> {
        let ts = Timestamp::try_from("2023-10-05T14:30:15.123".to_string())?;
        assert_eq!(ts.to_string(), "2023-10-05T14:30:15.123");
        Ok(())
    }

    #[test]
    fn test_serialize() -> Fallible<()> {
        let ts = Timestamp::try_from("2023-10-05T14:30:15.123".to_string())?;
        let serialized = serde_json::to_string(&ts)?;
        assert_eq!(serialized, "\"2023-10-05T14:30:15.123\"");
        let deserialized: Timestamp = serde_json::from_str(&serialized)?;
        assert_eq!(deserialized, ts);
        Ok(())
    }

    #[test]
    fn test_millis() -> Fallible<()> {
        let ts = Timestamp::from_millis(1_609_459_200_000)?;
        assert_eq!(ts.to_string(), "2021-01-01T00:00:00.000");
        assert_eq!(ts.as_millis(), 1_609_459_200_000);
        Ok(())
    }

    #[test]
    fn test_add_days() -> Fallible<()> {
        let ts = Timestamp::from_millis(1_609_459_200_000)?;
        assert_eq!(ts.add_days(1.0).as_millis(), 1_609_459_200_000 + 86_400_000);
        assert_eq!(ts.add_days(-1.0).as_millis(), 1_609_459_200_000 - 86_400_000);
        assert_eq!(ts.add_days(0.5).as_millis(), 1_609_459_200_000 + 43_200_000);
        assert_eq!(ts.add_days(0.0), ts);
        Ok(())
    }

    #[test]
    fn test_days_since() -> Fallible<()> {
        let a = Timestamp::from_millis(0)?;
        let b = a.add_days(2.5);
        assert_eq!(b.days_since(a), 2.5);
        assert_eq!(a.days_since(b), -2.5);
        Ok(())
    }
}
