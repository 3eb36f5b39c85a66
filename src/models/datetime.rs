//! Defines custom `DateTime` type.

use std::fmt;

use chrono::TimeZone;
use serde::de::{Deserialize, Deserializer, Error};
use serde::ser::{Serialize, Serializer};

/// Thin wrapper around a `chrono::DateTime<Utc>` with functions for custom (de)serialisation.
///
/// Serialised to/from JSON as milliseconds since the Unix epoch, matching how the engine
/// transmits job deadlines.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd)]
pub struct DateTime(chrono::DateTime<chrono::Utc>);

impl DateTime {
    /// Create a date/time from milliseconds since the Unix epoch. Returns `None` if out of range.
    pub fn from_timestamp_millis(millis: i64) -> Option<Self> {
        chrono::Utc.timestamp_millis_opt(millis).single().map(DateTime)
    }

    /// Get this date/time as milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl Serialize for DateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.timestamp_millis())
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<DateTime, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| D::Error::custom(format!("Timestamp out of range: {}", millis)))
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn json_deserialisation() {
        let dt: DateTime = serde_json::from_str("1536148800000").unwrap();
        assert_eq!(dt.timestamp_millis(), 1_536_148_800_000);
        assert_eq!(dt.to_string(), "2018-09-05T12:00:00+00:00");

        assert!(serde_json::from_str::<DateTime>("\"2018-09-05\"").is_err());
    }

    #[test]
    fn json_serialisation() {
        let dt = DateTime::from_timestamp_millis(1_536_148_800_123).unwrap();
        assert_eq!(serde_json::to_string(&dt).unwrap(), "1536148800123");
    }
}
