//! Timestamp helpers for birthdays sent by clients.

use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, macros::datetime, OffsetDateTime};

/// Earliest birthday the user store can hold.
pub const MIN_BIRTHDAY: OffsetDateTime = datetime!(0001-01-01 0:00 UTC);

/// Latest birthday the user store can hold.
pub const MAX_BIRTHDAY: OffsetDateTime = datetime!(9999-12-31 23:59:59.999 UTC);

/// A client-supplied point in time.
///
/// Clients send birthdays either as a millisecond epoch number, as the same
/// number inside a string, or as an RFC 3339 timestamp.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TimestampInput {
    Millis(i64),
    Text(String),
}

impl TimestampInput {
    pub fn to_datetime(&self) -> Option<OffsetDateTime> {
        match self {
            TimestampInput::Millis(ms) => from_unix_millis(*ms),
            TimestampInput::Text(raw) => {
                let raw = raw.trim();
                match raw.parse::<i64>() {
                    Ok(ms) => from_unix_millis(ms),
                    Err(_) => OffsetDateTime::parse(raw, &Rfc3339).ok(),
                }
            }
        }
    }

    /// Like [`to_datetime`](Self::to_datetime), but only within
    /// `MIN_BIRTHDAY..=MAX_BIRTHDAY`.
    pub fn to_birthday(&self) -> Option<OffsetDateTime> {
        self.to_datetime()
            .filter(|at| (MIN_BIRTHDAY..=MAX_BIRTHDAY).contains(at))
    }
}

pub fn from_unix_millis(ms: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn accepts_millis_numeric_string_and_rfc3339() {
        let expected = datetime!(1995-05-17 00:00:00 UTC);
        let ms = 800_668_800_000_i64;

        assert_eq!(TimestampInput::Millis(ms).to_datetime(), Some(expected));
        assert_eq!(TimestampInput::Text(ms.to_string()).to_datetime(), Some(expected));
        assert_eq!(
            TimestampInput::Text("1995-05-17T00:00:00Z".into()).to_datetime(),
            Some(expected)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(TimestampInput::Text("yesterday".into()).to_datetime(), None);
        assert_eq!(TimestampInput::Millis(i64::MAX).to_datetime(), None);
    }

    #[test]
    fn birthdays_are_bounded() {
        assert_eq!(
            TimestampInput::Millis(-220_000_000_000_000).to_birthday(),
            None,
            "year -5000 is before the earliest storable birthday"
        );
        assert!(TimestampInput::Millis(-220_000_000_000_000).to_datetime().is_some());
        assert_eq!(
            TimestampInput::Text("0001-01-01T00:00:00Z".into()).to_birthday(),
            Some(MIN_BIRTHDAY)
        );
        assert!(TimestampInput::Millis(253_402_300_799_000).to_birthday().is_some());
    }

    #[test]
    fn deserializes_untagged() {
        let n: TimestampInput = serde_json::from_str("42").unwrap();
        let s: TimestampInput = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(n, TimestampInput::Millis(42));
        assert_eq!(s, TimestampInput::Text("42".into()));
    }
}
