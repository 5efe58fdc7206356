//! Commit timestamps.
//!
//! Every committed version records the instant it was committed, persisted in a single
//! canonical textual form: `YYYY-MM-DD HH:MM:SS.ffffff+0000` (microsecond precision,
//! explicit UTC offset). The fixed-width fields and fixed offset make lexical order of
//! the canonical form agree with chronological order.
//!
//! Callers may supply an instant as either a calendar datetime (which must carry the UTC
//! offset) or a count of microseconds since the Unix epoch; both canonicalize to the same
//! form via [`Timestamp::try_from`].

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use thiserror::Error;

/// The canonical timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f%z";

/// A canonicalized commit timestamp: a UTC instant with microsecond precision.
///
/// The [`Ord`] implementation is chronological and agrees with lexical order of the
/// canonical string form.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Timestamp(DateTime<Utc>);

/// An invalid timestamp.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// A calendar datetime with a non-UTC offset.
    #[error("timestamp must be in UTC, got offset {_0}")]
    NotUtc(FixedOffset),
    /// A string which does not match the canonical format.
    #[error("invalid timestamp {_0}")]
    Parse(String),
    /// An epoch-based value outside the representable range.
    #[error("timestamp of {_0} microseconds since the epoch is out of range")]
    OutOfRange(i64),
}

/// An instant supplied to the commit protocol, in one of the two accepted representations.
#[derive(Clone, Copy, Debug)]
pub enum TimestampValue {
    /// A calendar datetime. The offset must be UTC.
    DateTime(DateTime<FixedOffset>),
    /// Microseconds since the Unix epoch, implicitly UTC.
    EpochMicros(i64),
}

impl Timestamp {
    /// The current UTC time, truncated to microsecond precision.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(6))
    }

    /// The canonical string form of the timestamp.
    #[must_use]
    pub fn to_canonical(&self) -> String {
        self.0.format(TIMESTAMP_FORMAT).to_string()
    }

    /// The underlying UTC datetime.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime.trunc_subsecs(6))
    }
}

impl TryFrom<TimestampValue> for Timestamp {
    type Error = TimestampError;

    fn try_from(value: TimestampValue) -> Result<Self, Self::Error> {
        match value {
            TimestampValue::DateTime(datetime) => {
                if datetime.offset().local_minus_utc() == 0 {
                    Ok(Self(datetime.with_timezone(&Utc).trunc_subsecs(6)))
                } else {
                    Err(TimestampError::NotUtc(*datetime.offset()))
                }
            }
            TimestampValue::EpochMicros(micros) => DateTime::from_timestamp_micros(micros)
                .map(Self)
                .ok_or(TimestampError::OutOfRange(micros)),
        }
    }
}

impl From<DateTime<Utc>> for TimestampValue {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::DateTime(datetime.fixed_offset())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical())
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let datetime = DateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .map_err(|_| TimestampError::Parse(s.to_string()))?;
        Ok(Self(datetime.with_timezone(&Utc)))
    }
}

impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical())
    }
}

impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn canonical_form() {
        let datetime = Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        let timestamp = Timestamp::from(datetime);
        assert_eq!(timestamp.to_canonical(), "2024-05-06 10:00:00.123456+0000");
    }

    #[test]
    fn round_trip_datetime() {
        let datetime = Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap()
            + chrono::Duration::microseconds(42);
        let timestamp = Timestamp::try_from(TimestampValue::from(datetime)).unwrap();
        let parsed: Timestamp = timestamp.to_canonical().parse().unwrap();
        assert_eq!(parsed, timestamp);
        assert_eq!(parsed.as_datetime(), &datetime);
    }

    #[test]
    fn round_trip_epoch_micros() {
        let micros = 1_700_000_000_123_456;
        let timestamp = Timestamp::try_from(TimestampValue::EpochMicros(micros)).unwrap();
        let parsed: Timestamp = timestamp.to_canonical().parse().unwrap();
        assert_eq!(parsed, timestamp);
        assert_eq!(parsed.as_datetime().timestamp_micros(), micros);
    }

    #[test]
    fn representations_agree() {
        let datetime = Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap();
        let from_datetime = Timestamp::try_from(TimestampValue::from(datetime)).unwrap();
        let from_micros =
            Timestamp::try_from(TimestampValue::EpochMicros(datetime.timestamp_micros())).unwrap();
        assert_eq!(from_datetime, from_micros);
    }

    #[test]
    fn rejects_non_utc() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let datetime = offset.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap();
        let result = Timestamp::try_from(TimestampValue::DateTime(datetime));
        assert!(matches!(result, Err(TimestampError::NotUtc(_))));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "yesterday".parse::<Timestamp>(),
            Err(TimestampError::Parse(_))
        ));
    }

    #[test]
    fn lexical_order_is_chronological() {
        let a = Timestamp::try_from(TimestampValue::EpochMicros(1_000_000)).unwrap();
        let b = Timestamp::try_from(TimestampValue::EpochMicros(2_000_000)).unwrap();
        assert!(a < b);
        assert!(a.to_canonical() < b.to_canonical());
    }

    #[test]
    fn serde_round_trip() {
        let timestamp = Timestamp::try_from(TimestampValue::EpochMicros(123_456_789)).unwrap();
        let json = serde_json::to_string(&timestamp).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, timestamp);
    }
}
