//! Defines the representation of timestamps used by the protocol engine.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::num::{ParseIntError, TryFromIntError};
use core::ops::{Add, Sub};
use core::str::FromStr;
use core::time::Duration;

use displaydoc::Display;
use time::error::ComponentRange;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::prelude::*;

pub const ZERO_DURATION: Duration = Duration::from_secs(0);

/// A new type wrapper over `PrimitiveDateTime` keeping track of host and
/// counterparty timestamps. Encoded as nanoseconds since the unix epoch.
#[derive(PartialEq, Eq, Copy, Clone, Debug, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    time: PrimitiveDateTime,
}

impl Timestamp {
    pub fn from_nanoseconds(nanoseconds: u64) -> Result<Self, TimestampError> {
        Self::try_from(nanoseconds)
    }

    pub fn from_unix_timestamp(secs: u64, nanos: u32) -> Result<Self, TimestampError> {
        if nanos > 999_999_999 {
            return Err(TimestampError::DateOutOfRange);
        }

        let total_nanos = i128::from(secs) * 1_000_000_000 + i128::from(nanos);

        let odt = OffsetDateTime::from_unix_timestamp_nanos(total_nanos)?;

        Self::from_utc(odt)
    }

    /// Internal helper producing a `Timestamp` restricted to the years
    /// 1970..=2554, the range representable by a `u64` of nanoseconds.
    fn from_utc(t: OffsetDateTime) -> Result<Self, TimestampError> {
        debug_assert_eq!(t.offset(), UtcOffset::UTC);
        if t.unix_timestamp_nanos() < 0 || t.unix_timestamp_nanos() > i128::from(u64::MAX) {
            return Err(TimestampError::DateOutOfRange);
        }
        Ok(Self {
            time: PrimitiveDateTime::new(t.date(), t.time()),
        })
    }

    /// Returns a `Timestamp` representation of the current time.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        OffsetDateTime::now_utc()
            .try_into()
            .expect("now is in the range of 1970..=2554 years")
    }

    /// Computes the duration difference of another `Timestamp` from the
    /// current one. Returns `None` if `other` is later than `self`.
    pub fn duration_since(&self, other: &Self) -> Option<Duration> {
        let duration = self.time.assume_utc() - other.time.assume_utc();
        duration.try_into().ok()
    }

    /// Converts a `Timestamp` to its `u64` value in nanoseconds.
    pub fn nanoseconds(self) -> u64 {
        let odt: OffsetDateTime = self.into();
        // construction guarantees the value fits
        u64::try_from(odt.unix_timestamp_nanos()).unwrap_or(u64::MAX)
    }
}

impl TryFrom<OffsetDateTime> for Timestamp {
    type Error = TimestampError;

    fn try_from(t: OffsetDateTime) -> Result<Self, Self::Error> {
        Self::from_utc(t.to_offset(UtcOffset::UTC))
    }
}

impl From<Timestamp> for OffsetDateTime {
    fn from(t: Timestamp) -> Self {
        t.time.assume_utc()
    }
}

impl TryFrom<u64> for Timestamp {
    type Error = TimestampError;

    fn try_from(nanoseconds: u64) -> Result<Self, Self::Error> {
        let odt = OffsetDateTime::from_unix_timestamp_nanos(nanoseconds.into())?;
        Self::from_utc(odt)
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let nanoseconds = u64::from_str(s)?;
        Self::try_from(nanoseconds)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "Timestamp({})", self.time)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Result<Self, TimestampError>;

    fn add(self, rhs: Duration) -> Self::Output {
        let duration = rhs.try_into().map_err(|_| TimestampError::DateOutOfRange)?;
        let t = self
            .time
            .checked_add(duration)
            .ok_or(TimestampError::DateOutOfRange)?;
        Self::from_utc(t.assume_utc())
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Result<Self, TimestampError>;

    fn sub(self, rhs: Duration) -> Self::Output {
        let duration = rhs.try_into().map_err(|_| TimestampError::DateOutOfRange)?;
        let t = self
            .time
            .checked_sub(duration)
            .ok_or(TimestampError::DateOutOfRange)?;
        Self::from_utc(t.assume_utc())
    }
}

impl borsh::BorshSerialize for Timestamp {
    fn serialize<W: borsh::io::Write>(&self, writer: &mut W) -> borsh::io::Result<()> {
        let timestamp = self.nanoseconds();
        borsh::BorshSerialize::serialize(&timestamp, writer)
    }
}

impl borsh::BorshDeserialize for Timestamp {
    fn deserialize_reader<R: borsh::io::Read>(reader: &mut R) -> borsh::io::Result<Self> {
        let timestamp = u64::deserialize_reader(reader)?;
        Self::from_nanoseconds(timestamp).map_err(|_| borsh::io::ErrorKind::InvalidData.into())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.nanoseconds())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let nanoseconds = <u64 as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_nanoseconds(nanoseconds).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Display, derive_more::From)]
pub enum TimestampError {
    /// parsing u64 integer from string error: `{0}`
    ParseInt(ParseIntError),
    /// error converting integer to `Timestamp`: `{0}`
    TryFromInt(TryFromIntError),
    /// date out of range
    DateOutOfRange,
    /// time component out of range: `{0}`
    ComponentRange(ComponentRange),
    /// invalid timestamp: `{description}`
    InvalidTimestamp { description: String },
}

#[cfg(feature = "std")]
impl std::error::Error for TimestampError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::ParseInt(e) => Some(e),
            Self::TryFromInt(e) => Some(e),
            Self::ComponentRange(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;
    use std::thread::sleep;

    use rstest::rstest;

    use super::{Timestamp, ZERO_DURATION};

    #[rstest]
    #[case::zero(0)]
    #[case::one(1)]
    #[case::billions(1_700_000_000_000_000_000)]
    #[case::max(u64::MAX)]
    fn test_nanoseconds_round_trip(#[case] nanos: u64) {
        let ts = Timestamp::from_nanoseconds(nanos).unwrap();
        assert_eq!(ts.nanoseconds(), nanos);
    }

    #[test]
    fn test_timestamp_comparisons() {
        let nanos = 1_700_000_000_000_000_000;
        let earlier = Timestamp::from_nanoseconds(nanos).unwrap();
        let later = Timestamp::from_nanoseconds(nanos + 1).unwrap();

        assert!(later > earlier);
        assert_eq!(
            later.duration_since(&earlier),
            Some(Duration::from_nanos(1))
        );
        assert_eq!(earlier.duration_since(&later), None);
        assert_eq!(earlier.duration_since(&earlier), Some(ZERO_DURATION));
    }

    #[test]
    fn test_timestamp_arithmetic() {
        let ts = Timestamp::from_unix_timestamp(100, 0).unwrap();
        let later = (ts + Duration::from_secs(50)).unwrap();
        assert_eq!(later, Timestamp::from_unix_timestamp(150, 0).unwrap());
        assert_eq!((later - Duration::from_secs(50)).unwrap(), ts);
        assert!((ts - Duration::from_secs(101)).is_err());
    }

    #[test]
    fn test_now_is_after_epoch() {
        let a = Timestamp::now();
        sleep(Duration::from_millis(1));
        let b = Timestamp::now();
        assert!(b > a);
    }

    #[test]
    fn test_borsh_encoding_is_nanoseconds() {
        let ts = Timestamp::from_nanoseconds(42).unwrap();
        let bytes = borsh::to_vec(&ts).unwrap();
        assert_eq!(bytes, 42u64.to_le_bytes().to_vec());
        let decoded: Timestamp = borsh::from_slice(&bytes).unwrap();
        assert_eq!(decoded, ts);
    }
}
