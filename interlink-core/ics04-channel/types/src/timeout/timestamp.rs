use core::fmt::{Display, Error as FmtError, Formatter};
use core::ops::{Add, Sub};
use core::time::Duration;

use interlink_primitives::prelude::*;
use interlink_primitives::Timestamp;

use crate::error::PacketError;

/// Indicates a timestamp on the destination chain after which the packet
/// will no longer be processed, and will instead count as having timed-out.
/// A value of zero nanoseconds stands for "no timeout timestamp".
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub enum TimeoutTimestamp {
    Never,
    At(Timestamp),
}

impl TimeoutTimestamp {
    pub fn from_nanoseconds(nanoseconds: u64) -> Result<Self, PacketError> {
        Self::try_from(nanoseconds)
    }

    pub fn nanoseconds(&self) -> u64 {
        match self {
            Self::At(timestamp) => timestamp.nanoseconds(),
            Self::Never => 0,
        }
    }

    pub fn is_set(&self) -> bool {
        match self {
            TimeoutTimestamp::At(_) => true,
            TimeoutTimestamp::Never => false,
        }
    }

    pub fn no_timeout() -> Self {
        Self::Never
    }

    /// Check if a timestamp is *at or past* the timeout timestamp.
    pub fn has_expired(&self, timestamp: &Timestamp) -> bool {
        match self {
            Self::At(timeout_timestamp) => timestamp >= timeout_timestamp,
            Self::Never => false,
        }
    }
}

impl Default for TimeoutTimestamp {
    fn default() -> Self {
        Self::Never
    }
}

impl From<Timestamp> for TimeoutTimestamp {
    fn from(timestamp: Timestamp) -> Self {
        Self::At(timestamp)
    }
}

impl TryFrom<u64> for TimeoutTimestamp {
    type Error = PacketError;

    fn try_from(timestamp: u64) -> Result<Self, Self::Error> {
        let timeout_timestamp = if timestamp == 0 {
            TimeoutTimestamp::Never
        } else {
            let timestamp = Timestamp::from_nanoseconds(timestamp)?;
            TimeoutTimestamp::At(timestamp)
        };

        Ok(timeout_timestamp)
    }
}

impl Display for TimeoutTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            TimeoutTimestamp::At(timeout_timestamp) => write!(f, "{timeout_timestamp}"),
            TimeoutTimestamp::Never => write!(f, "no timeout timestamp"),
        }
    }
}

impl Add<Duration> for TimeoutTimestamp {
    type Output = Result<Self, PacketError>;

    fn add(self, rhs: Duration) -> Self::Output {
        match self {
            TimeoutTimestamp::At(timestamp) => {
                let new_timestamp = timestamp.add(rhs)?;
                Ok(TimeoutTimestamp::At(new_timestamp))
            }
            TimeoutTimestamp::Never => Err(PacketError::MissingTimeout),
        }
    }
}

impl Sub<Duration> for TimeoutTimestamp {
    type Output = Result<Self, PacketError>;

    fn sub(self, rhs: Duration) -> Self::Output {
        match self {
            TimeoutTimestamp::At(timestamp) => {
                let new_timestamp = timestamp.sub(rhs)?;
                Ok(TimeoutTimestamp::At(new_timestamp))
            }
            TimeoutTimestamp::Never => Err(PacketError::MissingTimeout),
        }
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::{Deserialize, Serialize};

    use super::TimeoutTimestamp;

    impl Serialize for TimeoutTimestamp {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.nanoseconds().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for TimeoutTimestamp {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let timestamp = u64::deserialize(deserializer)?;
            TimeoutTimestamp::try_from(timestamp).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_no_timeout() {
        assert_eq!(TimeoutTimestamp::from_nanoseconds(0).unwrap(), TimeoutTimestamp::Never);
        assert_eq!(TimeoutTimestamp::Never.nanoseconds(), 0);
    }

    #[test]
    fn test_timeout_timestamp_expiry() {
        let t = Timestamp::from_nanoseconds(1_000).unwrap();
        let timeout = TimeoutTimestamp::At(t);
        assert!(!timeout.has_expired(&Timestamp::from_nanoseconds(999).unwrap()));
        assert!(timeout.has_expired(&t));
        assert!(!TimeoutTimestamp::Never.has_expired(&t));
    }
}
