use core::fmt::{Display, Error as FmtError, Formatter};

use interlink_core_client_types::Height;
use interlink_primitives::prelude::*;

/// Indicates a consensus height on the destination chain after which the
/// packet will no longer be processed, and will instead count as having
/// timed-out.
///
/// `TimeoutHeight` is treated differently from other heights because
/// a height of zero stands for "no timeout height"; a height-based timeout
/// must be `Never` or `At` a non-zero height.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Copy, Clone, Debug, Hash, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub enum TimeoutHeight {
    Never,
    At(Height),
}

impl TimeoutHeight {
    pub fn no_timeout() -> Self {
        Self::Never
    }

    /// Revision number to be used in packet commitment computation
    pub fn commitment_revision_number(&self) -> u64 {
        match self {
            Self::At(height) => height.revision_number(),
            Self::Never => 0,
        }
    }

    /// Revision height to be used in packet commitment computation
    pub fn commitment_revision_height(&self) -> u64 {
        match self {
            Self::At(height) => height.revision_height(),
            Self::Never => 0,
        }
    }

    /// Check if a height is *at or past* the timeout height, and thus is
    /// expired.
    pub fn has_expired(&self, height: Height) -> bool {
        match self {
            Self::At(timeout_height) => height >= *timeout_height,
            // When there's no timeout, heights are never expired
            Self::Never => false,
        }
    }

    /// Returns the height formatted for an event attribute: `0-0` when the
    /// height is unset.
    pub fn to_event_attribute_value(self) -> String {
        match self {
            TimeoutHeight::At(height) => height.to_string(),
            TimeoutHeight::Never => "0-0".into(),
        }
    }

    pub fn is_set(&self) -> bool {
        match self {
            TimeoutHeight::At(_) => true,
            TimeoutHeight::Never => false,
        }
    }
}

impl Default for TimeoutHeight {
    fn default() -> Self {
        Self::Never
    }
}

impl From<Height> for TimeoutHeight {
    fn from(height: Height) -> Self {
        Self::At(height)
    }
}

impl Display for TimeoutHeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            TimeoutHeight::At(timeout_height) => write!(f, "{timeout_height}"),
            TimeoutHeight::Never => write!(f, "no timeout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::before(9, false)]
    #[case::at(10, true)]
    #[case::after(11, true)]
    fn test_timeout_height_expiry(#[case] current: u64, #[case] expired: bool) {
        let timeout = TimeoutHeight::At(Height::new(0, 10).unwrap());
        assert_eq!(timeout.has_expired(Height::new(0, current).unwrap()), expired);
    }

    #[test]
    fn test_never_expires() {
        assert!(!TimeoutHeight::Never.has_expired(Height::new(u64::MAX, u64::MAX).unwrap()));
        assert_eq!(TimeoutHeight::Never.to_event_attribute_value(), "0-0");
    }
}
