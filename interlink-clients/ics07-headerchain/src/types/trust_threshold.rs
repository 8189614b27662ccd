//! IBC light clients have a configurable trust threshold: the share of a
//! previously trusted validator set's voting power that must sign a
//! non-adjacent header for it to be accepted.

use core::fmt::{Display, Error as FmtError, Formatter};

use interlink_primitives::prelude::*;

use crate::types::error::HeaderChainError;

/// A fraction in the closed interval `[1/3, 1]`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub struct TrustThreshold {
    numerator: u64,
    denominator: u64,
}

impl TrustThreshold {
    /// Constant for a trust threshold of 1/3.
    pub const ONE_THIRD: Self = Self {
        numerator: 1,
        denominator: 3,
    };

    /// Constant for a trust threshold of 2/3.
    pub const TWO_THIRDS: Self = Self {
        numerator: 2,
        denominator: 3,
    };

    pub fn new(numerator: u64, denominator: u64) -> Result<Self, HeaderChainError> {
        let threshold = Self {
            numerator,
            denominator,
        };
        threshold.validate()?;
        Ok(threshold)
    }

    pub fn validate(&self) -> Result<(), HeaderChainError> {
        // 1/3 <= n/d <= 1
        let (n, d) = (u128::from(self.numerator), u128::from(self.denominator));
        if d == 0 || n > d || 3 * n < d {
            return Err(HeaderChainError::InvalidTrustThreshold {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// True iff `signed / total` strictly exceeds this fraction.
    pub fn is_exceeded_by(&self, signed: u64, total: u64) -> bool {
        u128::from(signed) * u128::from(self.denominator)
            > u128::from(total) * u128::from(self.numerator)
    }
}

impl Default for TrustThreshold {
    fn default() -> Self {
        Self::ONE_THIRD
    }
}

impl Display for TrustThreshold {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, 3, true)]
    #[case(2, 3, true)]
    #[case(1, 1, true)]
    #[case(1, 4, false)]
    #[case(4, 3, false)]
    #[case(0, 0, false)]
    fn test_trust_threshold_bounds(
        #[case] numerator: u64,
        #[case] denominator: u64,
        #[case] valid: bool,
    ) {
        assert_eq!(TrustThreshold::new(numerator, denominator).is_ok(), valid);
    }

    #[rstest]
    #[case(TrustThreshold::TWO_THIRDS, 2, 3, false)]
    #[case(TrustThreshold::TWO_THIRDS, 3, 4, true)]
    #[case(TrustThreshold::ONE_THIRD, 1, 3, false)]
    #[case(TrustThreshold::ONE_THIRD, 2, 5, true)]
    fn test_threshold_is_strict(
        #[case] threshold: TrustThreshold,
        #[case] signed: u64,
        #[case] total: u64,
        #[case] exceeded: bool,
    ) {
        assert_eq!(threshold.is_exceeded_by(signed, total), exceeded);
    }
}
