use core::fmt::{Debug, Display, Formatter};
use core::str::FromStr;

use interlink_primitives::prelude::*;

use crate::error::ClientError;

/// Represents the status of a client
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub enum Status {
    /// The client is active and allowed to be used
    Active,
    /// The client is frozen after misbehaviour and not allowed to be used
    Frozen,
    /// The client's latest consensus state is older than its trusting period
    Expired,
    /// The client's status could not be determined
    Unknown,
}

impl Status {
    pub fn is_active(&self) -> bool {
        *self == Status::Active
    }

    pub fn is_frozen(&self) -> bool {
        *self == Status::Frozen
    }

    pub fn is_expired(&self) -> bool {
        *self == Status::Expired
    }

    /// Checks whether the status is active; returns `Err` if not.
    pub fn verify_is_active(&self) -> Result<(), ClientError> {
        match self {
            Self::Active => Ok(()),
            &status => Err(ClientError::ClientNotActive { status }),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for Status {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" | "ACTIVE" => Ok(Status::Active),
            "Frozen" | "FROZEN" => Ok(Status::Frozen),
            "Expired" | "EXPIRED" => Ok(Status::Expired),
            "Unknown" | "UNKNOWN" => Ok(Status::Unknown),
            _ => Err(ClientError::InvalidStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_through_display() {
        for status in [Status::Active, Status::Frozen, Status::Expired, Status::Unknown] {
            assert_eq!(Status::from_str(&status.to_string()).unwrap(), status);
        }
        assert!(Status::from_str("Dormant").is_err());
    }

    #[test]
    fn test_only_active_is_usable() {
        assert!(Status::Active.verify_is_active().is_ok());
        assert!(matches!(
            Status::Frozen.verify_is_active(),
            Err(ClientError::ClientNotActive {
                status: Status::Frozen
            })
        ));
    }
}
