//! Defines the types that define a connection

use core::fmt::{Display, Error as FmtError, Formatter};
use core::time::Duration;

use interlink_core_commitment_types::commitment::CommitmentPrefix;
use interlink_core_host_types::identifiers::{ClientId, ConnectionId};
use interlink_primitives::prelude::*;
use interlink_primitives::utils::borsh_duration;

use crate::error::ConnectionError;
use crate::version::Version;

/// The local view of one end of a connection.
///
/// `versions` holds the proposed set while the end is INIT and the single
/// negotiated version from TRYOPEN on.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ConnectionEnd {
    pub state: State,
    client_id: ClientId,
    counterparty: Counterparty,
    versions: Vec<Version>,
    #[borsh(
        serialize_with = "borsh_duration::serialize",
        deserialize_with = "borsh_duration::deserialize"
    )]
    delay_period: Duration,
}

impl ConnectionEnd {
    pub fn new(
        state: State,
        client_id: ClientId,
        counterparty: Counterparty,
        versions: Vec<Version>,
        delay_period: Duration,
    ) -> Result<Self, ConnectionError> {
        if state != State::Init && versions.len() != 1 {
            return Err(ConnectionError::InvalidVersionLength);
        }

        Ok(Self {
            state,
            client_id,
            counterparty,
            versions,
            delay_period,
        })
    }

    /// Getter for the state of this connection end.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Setter for the `state` field.
    pub fn set_state(&mut self, new_state: State) {
        self.state = new_state;
    }

    /// Setter for the `counterparty` field.
    pub fn set_counterparty(&mut self, new_cparty: Counterparty) {
        self.counterparty = new_cparty;
    }

    /// Setter for the `version` field.
    pub fn set_version(&mut self, new_version: Version) {
        self.versions = vec![new_version];
    }

    pub fn counterparty_matches(&self, other: &Counterparty) -> bool {
        self.counterparty.eq(other)
    }

    pub fn client_id_matches(&self, other: &ClientId) -> bool {
        self.client_id.eq(other)
    }

    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    pub fn is_uninitialized(&self) -> bool {
        self.state == State::Uninitialized
    }

    /// Checks if the state of this connection end matches with an expected state.
    pub fn verify_state_matches(&self, expected: &State) -> Result<(), ConnectionError> {
        if !self.state.eq(expected) {
            return Err(ConnectionError::InvalidState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// The negotiated version of an end past INIT.
    pub fn version(&self) -> Result<&Version, ConnectionError> {
        match self.versions.as_slice() {
            [version] => Ok(version),
            _ => Err(ConnectionError::InvalidVersionLength),
        }
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.counterparty
    }

    /// Minimum time that must pass between a header being accepted locally
    /// and its consensus state being used to verify a packet proof.
    pub fn delay_period(&self) -> Duration {
        self.delay_period
    }
}

/// The counterparty's side of a connection, as known locally.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Counterparty {
    pub client_id: ClientId,
    pub connection_id: Option<ConnectionId>,
    pub prefix: CommitmentPrefix,
}

impl Counterparty {
    pub fn new(
        client_id: ClientId,
        connection_id: Option<ConnectionId>,
        prefix: CommitmentPrefix,
    ) -> Self {
        Self {
            client_id,
            connection_id,
            prefix,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn connection_id(&self) -> Option<&ConnectionId> {
        self.connection_id.as_ref()
    }

    pub fn prefix(&self) -> &CommitmentPrefix {
        &self.prefix
    }

    /// Called upon initiating a connection handshake on the host chain to verify
    /// that the counterparty connection id has not been set.
    pub fn verify_empty_connection_id(&self) -> Result<(), ConnectionError> {
        if self.connection_id().is_some() {
            return Err(ConnectionError::InvalidCounterparty);
        }
        Ok(())
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, borsh::BorshSerialize, borsh::BorshDeserialize)]
#[borsh(use_discriminant = true)]
pub enum State {
    Uninitialized = 0,
    Init = 1,
    TryOpen = 2,
    Open = 3,
}

impl State {
    /// Yields the State as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
        }
    }

    pub fn is_open(self) -> bool {
        self == State::Open
    }

    /// Returns whether or not this connection with this state
    /// has progressed less or the same than the argument.
    pub fn less_or_equal_progress(self, other: Self) -> bool {
        self as u32 <= other as u32
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use rstest::rstest;

    use super::*;

    fn counterparty() -> Counterparty {
        Counterparty::new(
            ClientId::from_str("07-headerchain-0").unwrap(),
            None,
            CommitmentPrefix::try_from(b"ibc".to_vec()).unwrap(),
        )
    }

    #[rstest]
    #[case(State::Init, Version::compatibles(), true)]
    #[case(State::Init, vec![], true)]
    #[case(State::TryOpen, Version::compatibles(), true)]
    #[case(State::TryOpen, vec![], false)]
    #[case(State::Open, [Version::compatibles(), Version::compatibles()].concat(), false)]
    fn test_connection_end_version_count(
        #[case] state: State,
        #[case] versions: Vec<Version>,
        #[case] ok: bool,
    ) {
        let end = ConnectionEnd::new(
            state,
            ClientId::from_str("06-solo-1").unwrap(),
            counterparty(),
            versions,
            Duration::from_secs(10),
        );
        assert_eq!(end.is_ok(), ok);
    }

    #[test]
    fn test_state_progress() {
        assert!(State::Init.less_or_equal_progress(State::Open));
        assert!(State::TryOpen.less_or_equal_progress(State::TryOpen));
        assert!(!State::Open.less_or_equal_progress(State::Uninitialized));
    }

    #[test]
    fn test_connection_end_borsh_keeps_delay() {
        let end = ConnectionEnd::new(
            State::Open,
            ClientId::from_str("06-solo-1").unwrap(),
            counterparty(),
            Version::compatibles(),
            Duration::new(5, 42),
        )
        .unwrap();
        let bytes = borsh::to_vec(&end).unwrap();
        let decoded: ConnectionEnd = borsh::from_slice(&bytes).unwrap();
        assert_eq!(decoded.delay_period(), Duration::new(5, 42));
        assert_eq!(decoded, end);
    }
}
