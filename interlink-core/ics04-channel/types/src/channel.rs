//! The channel end a host stores for each of its channels.

use core::fmt::{Display, Error as FmtError, Formatter};

use interlink_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use interlink_primitives::prelude::*;
use interlink_primitives::utils::PrettySlice;

use crate::error::ChannelError;
use crate::Version;

/// One end of a channel: where it stands in the handshake, how it orders
/// packets, whom it talks to and over which connection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ChannelEnd {
    pub state: State,
    pub ordering: Order,
    pub remote: Counterparty,
    pub connection_hops: Vec<ConnectionId>,
    pub version: Version,
}

impl Display for ChannelEnd {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "{} {} channel to {} over {} ({})",
            self.state,
            self.ordering,
            self.remote,
            PrettySlice(&self.connection_hops),
            self.version
        )
    }
}

impl ChannelEnd {
    /// Fails for an uninitialized end or one not routed over exactly one
    /// connection.
    pub fn new(
        state: State,
        ordering: Order,
        remote: Counterparty,
        connection_hops: Vec<ConnectionId>,
        version: Version,
    ) -> Result<Self, ChannelError> {
        if state == State::Uninitialized {
            return Err(ChannelError::InvalidState {
                expected: "any initialized state".to_string(),
                actual: state.to_string(),
            });
        }
        verify_connection_hops_length(&connection_hops, 1)?;

        Ok(Self {
            state,
            ordering,
            remote,
            connection_hops,
            version,
        })
    }

    pub fn set_state(&mut self, s: State) {
        self.state = s;
    }

    pub fn set_version(&mut self, v: Version) {
        self.version = v;
    }

    pub fn set_counterparty_channel_id(&mut self, c: ChannelId) {
        self.remote.channel_id = Some(c);
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn ordering(&self) -> &Order {
        &self.ordering
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.remote
    }

    pub fn connection_hops(&self) -> &Vec<ConnectionId> {
        &self.connection_hops
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn verify_state_matches(&self, expected: &State) -> Result<(), ChannelError> {
        if self.state != *expected {
            return Err(ChannelError::InvalidState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    pub fn verify_not_closed(&self) -> Result<(), ChannelError> {
        match self.state {
            State::Closed => Err(ChannelError::ChannelClosed),
            _ => Ok(()),
        }
    }

    /// Packets flow only over an open channel. A closed channel reports
    /// `ChannelClosed` rather than a state mismatch.
    pub fn verify_open_for_packets(&self) -> Result<(), ChannelError> {
        self.verify_not_closed()?;
        self.verify_state_matches(&State::Open)
    }
}

/// Multi-hop channels are not supported, so every caller asks for one hop.
pub(crate) fn verify_connection_hops_length(
    connection_hops: &[ConnectionId],
    expected: u64,
) -> Result<(), ChannelError> {
    let actual = connection_hops.len() as u64;
    if actual != expected {
        return Err(ChannelError::InvalidConnectionHopsLength { expected, actual });
    }
    Ok(())
}

/// The remote end of a channel. Its channel identifier is unknown until the
/// remote end has been created.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Counterparty {
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
}

impl Counterparty {
    pub fn new(port_id: PortId, channel_id: Option<ChannelId>) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }
}

impl Display for Counterparty {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match &self.channel_id {
            Some(channel_id) => write!(f, "{}/{}", self.port_id, channel_id),
            None => write!(f, "{}/?", self.port_id),
        }
    }
}

/// Ordering of packet delivery over a channel. Fixed when the channel is
/// created.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
#[borsh(use_discriminant = true)]
pub enum Order {
    Unordered = 1,
    Ordered = 2,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unordered => "ORDER_UNORDERED",
            Self::Ordered => "ORDER_ORDERED",
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
#[borsh(use_discriminant = true)]
pub enum State {
    Uninitialized = 0,
    Init = 1,
    TryOpen = 2,
    Open = 3,
    Closed = 4,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn counterparty() -> Counterparty {
        Counterparty::new(PortId::transfer(), Some(ChannelId::new(0)))
    }

    #[rstest]
    #[case(State::Init, vec![ConnectionId::new(0)], true)]
    #[case(State::Uninitialized, vec![ConnectionId::new(0)], false)]
    #[case(State::Open, vec![], false)]
    #[case(State::Open, vec![ConnectionId::new(0), ConnectionId::new(1)], false)]
    fn test_channel_end_validation(
        #[case] state: State,
        #[case] hops: Vec<ConnectionId>,
        #[case] ok: bool,
    ) {
        let end = ChannelEnd::new(state, Order::Ordered, counterparty(), hops, Version::empty());
        assert_eq!(end.is_ok(), ok);
    }

    #[test]
    fn test_closed_channel_refuses_packets() {
        let mut end = ChannelEnd::new(
            State::Open,
            Order::Unordered,
            counterparty(),
            vec![ConnectionId::new(0)],
            Version::new("ics20-1".to_string()),
        )
        .unwrap();
        assert!(end.verify_open_for_packets().is_ok());

        end.set_state(State::Closed);
        assert!(matches!(
            end.verify_open_for_packets(),
            Err(ChannelError::ChannelClosed)
        ));
    }

    #[test]
    fn test_init_channel_refuses_packets() {
        let end = ChannelEnd::new(
            State::Init,
            Order::Ordered,
            Counterparty::new(PortId::transfer(), None),
            vec![ConnectionId::new(0)],
            Version::empty(),
        )
        .unwrap();
        assert!(matches!(
            end.verify_open_for_packets(),
            Err(ChannelError::InvalidState { .. })
        ));
    }
}
