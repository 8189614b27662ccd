//! The event emitted by each step of the connection handshake.

use interlink_core_host_types::identifiers::{ClientId, ConnectionId};
use interlink_primitives::prelude::*;

pub const CONNECTION_OPEN_INIT_EVENT: &str = "connection_open_init";
pub const CONNECTION_OPEN_TRY_EVENT: &str = "connection_open_try";
pub const CONNECTION_OPEN_ACK_EVENT: &str = "connection_open_ack";
pub const CONNECTION_OPEN_CONFIRM_EVENT: &str = "connection_open_confirm";

/// The handshake step that produced a [`ConnectionHandshake`] event.
/// `OpenInit` and `OpenAck` run on the initiating chain, `OpenTry` and
/// `OpenConfirm` on the responding one.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub enum HandshakeStep {
    OpenInit,
    OpenTry,
    OpenAck,
    OpenConfirm,
}

impl HandshakeStep {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::OpenInit => CONNECTION_OPEN_INIT_EVENT,
            Self::OpenTry => CONNECTION_OPEN_TRY_EVENT,
            Self::OpenAck => CONNECTION_OPEN_ACK_EVENT,
            Self::OpenConfirm => CONNECTION_OPEN_CONFIRM_EVENT,
        }
    }
}

/// A connection end moved one handshake step forward. Identifiers are given
/// from the point of view of the emitting chain; the counterparty connection
/// is unknown until `OpenTry`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ConnectionHandshake {
    step: HandshakeStep,
    conn_id: ConnectionId,
    client_id: ClientId,
    counterparty_conn_id: Option<ConnectionId>,
    counterparty_client_id: ClientId,
}

impl ConnectionHandshake {
    pub fn open_init(
        conn_id_on_a: ConnectionId,
        client_id_on_a: ClientId,
        client_id_on_b: ClientId,
    ) -> Self {
        Self {
            step: HandshakeStep::OpenInit,
            conn_id: conn_id_on_a,
            client_id: client_id_on_a,
            counterparty_conn_id: None,
            counterparty_client_id: client_id_on_b,
        }
    }

    /// `step` is one of the steps taken once both connection identifiers
    /// are known.
    pub fn with_counterparty(
        step: HandshakeStep,
        conn_id: ConnectionId,
        client_id: ClientId,
        counterparty_conn_id: ConnectionId,
        counterparty_client_id: ClientId,
    ) -> Self {
        Self {
            step,
            conn_id,
            client_id,
            counterparty_conn_id: Some(counterparty_conn_id),
            counterparty_client_id,
        }
    }

    pub fn step(&self) -> HandshakeStep {
        self.step
    }

    pub fn conn_id(&self) -> &ConnectionId {
        &self.conn_id
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn counterparty_conn_id(&self) -> Option<&ConnectionId> {
        self.counterparty_conn_id.as_ref()
    }

    pub fn counterparty_client_id(&self) -> &ClientId {
        &self.counterparty_client_id
    }

    pub fn event_type(&self) -> &str {
        self.step.event_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_init_has_no_counterparty_connection() {
        let event = ConnectionHandshake::open_init(
            ConnectionId::new(0),
            ClientId::new("07-headerchain", 0).unwrap(),
            ClientId::new("07-headerchain", 3).unwrap(),
        );
        assert_eq!(event.step(), HandshakeStep::OpenInit);
        assert_eq!(event.counterparty_conn_id(), None);
        assert_eq!(event.event_type(), "connection_open_init");
    }
}
