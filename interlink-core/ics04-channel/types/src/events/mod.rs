//! Types for the events emitted by the channel handshake and packet handlers.

mod packet;

use interlink_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use interlink_primitives::prelude::*;
pub use packet::*;

use super::channel::Order;
use super::Version;

/// Channel event types
pub const CHANNEL_OPEN_INIT_EVENT: &str = "channel_open_init";
pub const CHANNEL_OPEN_TRY_EVENT: &str = "channel_open_try";
pub const CHANNEL_OPEN_ACK_EVENT: &str = "channel_open_ack";
pub const CHANNEL_OPEN_CONFIRM_EVENT: &str = "channel_open_confirm";
pub const CHANNEL_CLOSE_INIT_EVENT: &str = "channel_close_init";
pub const CHANNEL_CLOSE_CONFIRM_EVENT: &str = "channel_close_confirm";
pub const CHANNEL_CLOSED_EVENT: &str = "channel_close";

/// Attributes shared by every channel handshake event. The `port_id` and
/// `chan_id` fields describe the channel end of the chain emitting the event.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
struct Attributes {
    port_id: PortId,
    chan_id: ChannelId,
    counterparty_port_id: PortId,
    counterparty_chan_id: Option<ChannelId>,
    conn_id: ConnectionId,
}

macro_rules! channel_event {
    ($(#[$doc:meta])* $name:ident, $event_type:expr) => {
        $(#[$doc])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
        pub struct $name {
            attributes: Attributes,
            version: Option<Version>,
        }

        impl $name {
            pub fn port_id(&self) -> &PortId {
                &self.attributes.port_id
            }
            pub fn chan_id(&self) -> &ChannelId {
                &self.attributes.chan_id
            }
            pub fn counterparty_port_id(&self) -> &PortId {
                &self.attributes.counterparty_port_id
            }
            pub fn counterparty_chan_id(&self) -> Option<&ChannelId> {
                self.attributes.counterparty_chan_id.as_ref()
            }
            pub fn conn_id(&self) -> &ConnectionId {
                &self.attributes.conn_id
            }
            pub fn version(&self) -> Option<&Version> {
                self.version.as_ref()
            }

            pub fn event_type(&self) -> &str {
                $event_type
            }
        }
    };
}

channel_event!(
    /// Per our convention, this event is generated on chain A.
    OpenInit,
    CHANNEL_OPEN_INIT_EVENT
);
channel_event!(
    /// Per our convention, this event is generated on chain B.
    OpenTry,
    CHANNEL_OPEN_TRY_EVENT
);
channel_event!(
    /// Per our convention, this event is generated on chain A.
    OpenAck,
    CHANNEL_OPEN_ACK_EVENT
);
channel_event!(
    /// Per our convention, this event is generated on chain B.
    OpenConfirm,
    CHANNEL_OPEN_CONFIRM_EVENT
);
channel_event!(CloseInit, CHANNEL_CLOSE_INIT_EVENT);
channel_event!(CloseConfirm, CHANNEL_CLOSE_CONFIRM_EVENT);

impl OpenInit {
    pub fn new(
        port_id_on_a: PortId,
        chan_id_on_a: ChannelId,
        port_id_on_b: PortId,
        conn_id_on_a: ConnectionId,
        version_on_a: Version,
    ) -> Self {
        Self {
            attributes: Attributes {
                port_id: port_id_on_a,
                chan_id: chan_id_on_a,
                counterparty_port_id: port_id_on_b,
                counterparty_chan_id: None,
                conn_id: conn_id_on_a,
            },
            version: Some(version_on_a),
        }
    }
}

impl OpenTry {
    pub fn new(
        port_id_on_b: PortId,
        chan_id_on_b: ChannelId,
        port_id_on_a: PortId,
        chan_id_on_a: ChannelId,
        conn_id_on_b: ConnectionId,
        version_on_b: Version,
    ) -> Self {
        Self {
            attributes: Attributes {
                port_id: port_id_on_b,
                chan_id: chan_id_on_b,
                counterparty_port_id: port_id_on_a,
                counterparty_chan_id: Some(chan_id_on_a),
                conn_id: conn_id_on_b,
            },
            version: Some(version_on_b),
        }
    }
}

impl OpenAck {
    pub fn new(
        port_id_on_a: PortId,
        chan_id_on_a: ChannelId,
        port_id_on_b: PortId,
        chan_id_on_b: ChannelId,
        conn_id_on_a: ConnectionId,
    ) -> Self {
        Self {
            attributes: Attributes {
                port_id: port_id_on_a,
                chan_id: chan_id_on_a,
                counterparty_port_id: port_id_on_b,
                counterparty_chan_id: Some(chan_id_on_b),
                conn_id: conn_id_on_a,
            },
            version: None,
        }
    }
}

impl OpenConfirm {
    pub fn new(
        port_id_on_b: PortId,
        chan_id_on_b: ChannelId,
        port_id_on_a: PortId,
        chan_id_on_a: ChannelId,
        conn_id_on_b: ConnectionId,
    ) -> Self {
        Self {
            attributes: Attributes {
                port_id: port_id_on_b,
                chan_id: chan_id_on_b,
                counterparty_port_id: port_id_on_a,
                counterparty_chan_id: Some(chan_id_on_a),
                conn_id: conn_id_on_b,
            },
            version: None,
        }
    }
}

impl CloseInit {
    pub fn new(
        port_id_on_a: PortId,
        chan_id_on_a: ChannelId,
        port_id_on_b: PortId,
        chan_id_on_b: Option<ChannelId>,
        conn_id_on_a: ConnectionId,
    ) -> Self {
        Self {
            attributes: Attributes {
                port_id: port_id_on_a,
                chan_id: chan_id_on_a,
                counterparty_port_id: port_id_on_b,
                counterparty_chan_id: chan_id_on_b,
                conn_id: conn_id_on_a,
            },
            version: None,
        }
    }
}

impl CloseConfirm {
    pub fn new(
        port_id_on_b: PortId,
        chan_id_on_b: ChannelId,
        port_id_on_a: PortId,
        chan_id_on_a: Option<ChannelId>,
        conn_id_on_b: ConnectionId,
    ) -> Self {
        Self {
            attributes: Attributes {
                port_id: port_id_on_b,
                chan_id: chan_id_on_b,
                counterparty_port_id: port_id_on_a,
                counterparty_chan_id: chan_id_on_a,
                conn_id: conn_id_on_b,
            },
            version: None,
        }
    }
}

/// A `ChannelClosed` event is emitted when an ordered channel is closed
/// because one of its packets timed out.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ChannelClosed {
    attributes: Attributes,
    channel_ordering: Order,
}

impl ChannelClosed {
    pub fn new(
        port_id: PortId,
        chan_id: ChannelId,
        counterparty_port_id: PortId,
        counterparty_chan_id: Option<ChannelId>,
        conn_id: ConnectionId,
        channel_ordering: Order,
    ) -> Self {
        Self {
            attributes: Attributes {
                port_id,
                chan_id,
                counterparty_port_id,
                counterparty_chan_id,
                conn_id,
            },
            channel_ordering,
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.attributes.port_id
    }
    pub fn chan_id(&self) -> &ChannelId {
        &self.attributes.chan_id
    }
    pub fn counterparty_port_id(&self) -> &PortId {
        &self.attributes.counterparty_port_id
    }
    pub fn counterparty_chan_id(&self) -> Option<&ChannelId> {
        self.attributes.counterparty_chan_id.as_ref()
    }
    pub fn conn_id(&self) -> &ConnectionId {
        &self.attributes.conn_id
    }
    pub fn channel_ordering(&self) -> &Order {
        &self.channel_ordering
    }

    pub fn event_type(&self) -> &str {
        CHANNEL_CLOSED_EVENT
    }
}
