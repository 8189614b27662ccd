mod chain_id;
mod channel_id;
mod client_id;
mod client_type;
mod connection_id;
mod port_id;
mod sequence;

pub use chain_id::ChainId;
pub use channel_id::ChannelId;
pub use client_id::ClientId;
pub use client_type::ClientType;
pub use connection_id::ConnectionId;
pub use port_id::PortId;
pub use sequence::Sequence;
