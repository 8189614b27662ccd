//! Message definitions for the connection handshake datagrams.
//!
//! We define each of the four connection handshake messages as its own
//! type. Per our convention, chain A initiates the handshake and chain B
//! responds to it.

use interlink_primitives::prelude::*;

mod conn_open_ack;
mod conn_open_confirm;
mod conn_open_init;
mod conn_open_try;

pub use conn_open_ack::*;
pub use conn_open_confirm::*;
pub use conn_open_init::*;
pub use conn_open_try::*;

/// Enumeration of all possible messages that the connection module handles.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone, Debug, PartialEq, Eq, derive_more::From, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub enum ConnectionMsg {
    OpenInit(MsgConnectionOpenInit),
    OpenTry(MsgConnectionOpenTry),
    OpenAck(MsgConnectionOpenAck),
    OpenConfirm(MsgConnectionOpenConfirm),
}
