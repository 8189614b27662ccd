use interlink_core_channel_types::msgs::{
    ChannelMsg, MsgAcknowledgement, MsgChannelCloseConfirm, MsgChannelCloseInit, MsgChannelOpenAck,
    MsgChannelOpenConfirm, MsgChannelOpenInit, MsgChannelOpenTry, MsgRecvPacket, MsgTimeout,
    MsgTimeoutOnClose, PacketMsg, ACKNOWLEDGEMENT_TYPE_URL, CHAN_CLOSE_CONFIRM_TYPE_URL,
    CHAN_CLOSE_INIT_TYPE_URL, CHAN_OPEN_ACK_TYPE_URL, CHAN_OPEN_CONFIRM_TYPE_URL,
    CHAN_OPEN_INIT_TYPE_URL, CHAN_OPEN_TRY_TYPE_URL, RECV_PACKET_TYPE_URL,
    TIMEOUT_ON_CLOSE_TYPE_URL, TIMEOUT_TYPE_URL,
};
use interlink_core_client_types::msgs::{
    ClientMsg, MsgCreateClient, MsgSubmitMisbehaviour, MsgUpdateClient, MsgUpgradeClient,
    CREATE_CLIENT_TYPE_URL, SUBMIT_MISBEHAVIOUR_TYPE_URL, UPDATE_CLIENT_TYPE_URL,
    UPGRADE_CLIENT_TYPE_URL,
};
use interlink_core_connection_types::msgs::{
    ConnectionMsg, MsgConnectionOpenAck, MsgConnectionOpenConfirm, MsgConnectionOpenInit,
    MsgConnectionOpenTry, CONN_OPEN_ACK_TYPE_URL, CONN_OPEN_CONFIRM_TYPE_URL,
    CONN_OPEN_INIT_TYPE_URL, CONN_OPEN_TRY_TYPE_URL,
};
use interlink_core_router_types::error::RouterError;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec, Signer};

/// Enumeration of all messages that the local router is capable of routing.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone, Debug, PartialEq, Eq, derive_more::From, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub enum MsgEnvelope {
    Client(ClientMsg),
    Connection(ConnectionMsg),
    Channel(ChannelMsg),
    Packet(PacketMsg),
}

impl MsgEnvelope {
    pub fn signer(&self) -> &Signer {
        match self {
            MsgEnvelope::Client(msg) => match msg {
                ClientMsg::CreateClient(msg) => &msg.signer,
                ClientMsg::UpdateClient(msg) => &msg.signer,
                ClientMsg::UpgradeClient(msg) => &msg.signer,
                ClientMsg::Misbehaviour(msg) => &msg.signer,
            },
            MsgEnvelope::Connection(msg) => match msg {
                ConnectionMsg::OpenInit(msg) => &msg.signer,
                ConnectionMsg::OpenTry(msg) => &msg.signer,
                ConnectionMsg::OpenAck(msg) => &msg.signer,
                ConnectionMsg::OpenConfirm(msg) => &msg.signer,
            },
            MsgEnvelope::Channel(msg) => match msg {
                ChannelMsg::OpenInit(msg) => &msg.signer,
                ChannelMsg::OpenTry(msg) => &msg.signer,
                ChannelMsg::OpenAck(msg) => &msg.signer,
                ChannelMsg::OpenConfirm(msg) => &msg.signer,
                ChannelMsg::CloseInit(msg) => &msg.signer,
                ChannelMsg::CloseConfirm(msg) => &msg.signer,
            },
            MsgEnvelope::Packet(msg) => match msg {
                PacketMsg::Recv(msg) => &msg.signer,
                PacketMsg::Ack(msg) => &msg.signer,
                PacketMsg::Timeout(msg) => &msg.signer,
                PacketMsg::TimeoutOnClose(msg) => &msg.signer,
            },
        }
    }

    /// Wraps the inner message back into its `Any` envelope.
    pub fn to_any(&self) -> Any {
        match self {
            MsgEnvelope::Client(msg) => match msg {
                ClientMsg::CreateClient(msg) => msg.to_any(),
                ClientMsg::UpdateClient(msg) => msg.to_any(),
                ClientMsg::UpgradeClient(msg) => msg.to_any(),
                ClientMsg::Misbehaviour(msg) => msg.to_any(),
            },
            MsgEnvelope::Connection(msg) => match msg {
                ConnectionMsg::OpenInit(msg) => msg.to_any(),
                ConnectionMsg::OpenTry(msg) => msg.to_any(),
                ConnectionMsg::OpenAck(msg) => msg.to_any(),
                ConnectionMsg::OpenConfirm(msg) => msg.to_any(),
            },
            MsgEnvelope::Channel(msg) => match msg {
                ChannelMsg::OpenInit(msg) => msg.to_any(),
                ChannelMsg::OpenTry(msg) => msg.to_any(),
                ChannelMsg::OpenAck(msg) => msg.to_any(),
                ChannelMsg::OpenConfirm(msg) => msg.to_any(),
                ChannelMsg::CloseInit(msg) => msg.to_any(),
                ChannelMsg::CloseConfirm(msg) => msg.to_any(),
            },
            MsgEnvelope::Packet(msg) => match msg {
                PacketMsg::Recv(msg) => msg.to_any(),
                PacketMsg::Ack(msg) => msg.to_any(),
                PacketMsg::Timeout(msg) => msg.to_any(),
                PacketMsg::TimeoutOnClose(msg) => msg.to_any(),
            },
        }
    }
}

/// Pops the message out of the envelope.
fn decode<M: AnyCodec>(any_msg: &Any) -> Result<M, RouterError> {
    M::decode_vec(&any_msg.value).map_err(|e| RouterError::MalformedMessageBytes {
        reason: e.to_string(),
    })
}

impl TryFrom<Any> for MsgEnvelope {
    type Error = RouterError;

    fn try_from(any_msg: Any) -> Result<Self, Self::Error> {
        let envelope: MsgEnvelope = match any_msg.type_url.as_str() {
            // client messages
            CREATE_CLIENT_TYPE_URL => {
                ClientMsg::CreateClient(decode::<MsgCreateClient>(&any_msg)?).into()
            }
            UPDATE_CLIENT_TYPE_URL => {
                ClientMsg::UpdateClient(decode::<MsgUpdateClient>(&any_msg)?).into()
            }
            UPGRADE_CLIENT_TYPE_URL => {
                ClientMsg::UpgradeClient(decode::<MsgUpgradeClient>(&any_msg)?).into()
            }
            SUBMIT_MISBEHAVIOUR_TYPE_URL => {
                ClientMsg::Misbehaviour(decode::<MsgSubmitMisbehaviour>(&any_msg)?).into()
            }

            // connection handshake
            CONN_OPEN_INIT_TYPE_URL => {
                ConnectionMsg::OpenInit(decode::<MsgConnectionOpenInit>(&any_msg)?).into()
            }
            CONN_OPEN_TRY_TYPE_URL => {
                ConnectionMsg::OpenTry(decode::<MsgConnectionOpenTry>(&any_msg)?).into()
            }
            CONN_OPEN_ACK_TYPE_URL => {
                ConnectionMsg::OpenAck(decode::<MsgConnectionOpenAck>(&any_msg)?).into()
            }
            CONN_OPEN_CONFIRM_TYPE_URL => {
                ConnectionMsg::OpenConfirm(decode::<MsgConnectionOpenConfirm>(&any_msg)?).into()
            }

            // channel handshake
            CHAN_OPEN_INIT_TYPE_URL => {
                ChannelMsg::OpenInit(decode::<MsgChannelOpenInit>(&any_msg)?).into()
            }
            CHAN_OPEN_TRY_TYPE_URL => {
                ChannelMsg::OpenTry(decode::<MsgChannelOpenTry>(&any_msg)?).into()
            }
            CHAN_OPEN_ACK_TYPE_URL => {
                ChannelMsg::OpenAck(decode::<MsgChannelOpenAck>(&any_msg)?).into()
            }
            CHAN_OPEN_CONFIRM_TYPE_URL => {
                ChannelMsg::OpenConfirm(decode::<MsgChannelOpenConfirm>(&any_msg)?).into()
            }
            CHAN_CLOSE_INIT_TYPE_URL => {
                ChannelMsg::CloseInit(decode::<MsgChannelCloseInit>(&any_msg)?).into()
            }
            CHAN_CLOSE_CONFIRM_TYPE_URL => {
                ChannelMsg::CloseConfirm(decode::<MsgChannelCloseConfirm>(&any_msg)?).into()
            }

            // packets
            RECV_PACKET_TYPE_URL => PacketMsg::Recv(decode::<MsgRecvPacket>(&any_msg)?).into(),
            ACKNOWLEDGEMENT_TYPE_URL => {
                PacketMsg::Ack(decode::<MsgAcknowledgement>(&any_msg)?).into()
            }
            TIMEOUT_TYPE_URL => PacketMsg::Timeout(decode::<MsgTimeout>(&any_msg)?).into(),
            TIMEOUT_ON_CLOSE_TYPE_URL => {
                PacketMsg::TimeoutOnClose(decode::<MsgTimeoutOnClose>(&any_msg)?).into()
            }
            _ => {
                return Err(RouterError::UnknownMessageTypeUrl {
                    url: any_msg.type_url,
                })
            }
        };
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use interlink_core_channel_types::msgs::MsgChannelCloseInit;
    use interlink_core_host_types::identifiers::{ChannelId, PortId};
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_envelope_from_any() {
        let msg = MsgChannelCloseInit {
            port_id_on_a: PortId::transfer(),
            chan_id_on_a: ChannelId::new(3),
            signer: Signer::new("relayer"),
        };
        let envelope = MsgEnvelope::try_from(msg.to_any()).unwrap();
        assert_eq!(envelope, MsgEnvelope::Channel(ChannelMsg::CloseInit(msg.clone())));
        assert_eq!(envelope.to_any(), msg.to_any());
        assert_eq!(envelope.signer().as_ref(), "relayer");
    }

    #[test]
    fn test_unknown_and_malformed_rejected() {
        let unknown = Any::new("/interlink.core.unknown.v1.MsgFoo", vec![]);
        assert!(matches!(
            MsgEnvelope::try_from(unknown),
            Err(RouterError::UnknownMessageTypeUrl { .. })
        ));

    }

    #[rstest]
    #[case(CREATE_CLIENT_TYPE_URL)]
    #[case(SUBMIT_MISBEHAVIOUR_TYPE_URL)]
    #[case(CONN_OPEN_TRY_TYPE_URL)]
    #[case(CHAN_OPEN_ACK_TYPE_URL)]
    #[case(RECV_PACKET_TYPE_URL)]
    #[case(TIMEOUT_TYPE_URL)]
    fn test_malformed_bytes_rejected(#[case] type_url: &str) {
        let malformed = Any::new(type_url, vec![1, 2, 3]);
        assert!(matches!(
            MsgEnvelope::try_from(malformed),
            Err(RouterError::MalformedMessageBytes { .. })
        ));
    }
}
