//! Handlers for the channel and packet messages.
//!
//! Each handler first resolves the local end into a [`ChannelRoute`]. The
//! route owns every lookup that hangs off a channel end (its connection,
//! the client behind that connection, the counterparty identifiers), and
//! every proof checked against the counterparty goes through it.

use interlink_core_channel_types::channel::{ChannelEnd, Counterparty, Order, State};
use interlink_core_channel_types::commitment::compute_packet_commitment;
use interlink_core_channel_types::error::{ChannelError, PacketError};
use interlink_core_channel_types::packet::Packet;
use interlink_core_channel_types::Version;
use interlink_core_client::context::prelude::*;
use interlink_core_client::types::Height;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_connection::delay::conn_delay_period;
use interlink_core_connection::types::ConnectionEnd;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::{IbcEvent, MessageEvent};
use interlink_core_host::types::identifiers::{
    ChannelId, ClientId, ConnectionId, PortId, Sequence,
};
use interlink_core_host::types::path::{
    ChannelEndPath, CommitmentPath, Path, ReceiptPath, SeqAckPath, SeqRecvPath, SeqSendPath,
};
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::module::Module;
use interlink_core_router::types::module::{ModuleExtras, ModuleId};
use interlink_primitives::encode_to_vec;
use interlink_primitives::prelude::*;

pub mod acknowledgement;
pub mod chan_close_confirm;
pub mod chan_close_init;
pub mod chan_open_ack;
pub mod chan_open_confirm;
pub mod chan_open_init;
pub mod chan_open_try;
pub mod recv_packet;
pub mod send_packet;
pub mod timeout;
pub mod timeout_on_close;

/// A channel end resolved together with the single connection it rides
/// over.
pub(crate) struct ChannelRoute {
    pub port_id: PortId,
    pub chan_id: ChannelId,
    pub end: ChannelEnd,
    pub conn_id: ConnectionId,
    pub conn_end: ConnectionEnd,
}

impl ChannelRoute {
    /// Loads the stored end at `(port_id, chan_id)`.
    pub fn load<Ctx>(ctx: &Ctx, port_id: &PortId, chan_id: &ChannelId) -> Result<Self, ContextError>
    where
        Ctx: ValidationContext,
    {
        let end = ctx.channel_end(&ChannelEndPath::new(port_id, chan_id))?;
        Self::over(ctx, port_id.clone(), chan_id.clone(), end)
    }

    /// Loads an end that packets may travel over. A closed end fails with
    /// `ChannelClosed` before anything else is looked up.
    pub fn for_packets<Ctx>(
        ctx: &Ctx,
        port_id: &PortId,
        chan_id: &ChannelId,
    ) -> Result<Self, ContextError>
    where
        Ctx: ValidationContext,
    {
        let end = ctx.channel_end(&ChannelEndPath::new(port_id, chan_id))?;
        end.verify_open_for_packets()?;
        Self::over(ctx, port_id.clone(), chan_id.clone(), end)
    }

    /// Routes an end that may not be stored yet.
    pub fn over<Ctx>(
        ctx: &Ctx,
        port_id: PortId,
        chan_id: ChannelId,
        end: ChannelEnd,
    ) -> Result<Self, ContextError>
    where
        Ctx: ValidationContext,
    {
        let conn_id = end.connection_hops().first().cloned().ok_or(
            ChannelError::InvalidConnectionHopsLength {
                expected: 1,
                actual: 0,
            },
        )?;
        let conn_end = ctx.connection_end(&conn_id)?;
        Ok(Self {
            port_id,
            chan_id,
            end,
            conn_id,
            conn_end,
        })
    }

    pub fn path(&self) -> ChannelEndPath {
        ChannelEndPath::new(&self.port_id, &self.chan_id)
    }

    pub fn ordering(&self) -> Order {
        *self.end.ordering()
    }

    pub fn client_id(&self) -> &ClientId {
        self.conn_end.client_id()
    }

    pub fn peer_port_id(&self) -> &PortId {
        &self.end.counterparty().port_id
    }

    pub fn peer_chan_id(&self) -> Result<&ChannelId, ChannelError> {
        self.end
            .counterparty()
            .channel_id()
            .ok_or(ChannelError::MissingCounterparty)
    }

    /// The counterparty's name for our connection, known once the
    /// connection handshake got past its first step.
    pub fn peer_conn_id(&self) -> Result<ConnectionId, ChannelError> {
        self.conn_end.counterparty().connection_id().cloned().ok_or_else(|| {
            ChannelError::UndefinedConnectionCounterparty {
                connection_id: self.conn_id.clone(),
            }
        })
    }

    /// Channels only ride over connections that completed their handshake.
    pub fn require_open_connection(&self) -> Result<(), ChannelError> {
        if !self.conn_end.is_open() {
            return Err(ChannelError::ConnectionNotOpen {
                connection_id: self.conn_id.clone(),
            });
        }
        Ok(())
    }

    pub fn require_active_client<Ctx>(&self, ctx: &Ctx) -> Result<(), ContextError>
    where
        Ctx: ValidationContext,
    {
        let client_ctx = ctx.get_client_validation_context();
        client_ctx
            .client_state(self.client_id())?
            .status(client_ctx, self.client_id())?
            .verify_is_active()?;
        Ok(())
    }

    /// Fails unless packets addressed from or to `(port_id, chan_id)`
    /// belong to this end's counterparty.
    pub fn require_peer(&self, port_id: &PortId, chan_id: &ChannelId) -> Result<(), PacketError> {
        let remote = self.end.counterparty();
        if &remote.port_id != port_id || remote.channel_id() != Some(chan_id) {
            return Err(PacketError::InvalidPacketCounterparty {
                port_id: port_id.clone(),
                channel_id: chan_id.clone(),
            });
        }
        Ok(())
    }

    /// The end the counterparty holds for this channel once it reached
    /// `state`. An INIT end has not learnt our channel identifier yet.
    pub fn mirrored_end(&self, state: State, version: Version) -> Result<ChannelEnd, ContextError> {
        let known_id = (state != State::Init).then(|| self.chan_id.clone());
        Ok(ChannelEnd::new(
            state,
            self.ordering(),
            Counterparty::new(self.port_id.clone(), known_id),
            vec![self.peer_conn_id()?],
            version,
        )?)
    }

    /// Verifies that the counterparty stores `expected` under
    /// `peer_chan_id` as of `height`. Channel proofs carry no delay.
    pub fn verify_peer_end<Ctx>(
        &self,
        ctx: &Ctx,
        peer_chan_id: &ChannelId,
        expected: &ChannelEnd,
        height: Height,
        proof: &CommitmentProofBytes,
    ) -> Result<(), ContextError>
    where
        Ctx: ValidationContext,
    {
        let client_ctx = ctx.get_client_validation_context();
        client_ctx
            .client_state(self.client_id())?
            .verify_membership_at_height(
                client_ctx,
                self.client_id(),
                height,
                &DelayPeriod::none(),
                self.conn_end.counterparty().prefix(),
                proof,
                Path::ChannelEnd(ChannelEndPath::new(self.peer_port_id(), peer_chan_id)),
                encode_to_vec(expected),
            )
            .map_err(ChannelError::FailedProofVerification)?;
        Ok(())
    }

    /// Verifies one packet entry of the counterparty store as of `height`,
    /// once the connection delay has passed. `None` proves the entry absent.
    pub fn verify_peer_entry<Ctx>(
        &self,
        ctx: &Ctx,
        sequence: Sequence,
        path: Path,
        value: Option<Vec<u8>>,
        height: Height,
        proof: &CommitmentProofBytes,
    ) -> Result<(), ContextError>
    where
        Ctx: ValidationContext,
    {
        let client_ctx = ctx.get_client_validation_context();
        let client_state = client_ctx.client_state(self.client_id())?;
        let delay = conn_delay_period(ctx, &self.conn_end);
        let prefix = self.conn_end.counterparty().prefix();

        let verified = match value {
            Some(value) => client_state.verify_membership_at_height(
                client_ctx,
                self.client_id(),
                height,
                &delay,
                prefix,
                proof,
                path,
                value,
            ),
            None => client_state.verify_non_membership_at_height(
                client_ctx,
                self.client_id(),
                height,
                &delay,
                prefix,
                proof,
                path,
            ),
        };
        verified.map_err(|client_error| PacketError::FailedPacketVerification {
            sequence,
            client_error,
        })?;
        Ok(())
    }

    /// Checks that `packet` left through this end and still awaits its
    /// acknowledgement or timeout.
    pub fn verify_in_flight<Ctx>(&self, ctx: &Ctx, packet: &Packet) -> Result<(), ContextError>
    where
        Ctx: ValidationContext,
    {
        self.require_peer(&packet.port_id_on_b, &packet.chan_id_on_b)?;

        let path = CommitmentPath::new(&self.port_id, &self.chan_id, packet.seq_on_a);
        // Acknowledged and timed-out packets have their commitment deleted.
        let Ok(stored) = ctx.get_packet_commitment(&path) else {
            return Err(PacketError::PacketCommitmentNotFound(packet.seq_on_a).into());
        };

        let expected = compute_packet_commitment(
            &packet.data,
            &packet.timeout_height_on_b,
            &packet.timeout_timestamp_on_b,
        );
        if stored != expected {
            return Err(PacketError::MismatchedPacketCommitments {
                sequence: packet.seq_on_a,
                expected,
                actual: stored,
            }
            .into());
        }
        Ok(())
    }

    /// Verifies the counterparty never received `packet`. Unordered ends
    /// prove its receipt absent. Ordered ends prove the counterparty's
    /// `nextSequenceRecv` has not moved past it.
    pub fn verify_unreceived<Ctx>(
        &self,
        ctx: &Ctx,
        packet: &Packet,
        next_seq_recv_on_b: Sequence,
        height: Height,
        proof: &CommitmentProofBytes,
    ) -> Result<(), ContextError>
    where
        Ctx: ValidationContext,
    {
        let (path, value) = match self.ordering() {
            Order::Ordered => {
                if packet.seq_on_a < next_seq_recv_on_b {
                    return Err(PacketError::PacketAlreadyReceived(packet.seq_on_a).into());
                }
                let path = SeqRecvPath::new(&packet.port_id_on_b, &packet.chan_id_on_b);
                (Path::SeqRecv(path), Some(next_seq_recv_on_b.to_vec()))
            }
            Order::Unordered => {
                let path =
                    ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
                (Path::Receipt(path), None)
            }
        };
        self.verify_peer_entry(ctx, packet.seq_on_a, path, value, height, proof)
    }

    /// Stores a state change of an existing end.
    pub fn store_state<Ctx>(&self, ctx: &mut Ctx, state: State) -> Result<(), ContextError>
    where
        Ctx: ExecutionContext,
    {
        let mut end = self.end.clone();
        end.set_state(state);
        ctx.store_channel(&self.path(), end)
    }
}

/// Stores a freshly opened end with its three sequences at 1, bumps the
/// channel counter, and hands the new channel's capability to `owner`.
pub(crate) fn store_new_channel<Ctx>(
    ctx: &mut Ctx,
    route: &ChannelRoute,
    owner: &ModuleId,
    module: &mut dyn Module,
) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    let (port_id, chan_id) = (&route.port_id, &route.chan_id);
    ctx.store_channel(&route.path(), route.end.clone())?;
    ctx.increase_channel_counter()?;

    ctx.store_next_sequence_send(&SeqSendPath::new(port_id, chan_id), 1.into())?;
    ctx.store_next_sequence_recv(&SeqRecvPath::new(port_id, chan_id), 1.into())?;
    ctx.store_next_sequence_ack(&SeqAckPath::new(port_id, chan_id), 1.into())?;

    let capability = ctx.claim_channel_capability(port_id.clone(), chan_id.clone(), owner.clone())?;
    module.on_channel_capability(capability);
    Ok(())
}

/// Logs `summary`, then emits each core event behind a channel message
/// event, then whatever the module asked to emit and log.
pub(crate) fn record<Ctx>(
    ctx: &mut Ctx,
    summary: String,
    events: impl IntoIterator<Item = IbcEvent>,
    extras: ModuleExtras,
) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    ctx.log_message(summary)?;
    for event in events {
        ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Channel))?;
        ctx.emit_ibc_event(event)?;
    }

    let ModuleExtras { events, log } = extras;
    for event in events {
        ctx.emit_ibc_event(IbcEvent::Module(event))?;
    }
    for line in log {
        ctx.log_message(line)?;
    }
    Ok(())
}
