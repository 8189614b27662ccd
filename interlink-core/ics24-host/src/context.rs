use core::time::Duration;

use interlink_core_channel_types::capability::{CapabilityRegistry, ChannelCapability};
use interlink_core_channel_types::channel::ChannelEnd;
use interlink_core_channel_types::commitment::{AcknowledgementCommitment, PacketCommitment};
use interlink_core_channel_types::packet::Receipt;
use interlink_core_client_context::prelude::*;
use interlink_core_client_types::Height;
use interlink_core_commitment_types::commitment::CommitmentPrefix;
use interlink_core_connection_types::version::{pick_version, Version as ConnectionVersion};
use interlink_core_connection_types::ConnectionEnd;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host_types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use interlink_core_host_types::path::{
    AckPath, ChannelEndPath, ClientConnectionPath, CommitmentPath, ConnectionPath, ReceiptPath,
    SeqAckPath, SeqRecvPath, SeqSendPath,
};
use interlink_core_router_types::module::ModuleId;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, Signer, Timestamp};

use crate::utils::calculate_block_delay;

/// Read access to the host store, used while a message is validated.
///
/// Nothing reachable from here may change state: a message that fails
/// validation must leave the host exactly as it found it.
pub trait ValidationContext {
    type V: ClientValidationContext;
    /// How counterparties describe this host in their own client.
    type HostClientState: ClientStateValidation<Self::V>;
    /// A consensus state this host produced, in the form counterparties
    /// store it.
    type HostConsensusState: ConsensusState + Into<Any>;

    fn get_client_validation_context(&self) -> &Self::V;

    // Host chain

    fn host_height(&self) -> Result<Height, ContextError>;

    fn host_timestamp(&self) -> Result<Timestamp, ContextError>;

    /// Consensus state of this host at a past `height`. Handshakes compare
    /// it against what the counterparty claims to have recorded.
    fn host_consensus_state(
        &self,
        height: &Height,
    ) -> Result<Self::HostConsensusState, ContextError>;

    /// Rejects a client of this host, as kept by a counterparty, that
    /// names another chain or a height this host has not produced.
    fn validate_self_client(
        &self,
        client_state_of_host_on_counterparty: Self::HostClientState,
    ) -> Result<(), ContextError>;

    fn commitment_prefix(&self) -> CommitmentPrefix;

    fn max_expected_time_per_block(&self) -> Duration;

    /// Blocks that must pass for `delay_period_time` to elapse.
    fn block_delay(&self, delay_period_time: &Duration) -> u64 {
        calculate_block_delay(delay_period_time, &self.max_expected_time_per_block())
    }

    fn validate_message_signer(&self, signer: &Signer) -> Result<(), ContextError>;

    // Identifier counters. Each only moves through its `increase_*`
    // counterpart on `ExecutionContext`.

    fn client_counter(&self) -> Result<u64, ContextError>;

    fn connection_counter(&self) -> Result<u64, ContextError>;

    fn channel_counter(&self) -> Result<u64, ContextError>;

    // Connections

    fn connection_end(&self, conn_id: &ConnectionId) -> Result<ConnectionEnd, ContextError>;

    /// Versions this host is willing to negotiate, most preferred first.
    fn get_compatible_versions(&self) -> Vec<ConnectionVersion> {
        ConnectionVersion::compatibles()
    }

    /// Settles on one of the versions a counterparty offered.
    fn pick_version(
        &self,
        counterparty_candidate_versions: &[ConnectionVersion],
    ) -> Result<ConnectionVersion, ContextError> {
        Ok(pick_version(
            &self.get_compatible_versions(),
            counterparty_candidate_versions,
        )?)
    }

    // Channels and packets

    fn channel_end(&self, channel_end_path: &ChannelEndPath) -> Result<ChannelEnd, ContextError>;

    fn get_next_sequence_send(&self, seq_send_path: &SeqSendPath)
        -> Result<Sequence, ContextError>;

    fn get_next_sequence_recv(&self, seq_recv_path: &SeqRecvPath)
        -> Result<Sequence, ContextError>;

    fn get_next_sequence_ack(&self, seq_ack_path: &SeqAckPath) -> Result<Sequence, ContextError>;

    fn get_packet_commitment(
        &self,
        commitment_path: &CommitmentPath,
    ) -> Result<PacketCommitment, ContextError>;

    fn get_packet_receipt(&self, receipt_path: &ReceiptPath) -> Result<Receipt, ContextError>;

    fn get_packet_acknowledgement(
        &self,
        ack_path: &AckPath,
    ) -> Result<AcknowledgementCommitment, ContextError>;

    // Capabilities

    fn capability_registry(&self) -> &CapabilityRegistry;

    /// Fails unless `module_id` holds the capability of the channel.
    fn verify_channel_owner(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        module_id: &ModuleId,
    ) -> Result<(), ContextError> {
        self.capability_registry()
            .verify_owner(port_id, channel_id, module_id)?;
        Ok(())
    }

    /// Fails unless this host's registry minted `capability`.
    fn authenticate_capability(&self, capability: &ChannelCapability) -> Result<(), ContextError> {
        self.capability_registry().authenticate(capability)?;
        Ok(())
    }
}

/// Write access to the host store, used once a message validated.
///
/// Writes are expected to succeed; a failure here is a host fault rather
/// than a rejected message.
pub trait ExecutionContext: ValidationContext {
    type E: ClientExecutionContext;

    fn get_client_execution_context(&mut self) -> &mut Self::E;

    fn increase_client_counter(&mut self) -> Result<(), ContextError>;

    fn increase_connection_counter(&mut self) -> Result<(), ContextError>;

    fn increase_channel_counter(&mut self) -> Result<(), ContextError>;

    // Connections

    fn store_connection(
        &mut self,
        connection_path: &ConnectionPath,
        connection_end: ConnectionEnd,
    ) -> Result<(), ContextError>;

    /// Indexes `conn_id` under the client it was opened on.
    fn store_connection_to_client(
        &mut self,
        client_connection_path: &ClientConnectionPath,
        conn_id: ConnectionId,
    ) -> Result<(), ContextError>;

    // Channels and packets

    fn store_channel(
        &mut self,
        channel_end_path: &ChannelEndPath,
        channel_end: ChannelEnd,
    ) -> Result<(), ContextError>;

    fn store_next_sequence_send(
        &mut self,
        seq_send_path: &SeqSendPath,
        seq: Sequence,
    ) -> Result<(), ContextError>;

    fn store_next_sequence_recv(
        &mut self,
        seq_recv_path: &SeqRecvPath,
        seq: Sequence,
    ) -> Result<(), ContextError>;

    fn store_next_sequence_ack(
        &mut self,
        seq_ack_path: &SeqAckPath,
        seq: Sequence,
    ) -> Result<(), ContextError>;

    fn store_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), ContextError>;

    fn delete_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
    ) -> Result<(), ContextError>;

    fn store_packet_receipt(
        &mut self,
        receipt_path: &ReceiptPath,
        receipt: Receipt,
    ) -> Result<(), ContextError>;

    fn store_packet_acknowledgement(
        &mut self,
        ack_path: &AckPath,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), ContextError>;

    fn delete_packet_acknowledgement(&mut self, ack_path: &AckPath) -> Result<(), ContextError>;

    // Capabilities

    fn capability_registry_mut(&mut self) -> &mut CapabilityRegistry;

    /// Binds a freshly opened channel to `owner`. A channel is claimed at
    /// most once.
    fn claim_channel_capability(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        owner: ModuleId,
    ) -> Result<ChannelCapability, ContextError> {
        Ok(self
            .capability_registry_mut()
            .claim(port_id, channel_id, owner)?)
    }

    // Output

    fn emit_ibc_event(&mut self, event: IbcEvent) -> Result<(), ContextError>;

    fn log_message(&mut self, message: String) -> Result<(), ContextError>;
}

/// Client state as read through the host's client context.
pub type ClientStateRef<Ctx> =
    <<Ctx as ValidationContext>::V as ClientValidationContext>::ClientStateRef;

/// Client state as written through the host's client context.
pub type ClientStateMut<Ctx> =
    <<Ctx as ExecutionContext>::E as ClientExecutionContext>::ClientStateMut;
