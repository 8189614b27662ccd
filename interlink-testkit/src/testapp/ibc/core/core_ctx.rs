//! Implementation of the host contexts on the mock store. Every value a
//! counterparty may prove lives in the provable store, encoded the way the
//! handlers verify it.

use core::time::Duration;

use interlink_clients::headerchain::types::{
    ClientState as HostClientState, ConsensusState as HostConsensusState,
};
use interlink_core::channel::types::capability::CapabilityRegistry;
use interlink_core::channel::types::channel::ChannelEnd;
use interlink_core::channel::types::commitment::{AcknowledgementCommitment, PacketCommitment};
use interlink_core::channel::types::error::{ChannelError, PacketError};
use interlink_core::channel::types::packet::Receipt;
use interlink_core::client::context::client_state::ClientStateCommon;
use interlink_core::client::types::error::ClientError;
use interlink_core::client::types::Height;
use interlink_core::commitment_types::commitment::CommitmentPrefix;
use interlink_core::connection::types::error::ConnectionError;
use interlink_core::connection::types::version::Version as ConnectionVersion;
use interlink_core::connection::types::ConnectionEnd;
use interlink_core::handler::types::error::ContextError;
use interlink_core::handler::types::events::IbcEvent;
use interlink_core::host::types::identifiers::{ConnectionId, Sequence};
use interlink_core::host::types::path::{
    AckPath, ChannelEndPath, ClientConnectionPath, CommitmentPath, ConnectionPath, Path,
    ReceiptPath, SeqAckPath, SeqRecvPath, SeqSendPath,
};
use interlink_core::host::{ExecutionContext, ValidationContext};
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::{encode_to_vec, Signer, Timestamp};

use super::types::{decode, MockIbcStore};

fn decode_sequence(bytes: &[u8]) -> Option<Sequence> {
    <[u8; 8]>::try_from(bytes)
        .ok()
        .map(u64::from_be_bytes)
        .map(Sequence::from)
}

impl MockIbcStore {
    fn sequence_at(&self, path: Path) -> Option<Sequence> {
        self.get_path(&path).and_then(decode_sequence)
    }
}

impl ValidationContext for MockIbcStore {
    type V = Self;
    type HostClientState = HostClientState;
    type HostConsensusState = HostConsensusState;

    fn get_client_validation_context(&self) -> &Self::V {
        self
    }

    fn host_height(&self) -> Result<Height, ContextError> {
        Ok(self.pending_height())
    }

    fn host_timestamp(&self) -> Result<Timestamp, ContextError> {
        self.pending_timestamp()
    }

    fn host_consensus_state(&self, height: &Height) -> Result<HostConsensusState, ContextError> {
        self.host_consensus_states
            .get(height)
            .cloned()
            .ok_or_else(|| ClientError::MissingLocalConsensusState(*height).into())
    }

    fn client_counter(&self) -> Result<u64, ContextError> {
        Ok(self.client_counter)
    }

    fn connection_end(&self, conn_id: &ConnectionId) -> Result<ConnectionEnd, ContextError> {
        match self.get_path(&Path::Connection(ConnectionPath::new(conn_id))) {
            Some(bytes) => decode(bytes),
            None => Err(ConnectionError::ConnectionNotFound {
                connection_id: conn_id.clone(),
            }
            .into()),
        }
    }

    fn validate_self_client(
        &self,
        client_state_of_host_on_counterparty: HostClientState,
    ) -> Result<(), ContextError> {
        let invalid = |description: String| -> ContextError {
            ConnectionError::InvalidSelfClientState { description }.into()
        };

        if client_state_of_host_on_counterparty.is_frozen() {
            return Err(invalid("client is frozen".to_string()));
        }

        if client_state_of_host_on_counterparty.chain_id() != &self.chain_id {
            return Err(invalid(format!(
                "client tracks chain {}, expected {}",
                client_state_of_host_on_counterparty.chain_id(),
                self.chain_id
            )));
        }

        let latest_height = client_state_of_host_on_counterparty.latest_height();
        let self_revision_number = self.chain_id.revision_number();
        if latest_height.revision_number() != self_revision_number {
            return Err(invalid(format!(
                "client is not in the same revision as the chain. expected: {self_revision_number}, got: {}",
                latest_height.revision_number()
            )));
        }

        let host_current_height = self.pending_height();
        if latest_height >= host_current_height {
            return Err(invalid(format!(
                "client has latest height {latest_height} greater than or equal to chain height {host_current_height}"
            )));
        }

        Ok(())
    }

    fn commitment_prefix(&self) -> CommitmentPrefix {
        self.commitment_prefix.clone()
    }

    fn connection_counter(&self) -> Result<u64, ContextError> {
        Ok(self.connection_counter)
    }

    fn get_compatible_versions(&self) -> Vec<ConnectionVersion> {
        self.connection_versions.clone()
    }

    fn channel_end(&self, channel_end_path: &ChannelEndPath) -> Result<ChannelEnd, ContextError> {
        match self.get_path(&Path::ChannelEnd(channel_end_path.clone())) {
            Some(bytes) => decode(bytes),
            None => Err(ChannelError::NonexistentChannel {
                port_id: channel_end_path.0.clone(),
                channel_id: channel_end_path.1.clone(),
            }
            .into()),
        }
    }

    fn get_next_sequence_send(
        &self,
        seq_send_path: &SeqSendPath,
    ) -> Result<Sequence, ContextError> {
        self.sequence_at(Path::SeqSend(seq_send_path.clone()))
            .ok_or_else(|| {
                PacketError::MissingNextSendSeq {
                    port_id: seq_send_path.0.clone(),
                    channel_id: seq_send_path.1.clone(),
                }
                .into()
            })
    }

    fn get_next_sequence_recv(
        &self,
        seq_recv_path: &SeqRecvPath,
    ) -> Result<Sequence, ContextError> {
        self.sequence_at(Path::SeqRecv(seq_recv_path.clone()))
            .ok_or_else(|| {
                PacketError::MissingNextRecvSeq {
                    port_id: seq_recv_path.0.clone(),
                    channel_id: seq_recv_path.1.clone(),
                }
                .into()
            })
    }

    fn get_next_sequence_ack(&self, seq_ack_path: &SeqAckPath) -> Result<Sequence, ContextError> {
        self.sequence_at(Path::SeqAck(seq_ack_path.clone()))
            .ok_or_else(|| {
                PacketError::MissingNextAckSeq {
                    port_id: seq_ack_path.0.clone(),
                    channel_id: seq_ack_path.1.clone(),
                }
                .into()
            })
    }

    fn get_packet_commitment(
        &self,
        commitment_path: &CommitmentPath,
    ) -> Result<PacketCommitment, ContextError> {
        self.get_path(&Path::Commitment(commitment_path.clone()))
            .map(|bytes| PacketCommitment::from(bytes.to_vec()))
            .ok_or_else(|| PacketError::PacketCommitmentNotFound(commitment_path.sequence).into())
    }

    fn get_packet_receipt(&self, receipt_path: &ReceiptPath) -> Result<Receipt, ContextError> {
        self.get_path(&Path::Receipt(receipt_path.clone()))
            .map(|_| Receipt::Ok)
            .ok_or_else(|| PacketError::PacketReceiptNotFound(receipt_path.sequence).into())
    }

    fn get_packet_acknowledgement(
        &self,
        ack_path: &AckPath,
    ) -> Result<AcknowledgementCommitment, ContextError> {
        self.get_path(&Path::Ack(ack_path.clone()))
            .map(|bytes| AcknowledgementCommitment::from(bytes.to_vec()))
            .ok_or_else(|| PacketError::PacketAcknowledgementNotFound(ack_path.sequence).into())
    }

    fn channel_counter(&self) -> Result<u64, ContextError> {
        Ok(self.channel_counter)
    }

    fn max_expected_time_per_block(&self) -> Duration {
        self.max_expected_time_per_block
    }

    fn validate_message_signer(&self, _signer: &Signer) -> Result<(), ContextError> {
        Ok(())
    }

    fn capability_registry(&self) -> &CapabilityRegistry {
        &self.capabilities
    }
}

impl ExecutionContext for MockIbcStore {
    type E = Self;

    fn get_client_execution_context(&mut self) -> &mut Self::E {
        self
    }

    fn increase_client_counter(&mut self) -> Result<(), ContextError> {
        self.client_counter = self
            .client_counter
            .checked_add(1)
            .ok_or_else(|| ClientError::Other {
                description: "client counter overflow".to_string(),
            })?;
        Ok(())
    }

    fn store_connection(
        &mut self,
        connection_path: &ConnectionPath,
        connection_end: ConnectionEnd,
    ) -> Result<(), ContextError> {
        self.set_path(
            &Path::Connection(connection_path.clone()),
            encode_to_vec(&connection_end),
        );
        Ok(())
    }

    fn store_connection_to_client(
        &mut self,
        client_connection_path: &ClientConnectionPath,
        conn_id: ConnectionId,
    ) -> Result<(), ContextError> {
        self.set_path(
            &Path::ClientConnection(client_connection_path.clone()),
            conn_id.as_bytes().to_vec(),
        );
        Ok(())
    }

    fn increase_connection_counter(&mut self) -> Result<(), ContextError> {
        self.connection_counter = self
            .connection_counter
            .checked_add(1)
            .ok_or(ConnectionError::CounterOverflow)?;
        Ok(())
    }

    fn store_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), ContextError> {
        self.set_path(
            &Path::Commitment(commitment_path.clone()),
            commitment.into_vec(),
        );
        Ok(())
    }

    fn delete_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
    ) -> Result<(), ContextError> {
        self.delete_path(&Path::Commitment(commitment_path.clone()));
        Ok(())
    }

    fn store_packet_receipt(
        &mut self,
        receipt_path: &ReceiptPath,
        receipt: Receipt,
    ) -> Result<(), ContextError> {
        self.set_path(
            &Path::Receipt(receipt_path.clone()),
            receipt.as_bytes().to_vec(),
        );
        Ok(())
    }

    fn store_packet_acknowledgement(
        &mut self,
        ack_path: &AckPath,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), ContextError> {
        self.set_path(&Path::Ack(ack_path.clone()), ack_commitment.into_vec());
        Ok(())
    }

    fn delete_packet_acknowledgement(&mut self, ack_path: &AckPath) -> Result<(), ContextError> {
        self.delete_path(&Path::Ack(ack_path.clone()));
        Ok(())
    }

    fn store_channel(
        &mut self,
        channel_end_path: &ChannelEndPath,
        channel_end: ChannelEnd,
    ) -> Result<(), ContextError> {
        self.set_path(
            &Path::ChannelEnd(channel_end_path.clone()),
            encode_to_vec(&channel_end),
        );
        Ok(())
    }

    fn store_next_sequence_send(
        &mut self,
        seq_send_path: &SeqSendPath,
        seq: Sequence,
    ) -> Result<(), ContextError> {
        self.set_path(&Path::SeqSend(seq_send_path.clone()), seq.to_vec());
        Ok(())
    }

    fn store_next_sequence_recv(
        &mut self,
        seq_recv_path: &SeqRecvPath,
        seq: Sequence,
    ) -> Result<(), ContextError> {
        self.set_path(&Path::SeqRecv(seq_recv_path.clone()), seq.to_vec());
        Ok(())
    }

    fn store_next_sequence_ack(
        &mut self,
        seq_ack_path: &SeqAckPath,
        seq: Sequence,
    ) -> Result<(), ContextError> {
        self.set_path(&Path::SeqAck(seq_ack_path.clone()), seq.to_vec());
        Ok(())
    }

    fn increase_channel_counter(&mut self) -> Result<(), ContextError> {
        self.channel_counter = self
            .channel_counter
            .checked_add(1)
            .ok_or(ChannelError::CounterOverflow)?;
        Ok(())
    }

    fn capability_registry_mut(&mut self) -> &mut CapabilityRegistry {
        &mut self.capabilities
    }

    fn emit_ibc_event(&mut self, event: IbcEvent) -> Result<(), ContextError> {
        self.events.push(event);
        Ok(())
    }

    fn log_message(&mut self, message: String) -> Result<(), ContextError> {
        tracing::debug!(chain_id = %self.chain_id, "{message}");
        self.logs.push(message);
        Ok(())
    }
}
