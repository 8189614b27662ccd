use interlink_core_client::context::{Convertible, ExtClientValidationContext};
use interlink_core_client::types::error::ClientError;
use interlink_core_host::types::identifiers::ClientId;
use interlink_core_host::types::path::ClientConsensusStatePath;
use interlink_primitives::prelude::*;

use super::update_client::verify_header_against_trusted;
use crate::types::error::HeaderChainError;
use crate::types::{ClientState, ConsensusState, Header, Misbehaviour};

/// Determines whether or not two conflicting headers would each have
/// convinced the light client.
pub fn verify_misbehaviour<V>(
    client_state: &ClientState,
    ctx: &V,
    client_id: &ClientId,
    misbehaviour: &Misbehaviour,
) -> Result<(), ClientError>
where
    V: ExtClientValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    misbehaviour
        .validate_basic()
        .map_err(HeaderChainError::into_misbehaviour_error)?;

    let chain_id = &misbehaviour.header1().signed_header.header.chain_id;
    if chain_id != client_state.chain_id() {
        return Err(HeaderChainError::MisbehaviourChainIdMismatch(
            client_state.chain_id().to_string(),
            chain_id.to_string(),
        )
        .into_misbehaviour_error());
    }

    let now = ctx.host_timestamp()?;

    for header in [misbehaviour.header1(), misbehaviour.header2()] {
        let trusted_consensus_state: ConsensusState = {
            let consensus_state_path = ClientConsensusStatePath::new(
                client_id.clone(),
                header.trusted_height.revision_number(),
                header.trusted_height.revision_height(),
            );
            ctx.consensus_state(&consensus_state_path)?
                .try_into()
                .map_err(Into::into)?
        };

        verify_header_against_trusted(client_state, header, &trusted_consensus_state, now)
            .map_err(HeaderChainError::into_misbehaviour_error)?;
    }

    Ok(())
}

pub fn check_for_misbehaviour_on_misbehaviour(header_1: &Header, header_2: &Header) -> bool {
    if header_1.height() == header_2.height() {
        // when the heights are equal, there is only evidence of misbehaviour
        // if the headers differ; the same header submitted twice proves
        // nothing
        header_1.signed_header.header.hash() != header_2.signed_header.header.hash()
    } else {
        // header_1 is at a greater height than header_2, so its time must
        // not exceed header_2's time for this to violate monotonic time
        header_1.timestamp() <= header_2.timestamp()
    }
}
