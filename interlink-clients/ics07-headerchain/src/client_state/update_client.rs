use interlink_core_client::context::{Convertible, ExtClientValidationContext};
use interlink_core_client::types::error::ClientError;
use interlink_core_host::types::identifiers::ClientId;
use interlink_core_host::types::path::ClientConsensusStatePath;
use interlink_primitives::prelude::*;
use interlink_primitives::Timestamp;

use crate::types::error::HeaderChainError;
use crate::types::{ClientState, ConsensusState, Header, TrustThreshold};

/// Verifies a header against the consensus state the client trusts at the
/// header's `trusted_height`.
pub fn verify_header<V>(
    client_state: &ClientState,
    ctx: &V,
    client_id: &ClientId,
    header: &Header,
) -> Result<(), ClientError>
where
    V: ExtClientValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    // Checks that the header fields are valid.
    header
        .validate_basic(client_state.chain_id())
        .map_err(HeaderChainError::into_header_error)?;

    let trusted_consensus_state: ConsensusState = {
        let trusted_client_cons_state_path = ClientConsensusStatePath::new(
            client_id.clone(),
            header.trusted_height.revision_number(),
            header.trusted_height.revision_height(),
        );
        ctx.consensus_state(&trusted_client_cons_state_path)?
            .try_into()
            .map_err(Into::into)?
    };

    let now = ctx.host_timestamp()?;

    verify_header_against_trusted(client_state, header, &trusted_consensus_state, now)
        .map_err(HeaderChainError::into_header_error)
}

/// The checks of a header against a trusted consensus state, shared by
/// header updates and misbehaviour evidence.
pub(crate) fn verify_header_against_trusted(
    client_state: &ClientState,
    header: &Header,
    trusted: &ConsensusState,
    now: Timestamp,
) -> Result<(), HeaderChainError> {
    // ensure correctness of the trusted next validator set provided by the relayer
    header.check_trusted_next_validator_set(&trusted.next_validators_hash)?;

    // ensure trusted consensus state is within trusting period
    if let Some(elapsed) = now.duration_since(&trusted.timestamp) {
        if client_state.expired(elapsed) {
            return Err(HeaderChainError::TrustedStateExpired {
                trusted_time: trusted.timestamp,
                trusting_period: client_state.trusting_period,
            });
        }
    }

    let header_time = header.timestamp();
    if header_time <= trusted.timestamp {
        return Err(HeaderChainError::NonIncreasingTimestamp {
            header_time,
            trusted_time: trusted.timestamp,
        });
    }

    let drift_limit = (now + client_state.max_clock_drift).unwrap_or(now);
    if header_time > drift_limit {
        return Err(HeaderChainError::HeaderFromFuture {
            header_time,
            host_time: now,
        });
    }

    let sign_bytes = header.signed_header.header.sign_bytes();
    let commit = &header.signed_header.commit;

    // the header's own validator set must have signed it
    header
        .validator_set
        .verify_commit(&sign_bytes, commit, TrustThreshold::TWO_THIRDS)?;

    if header.is_adjacent() {
        // sequential verification: the trusted block committed to this set
        if header.signed_header.header.validators_hash != trusted.next_validators_hash {
            return Err(HeaderChainError::MismatchedAdjacentValidatorsHash);
        }
    } else {
        // skipping verification: enough of the trusted set signed too
        header.trusted_next_validator_set.verify_commit(
            &sign_bytes,
            commit,
            client_state.trust_level,
        )?;
    }

    Ok(())
}

/// Checks for misbehaviour upon receiving a new consensus state as part
/// of a client update.
pub fn check_for_misbehaviour_on_update<V>(
    client_state: &ClientState,
    ctx: &V,
    client_id: &ClientId,
    header: &Header,
) -> Result<bool, ClientError>
where
    V: ExtClientValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    let maybe_existing_consensus_state = {
        let path_at_header_height = ClientConsensusStatePath::new(
            client_id.clone(),
            header.height().revision_number(),
            header.height().revision_height(),
        );

        ctx.consensus_state(&path_at_header_height).ok()
    };

    match maybe_existing_consensus_state {
        Some(existing_consensus_state) => {
            let existing_consensus_state: ConsensusState =
                existing_consensus_state.try_into().map_err(Into::into)?;

            let header_consensus_state = ConsensusState::from(header.clone());

            // There is evidence of misbehaviour if the stored consensus state
            // is different from the new one we received.
            Ok(existing_consensus_state != header_consensus_state)
        }
        None => {
            // If no header was previously installed, we ensure the
            // monotonicity of timestamps.

            // 1. for all headers, the new header needs to have a larger
            //    timestamp than the "previous header"
            if let Some(prev_cs) = ctx.prev_consensus_state(client_id, &header.height())? {
                let prev_cs: ConsensusState = prev_cs.try_into().map_err(Into::into)?;

                if header.timestamp() <= prev_cs.timestamp {
                    return Ok(true);
                }
            }

            // 2. if a header comes in and is not the "last" header, then we
            //    also ensure that its timestamp is less than the "next header"
            if header.height() < client_state.latest_height {
                if let Some(next_cs) = ctx.next_consensus_state(client_id, &header.height())? {
                    let next_cs: ConsensusState = next_cs.try_into().map_err(Into::into)?;

                    if header.timestamp() >= next_cs.timestamp {
                        return Ok(true);
                    }
                }
            }

            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use ed25519_dalek::{Signer, SigningKey};
    use interlink_core_client::types::Height;
    use interlink_core_commitment_types::commitment::CommitmentRoot;
    use interlink_core_host::types::identifiers::ChainId;
    use rstest::rstest;

    use super::*;
    use crate::types::{BlockHeader, CommitSignature, SignedHeader, Validator, ValidatorSet};

    const START: u64 = 1_700_000_000;

    fn signer(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn validator_set(seeds: &[u8]) -> ValidatorSet {
        ValidatorSet::new(
            seeds
                .iter()
                .map(|s| Validator::new(signer(*s).verifying_key().to_bytes(), 10))
                .collect(),
        )
    }

    fn at(secs: u64) -> Timestamp {
        Timestamp::from_unix_timestamp(START + secs, 0).unwrap()
    }

    fn client_state() -> ClientState {
        ClientState::new(
            ChainId::new("chainB-1").unwrap(),
            TrustThreshold::ONE_THIRD,
            Duration::from_secs(100),
            Duration::from_secs(200),
            Duration::from_secs(5),
            Height::new(1, 5).unwrap(),
            String::new(),
        )
        .unwrap()
    }

    fn trusted(seeds: &[u8]) -> ConsensusState {
        ConsensusState::new(
            CommitmentRoot::from_bytes(b"root-5"),
            at(0),
            validator_set(seeds).hash(),
        )
    }

    /// A header at `height` signed by `signers` out of `seeds`, trusting height 5.
    fn header(height: u64, secs: u64, seeds: &[u8], signers: &[u8], trusted_seeds: &[u8]) -> Header {
        let validator_set = validator_set(seeds);
        let block = BlockHeader {
            chain_id: ChainId::new("chainB-1").unwrap(),
            height: Height::new(1, height).unwrap(),
            timestamp: at(secs),
            app_hash: CommitmentRoot::from_bytes(b"root"),
            validators_hash: validator_set.hash(),
            next_validators_hash: validator_set.hash(),
        };
        let sign_bytes = block.sign_bytes();
        let commit = signers
            .iter()
            .map(|s| CommitSignature {
                pub_key: signer(*s).verifying_key().to_bytes(),
                signature: signer(*s).sign(&sign_bytes).to_bytes().to_vec(),
            })
            .collect();
        Header {
            signed_header: SignedHeader {
                header: block,
                commit,
            },
            validator_set,
            trusted_height: Height::new(1, 5).unwrap(),
            trusted_next_validator_set: self::validator_set(trusted_seeds),
        }
    }

    #[test]
    fn test_adjacent_header_verifies() {
        let header = header(6, 10, &[1, 2, 3], &[1, 2, 3], &[1, 2, 3]);
        verify_header_against_trusted(&client_state(), &header, &trusted(&[1, 2, 3]), at(20))
            .unwrap();
    }

    #[test]
    fn test_adjacent_header_with_rotated_set_is_rejected() {
        let header = header(6, 10, &[4, 5, 6], &[4, 5, 6], &[1, 2, 3]);
        assert!(matches!(
            verify_header_against_trusted(&client_state(), &header, &trusted(&[1, 2, 3]), at(20)),
            Err(HeaderChainError::MismatchedAdjacentValidatorsHash)
        ));
    }

    #[rstest]
    // two of three trusted validators carry over into the new set
    #[case(&[1, 2, 4], &[1, 2, 4], true)]
    // none of the trusted validators signed
    #[case(&[4, 5, 6], &[4, 5, 6], false)]
    // the new set signed, but only a third of the trusted power is present
    #[case(&[1, 4, 5], &[1, 4, 5], false)]
    fn test_skipping_header_needs_trusted_power(
        #[case] seeds: &[u8],
        #[case] signers: &[u8],
        #[case] accepted: bool,
    ) {
        let header = header(9, 10, seeds, signers, &[1, 2, 3]);
        let result =
            verify_header_against_trusted(&client_state(), &header, &trusted(&[1, 2, 3]), at(20));
        assert_eq!(result.is_ok(), accepted);
    }

    #[rstest]
    #[case::not_after_trusted(0, 20)]
    #[case::beyond_clock_drift(30, 20)]
    #[case::trusted_state_expired(110, 120)]
    fn test_header_timing_is_checked(#[case] header_secs: u64, #[case] now_secs: u64) {
        let header = header(6, header_secs, &[1, 2, 3], &[1, 2, 3], &[1, 2, 3]);
        assert!(verify_header_against_trusted(
            &client_state(),
            &header,
            &trusted(&[1, 2, 3]),
            at(now_secs)
        )
        .is_err());
    }

    #[test]
    fn test_wrong_trusted_validator_set_is_rejected() {
        let header = header(9, 10, &[1, 2, 3], &[1, 2, 3], &[7, 8, 9]);
        assert!(matches!(
            verify_header_against_trusted(&client_state(), &header, &trusted(&[1, 2, 3]), at(20)),
            Err(HeaderChainError::MismatchedTrustedValidatorsHash)
        ));
    }

    #[test]
    fn test_conflicting_headers_are_misbehaviour() {
        let header_a = header(9, 10, &[1, 2, 3], &[1, 2, 3], &[1, 2, 3]);
        let mut header_b = header_a.clone();
        header_b.signed_header.header.app_hash = CommitmentRoot::from_bytes(b"forged");

        assert!(super::super::check_for_misbehaviour_on_misbehaviour(
            &header_a, &header_b
        ));
        assert!(!super::super::check_for_misbehaviour_on_misbehaviour(
            &header_a, &header_a
        ));

        let later_but_older = header(10, 5, &[1, 2, 3], &[1, 2, 3], &[1, 2, 3]);
        assert!(super::super::check_for_misbehaviour_on_misbehaviour(
            &later_but_older,
            &header_a
        ));
    }
}
