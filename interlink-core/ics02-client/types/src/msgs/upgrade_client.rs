//! Definition of domain type msg `MsgUpgradeClient`.

use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_host_types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec, Signer};

pub const UPGRADE_CLIENT_TYPE_URL: &str = "/interlink.core.client.v1.MsgUpgradeClient";

/// A type of message that triggers the upgrade of an on-chain client.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgUpgradeClient {
    // client unique identifier
    pub client_id: ClientId,
    // Upgraded client state
    pub upgraded_client_state: Any,
    // Upgraded consensus state, only contains enough information
    // to serve as a basis of trust in update logic
    pub upgraded_consensus_state: Any,
    // proof that old chain committed to new client
    pub proof_upgrade_client: CommitmentProofBytes,
    // proof that old chain committed to new consensus state
    pub proof_upgrade_consensus_state: CommitmentProofBytes,
    // signer address
    pub signer: Signer,
}

impl AnyCodec for MsgUpgradeClient {
    const TYPE_URL: &'static str = UPGRADE_CLIENT_TYPE_URL;
}

#[cfg(test)]
mod tests {
    use interlink_core_host_types::identifiers::ClientId;
    use interlink_primitives::prelude::*;
    use interlink_primitives::{Any, AnyCodec, DecodingError, Signer};

    use super::MsgUpgradeClient;
    use crate::msgs::MsgUpdateClient;

    fn msg() -> MsgUpgradeClient {
        MsgUpgradeClient {
            client_id: ClientId::new("07-headerchain", 0).unwrap(),
            upgraded_client_state: Any::new("/cs", vec![1]),
            upgraded_consensus_state: Any::new("/cons", vec![2]),
            proof_upgrade_client: vec![3].try_into().unwrap(),
            proof_upgrade_consensus_state: vec![4].try_into().unwrap(),
            signer: Signer::new("relayer"),
        }
    }

    #[test]
    fn test_upgrade_msg_travels_in_any() {
        let any = msg().to_any();
        assert_eq!(MsgUpgradeClient::from_any(&any).unwrap(), msg());
        assert!(matches!(
            MsgUpdateClient::from_any(&any),
            Err(DecodingError::MismatchedTypeUrls { .. })
        ));
    }
}
