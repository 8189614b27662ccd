//! Defines the misbehaviour type for the header-chain light client

use interlink_core_client::types::error::ClientError;
use interlink_core_host::types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec};

use crate::types::error::HeaderChainError;
use crate::types::Header;

pub const HEADERCHAIN_MISBEHAVIOUR_TYPE_URL: &str =
    "/interlink.lightclients.headerchain.v1.Misbehaviour";

/// Two headers that could not both have been produced by an honest chain:
/// conflicting headers at one height, or headers whose timestamps run
/// backwards.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Misbehaviour {
    client_id: ClientId,
    header1: Header,
    header2: Header,
}

impl Misbehaviour {
    pub fn new(client_id: ClientId, header1: Header, header2: Header) -> Self {
        Self {
            client_id,
            header1,
            header2,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn header1(&self) -> &Header {
        &self.header1
    }

    pub fn header2(&self) -> &Header {
        &self.header2
    }

    pub fn validate_basic(&self) -> Result<(), HeaderChainError> {
        let chain_id = &self.header1.signed_header.header.chain_id;
        self.header1.validate_basic(chain_id)?;
        self.header2.validate_basic(chain_id).map_err(|e| match e {
            HeaderChainError::MismatchedHeaderChainIds { expected, actual } => {
                HeaderChainError::MisbehaviourChainIdMismatch(expected, actual)
            }
            e => e,
        })?;

        if self.header1.height() < self.header2.height() {
            return Err(HeaderChainError::MisbehaviourHeightsOutOfOrder(
                self.header1.height(),
                self.header2.height(),
            ));
        }

        Ok(())
    }
}

impl AnyCodec for Misbehaviour {
    const TYPE_URL: &'static str = HEADERCHAIN_MISBEHAVIOUR_TYPE_URL;
}

impl TryFrom<Any> for Misbehaviour {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        Ok(Self::from_any(&raw)?)
    }
}

impl From<Misbehaviour> for Any {
    fn from(misbehaviour: Misbehaviour) -> Self {
        misbehaviour.to_any()
    }
}
