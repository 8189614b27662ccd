//! Defines the solo misbehaviour type

use interlink_core_client::types::error::ClientError;
use interlink_core_host::types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec, Timestamp};

use crate::types::error::SoloError;

pub const SOLO_MISBEHAVIOUR_TYPE_URL: &str = "/interlink.lightclients.solo.v1.Misbehaviour";

/// One signature of the solo key together with what it signed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct SignatureAndData {
    pub signature: Vec<u8>,
    pub path: Vec<u8>,
    pub data: Vec<u8>,
    pub timestamp: Timestamp,
}

/// Two signatures by the solo key over different data at one sequence.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Misbehaviour {
    pub client_id: ClientId,
    pub sequence: u64,
    pub signature_one: SignatureAndData,
    pub signature_two: SignatureAndData,
}

impl Misbehaviour {
    pub fn validate_basic(&self) -> Result<(), SoloError> {
        if self.sequence == 0 {
            return Err(SoloError::ZeroSequence);
        }
        if self.signature_one.signature.is_empty() || self.signature_two.signature.is_empty() {
            return Err(SoloError::EmptySignature);
        }
        if self.signature_one.path == self.signature_two.path
            && self.signature_one.data == self.signature_two.data
        {
            return Err(SoloError::IdenticalSignatureData);
        }
        Ok(())
    }
}

impl AnyCodec for Misbehaviour {
    const TYPE_URL: &'static str = SOLO_MISBEHAVIOUR_TYPE_URL;
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
