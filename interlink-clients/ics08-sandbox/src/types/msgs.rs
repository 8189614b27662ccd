//! Defines the messages the host sends to a sandbox program.
//!
//! Every message is JSON with byte fields encoded as base64. Payloads that
//! the program decodes itself (client messages and upgraded states) are the
//! program's own opaque `data` bytes, never the host's wrappers.

use interlink_core_client::types::Height;
use interlink_primitives::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::serializer::Base64;
use crate::types::Bytes;

/// Sent once, when the client is created. The program writes the initial
/// client and consensus states into the client store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct InstantiateMsg {
    #[serde(with = "Base64")]
    pub client_state: Bytes,
    #[serde(with = "Base64")]
    pub consensus_state: Bytes,
    #[serde(with = "Base64")]
    pub checksum: Bytes,
    pub latest_height: Height,
}

/// Requests that may write to the client store. The two verification
/// requests run against a store whose writes are discarded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum SudoMsg {
    UpdateState(UpdateStateMsg),
    UpdateStateOnMisbehaviour(UpdateStateOnMisbehaviourMsg),
    VerifyMembership(VerifyMembershipMsg),
    VerifyNonMembership(VerifyNonMembershipMsg),
    VerifyUpgradeAndUpdateState(VerifyUpgradeAndUpdateStateMsg),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct UpdateStateMsg {
    #[serde(with = "Base64")]
    pub client_message: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct UpdateStateOnMisbehaviourMsg {
    #[serde(with = "Base64")]
    pub client_message: Bytes,
}

/// The delay period is enforced by the host before the program sees the
/// request, so it is not part of the message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct VerifyMembershipMsg {
    pub height: Height,
    #[serde(with = "Base64")]
    pub prefix: Bytes,
    #[serde(with = "Base64")]
    pub proof: Bytes,
    #[serde(with = "Base64")]
    pub path: Bytes,
    #[serde(with = "Base64")]
    pub value: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct VerifyNonMembershipMsg {
    pub height: Height,
    #[serde(with = "Base64")]
    pub prefix: Bytes,
    #[serde(with = "Base64")]
    pub proof: Bytes,
    #[serde(with = "Base64")]
    pub path: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct VerifyUpgradeAndUpdateStateMsg {
    #[serde(with = "Base64")]
    pub upgrade_client_state: Bytes,
    #[serde(with = "Base64")]
    pub upgrade_consensus_state: Bytes,
    #[serde(with = "Base64")]
    pub proof_upgrade_client: Bytes,
    #[serde(with = "Base64")]
    pub proof_upgrade_consensus_state: Bytes,
}

/// Read-only requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum QueryMsg {
    Status(StatusMsg),
    TimestampAtHeight(TimestampAtHeightMsg),
    VerifyClientMessage(VerifyClientMessageMsg),
    CheckForMisbehaviour(CheckForMisbehaviourMsg),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct StatusMsg {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct TimestampAtHeightMsg {
    pub height: Height,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct VerifyClientMessageMsg {
    #[serde(with = "Base64")]
    pub client_message: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct CheckForMisbehaviourMsg {
    #[serde(with = "Base64")]
    pub client_message: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sudo_msg_is_externally_tagged() {
        let msg = SudoMsg::from(UpdateStateMsg {
            client_message: b"hdr".to_vec(),
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"update_state":{"client_message":"aGRy"}}"#);
        assert_eq!(serde_json::from_str::<SudoMsg>(&json).unwrap(), msg);
    }

    #[test]
    fn test_query_msg_carries_height() {
        let msg = QueryMsg::from(TimestampAtHeightMsg {
            height: Height::new(2, 7).unwrap(),
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"timestamp_at_height":{"height":{"revision_number":2,"revision_height":7}}}"#
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let json = r#"{"status":{"verbose":true}}"#;
        assert!(serde_json::from_str::<QueryMsg>(json).is_err());
    }
}
