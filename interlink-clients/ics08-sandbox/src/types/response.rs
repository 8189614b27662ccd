//! Defines the responses a sandbox program returns.

use interlink_core_client::types::Height;
use interlink_primitives::prelude::*;
use serde::{Deserialize, Serialize};

/// The response to [`super::msgs::QueryMsg::Status`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StatusResponse {
    pub status: String,
}

/// The response to [`super::msgs::QueryMsg::TimestampAtHeight`], in
/// nanoseconds since the Unix epoch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimestampAtHeightResponse {
    pub timestamp: u64,
}

/// The response to [`super::msgs::QueryMsg::VerifyClientMessage`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifyClientMessageResponse {
    pub is_valid: bool,
}

/// The response to [`super::msgs::QueryMsg::CheckForMisbehaviour`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckForMisbehaviourResponse {
    pub found_misbehaviour: bool,
}

/// The response to every [`super::msgs::SudoMsg`] and to instantiation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SudoResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heights: Option<Vec<Height>>,
}

impl SudoResponse {
    pub fn success() -> Self {
        Self { heights: None }
    }

    pub fn heights(mut self, heights: Vec<Height>) -> Self {
        self.heights = Some(heights);
        self
    }
}
