//! Contains the implementation of the header-chain `ClientState` domain type.

use core::cmp::max;
use core::time::Duration;

use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_core_host::types::identifiers::ChainId;
use interlink_primitives::prelude::*;
use interlink_primitives::utils::borsh_duration;
use interlink_primitives::{Any, AnyCodec, ZERO_DURATION};

use crate::types::error::HeaderChainError;
use crate::types::{Header, TrustThreshold};

pub const HEADERCHAIN_CLIENT_STATE_TYPE_URL: &str =
    "/interlink.lightclients.headerchain.v1.ClientState";

/// Defines data structure for header-chain client state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ClientState {
    pub chain_id: ChainId,
    pub trust_level: TrustThreshold,
    #[borsh(
        serialize_with = "borsh_duration::serialize",
        deserialize_with = "borsh_duration::deserialize"
    )]
    pub trusting_period: Duration,
    #[borsh(
        serialize_with = "borsh_duration::serialize",
        deserialize_with = "borsh_duration::deserialize"
    )]
    pub unbonding_period: Duration,
    #[borsh(
        serialize_with = "borsh_duration::serialize",
        deserialize_with = "borsh_duration::deserialize"
    )]
    pub max_clock_drift: Duration,
    pub latest_height: Height,
    /// Store prefix under which the counterparty commits upgraded states.
    /// Empty when the counterparty never upgrades.
    pub upgrade_path: String,
    pub frozen_height: Option<Height>,
}

impl ClientState {
    /// Constructs a new `ClientState` by given parameters and checks
    /// if the parameters are valid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: ChainId,
        trust_level: TrustThreshold,
        trusting_period: Duration,
        unbonding_period: Duration,
        max_clock_drift: Duration,
        latest_height: Height,
        upgrade_path: String,
    ) -> Result<Self, HeaderChainError> {
        let client_state = Self {
            chain_id,
            trust_level,
            trusting_period,
            unbonding_period,
            max_clock_drift,
            latest_height,
            upgrade_path,
            // New valid client must not be frozen.
            frozen_height: None,
        };
        client_state.validate()?;
        Ok(client_state)
    }

    pub fn with_header(self, header: &Header) -> Self {
        Self {
            latest_height: max(header.height(), self.latest_height),
            ..self
        }
    }

    pub fn with_frozen_height(self, h: Height) -> Self {
        Self {
            frozen_height: Some(h),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), HeaderChainError> {
        self.trust_level.validate()?;

        if self.trusting_period == ZERO_DURATION || self.trusting_period >= self.unbonding_period
        {
            return Err(HeaderChainError::InvalidTrustingPeriod {
                trusting_period: self.trusting_period,
                unbonding_period: self.unbonding_period,
            });
        }

        if self.max_clock_drift == ZERO_DURATION {
            return Err(HeaderChainError::InvalidMaxClockDrift);
        }

        if self.latest_height.revision_number() != self.chain_id.revision_number() {
            return Err(HeaderChainError::MismatchedRevisionNumber {
                height: self.latest_height,
                revision_number: self.chain_id.revision_number(),
            });
        }

        Ok(())
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_height.is_some()
    }

    /// A consensus state `elapsed` old is no longer trusted.
    pub fn expired(&self, elapsed: Duration) -> bool {
        elapsed > self.trusting_period
    }

    /// The state after the counterparty upgraded to `committed`: chain
    /// parameters come from the committed state, the trust settings stay.
    pub fn upgraded_to(&self, committed: Self) -> Result<Self, HeaderChainError> {
        Self::new(
            committed.chain_id,
            self.trust_level,
            self.trusting_period,
            committed.unbonding_period,
            self.max_clock_drift,
            committed.latest_height,
            committed.upgrade_path,
        )
    }
}

impl AnyCodec for ClientState {
    const TYPE_URL: &'static str = HEADERCHAIN_CLIENT_STATE_TYPE_URL;
}

impl TryFrom<Any> for ClientState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        if raw.type_url != HEADERCHAIN_CLIENT_STATE_TYPE_URL {
            return Err(ClientError::InvalidClientStateType(raw.type_url));
        }
        Ok(Self::decode_vec(&raw.value)?)
    }
}

impl From<ClientState> for Any {
    fn from(client_state: ClientState) -> Self {
        client_state.to_any()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn params() -> ClientState {
        ClientState {
            chain_id: ChainId::new("chainB-1").unwrap(),
            trust_level: TrustThreshold::ONE_THIRD,
            trusting_period: Duration::from_secs(100),
            unbonding_period: Duration::from_secs(200),
            max_clock_drift: Duration::from_secs(5),
            latest_height: Height::new(1, 10).unwrap(),
            upgrade_path: "upgrade".to_string(),
            frozen_height: None,
        }
    }

    #[rstest]
    #[case::valid(params(), true)]
    #[case::zero_trusting_period(ClientState { trusting_period: ZERO_DURATION, ..params() }, false)]
    #[case::trusting_not_below_unbonding(ClientState { trusting_period: Duration::from_secs(200), ..params() }, false)]
    #[case::zero_clock_drift(ClientState { max_clock_drift: ZERO_DURATION, ..params() }, false)]
    #[case::revision_mismatch(ClientState { latest_height: Height::new(0, 10).unwrap(), ..params() }, false)]
    fn test_client_state_validation(#[case] client_state: ClientState, #[case] valid: bool) {
        assert_eq!(client_state.validate().is_ok(), valid);
    }

    #[test]
    fn test_any_conversion_checks_type_url() {
        let any: Any = params().into();
        assert_eq!(ClientState::try_from(any.clone()).unwrap(), params());

        let wrong = Any::new("/interlink.lightclients.solo.v1.ClientState", any.value);
        assert!(matches!(
            ClientState::try_from(wrong),
            Err(ClientError::InvalidClientStateType(_))
        ));
    }

    #[test]
    fn test_frozen_client_state_decodes() {
        let frozen = params().with_frozen_height(Height::min(0));
        let any: Any = frozen.clone().into();
        assert_eq!(ClientState::try_from(any).unwrap(), frozen);
        assert!(frozen.is_frozen());
    }
}
