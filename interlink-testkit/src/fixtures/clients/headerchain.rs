use core::time::Duration;

use interlink_clients::headerchain::types::TrustThreshold;
use interlink_core::primitives::prelude::*;

use crate::hosts::DEFAULT_UPGRADE_PATH;

/// The parameters a header-chain client of a mock host is created with.
#[derive(typed_builder::TypedBuilder, Clone, Debug)]
pub struct ClientStateConfig {
    #[builder(default = TrustThreshold::ONE_THIRD)]
    pub trust_level: TrustThreshold,
    #[builder(default = Duration::from_secs(64000))]
    pub trusting_period: Duration,
    #[builder(default = Duration::from_secs(128_000))]
    pub unbonding_period: Duration,
    #[builder(default = Duration::from_millis(3000))]
    pub max_clock_drift: Duration,
    #[builder(default = DEFAULT_UPGRADE_PATH.to_string())]
    pub upgrade_path: String,
}

impl Default for ClientStateConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
