//! Delay period enforcement for proofs verified against a client.

use core::time::Duration;

use interlink_core_client_types::error::ClientError;
use interlink_core_client_types::Height;
use interlink_core_host_types::identifiers::ClientId;
use interlink_primitives::ZERO_DURATION;

use crate::context::ClientValidationContext;

/// Minimum time and number of host blocks that must pass between the
/// processing of a consensus state and its use for proof verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayPeriod {
    pub time: Duration,
    pub blocks: u64,
}

impl DelayPeriod {
    pub fn new(time: Duration, blocks: u64) -> Self {
        Self { time, blocks }
    }

    pub fn none() -> Self {
        Self::new(ZERO_DURATION, 0)
    }

    pub fn is_none(&self) -> bool {
        self.time == ZERO_DURATION && self.blocks == 0
    }
}

/// Succeeds once both the time and the block delay have elapsed since the
/// consensus state at `height` was recorded by the host.
pub fn verify_delay_passed<V>(
    ctx: &V,
    client_id: &ClientId,
    height: Height,
    delay: &DelayPeriod,
) -> Result<(), ClientError>
where
    V: ClientValidationContext,
{
    let (processed_time, processed_height) = ctx.client_update_meta(client_id, &height)?;
    if delay.is_none() {
        return Ok(());
    }

    let current_time = ctx.host_timestamp()?;
    let current_height = ctx.host_height()?;

    let earliest_time = (processed_time + delay.time)?;
    let earliest_height = processed_height.add(delay.blocks);

    if current_time < earliest_time || current_height < earliest_height {
        tracing::debug!(
            %client_id,
            %height,
            %earliest_time,
            %earliest_height,
            "proof submitted before the delay period elapsed"
        );
        return Err(ClientError::DelayPeriodNotElapsed {
            earliest_time,
            earliest_height,
        });
    }

    Ok(())
}
