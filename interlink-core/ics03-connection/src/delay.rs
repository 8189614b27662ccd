use interlink_core_client::context::delay::DelayPeriod;
use interlink_core_connection_types::ConnectionEnd;
use interlink_core_host::ValidationContext;

/// The delay period that proofs submitted over `connection_end` must
/// respect: the connection's time delay, and the number of host blocks
/// expected to be produced in that time.
pub fn conn_delay_period<Ctx>(ctx: &Ctx, connection_end: &ConnectionEnd) -> DelayPeriod
where
    Ctx: ValidationContext,
{
    let time = connection_end.delay_period();
    DelayPeriod::new(time, ctx.block_delay(&time))
}
