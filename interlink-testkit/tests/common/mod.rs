use interlink_core::host::types::identifiers::ChainId;
use interlink_testkit::context::MockContext;
use interlink_testkit::hosts::HostParams;
use interlink_testkit::relayer::RelayerContext;

pub fn chain(chain_id: &str) -> MockContext {
    let params = HostParams::builder()
        .chain_id(ChainId::new(chain_id).expect("valid chain id"))
        .build();
    MockContext::new(&params)
}

/// Two fresh chains, `chaina-0` and `chainb-0`, at height 5 and agreeing on
/// the time.
pub fn two_chains() -> RelayerContext {
    RelayerContext::new(chain("chaina-0"), chain("chainb-0"))
}
