mod common;

use core::time::Duration;

use interlink_core::channel::handler::send_packet::send_packet_validate;
use interlink_core::channel::types::channel::{Order, State};
use interlink_core::channel::types::error::CapabilityError;
use interlink_core::channel::types::packet::Packet;
use interlink_core::handler::types::error::ContextError;
use interlink_core::host::types::identifiers::ChannelId;
use interlink_core::router::types::module::ModuleId;
use interlink_testkit::context::MockContext;
use interlink_testkit::fixtures::core::signer::dummy_account_id;
use interlink_testkit::relayer::context::ChannelLink;
use interlink_testkit::relayer::{utils, RelayerContext, RelayerError};
use interlink_testkit::testapp::ibc::applications::mock::{mock_module_id, mock_port_id, MockModule};
use test_log::test;

use common::two_chains;

fn linked() -> (RelayerContext, ChannelLink) {
    let mut relayer = two_chains();
    let link = relayer
        .link_mock_channel(Order::Unordered, Duration::ZERO, dummy_account_id())
        .expect("channel opens");
    (relayer, link)
}

/// Binds the `mock` port of `ctx` to a freshly registered module that never
/// received a capability.
fn hand_port_to_intruder(ctx: &mut MockContext) -> MockModule {
    let intruder = MockModule::new();
    let intruder_id = ModuleId::new("intruder".to_string());

    ctx.ibc_router
        .add_route(intruder_id.clone(), intruder.clone())
        .expect("new module id");
    ctx.ibc_router.scope_port_to_module(mock_port_id(), intruder_id);

    intruder
}

fn capability_error(result: Result<impl core::fmt::Debug, RelayerError>) -> CapabilityError {
    match result {
        Err(RelayerError::TransactionFailed(ContextError::CapabilityError(e))) => e,
        other => panic!("expected a capability error, got {other:?}"),
    }
}

#[test]
fn test_only_the_owner_closes_a_channel() {
    let (mut relayer, link) = linked();
    let signer = dummy_account_id();

    let intruder = hand_port_to_intruder(relayer.get_ctx_a_mut());

    let result = utils::channel_close_init_on_a(
        relayer.get_ctx_a_mut(),
        &link.chan_id_on_a,
        &link.port_id_on_a,
        signer.clone(),
    );
    assert_eq!(
        capability_error(result),
        CapabilityError::Unauthorized {
            port_id: link.port_id_on_a.clone(),
            channel_id: link.chan_id_on_a.clone(),
        }
    );
    assert!(intruder.state().closed.is_empty());

    let chan_end_on_a =
        utils::channel_end(relayer.get_ctx_a(), &link.port_id_on_a, &link.chan_id_on_a).unwrap();
    assert_eq!(chan_end_on_a.state(), &State::Open);

    // handing the port back restores the rightful owner
    relayer
        .get_ctx_a_mut()
        .ibc_router
        .scope_port_to_module(mock_port_id(), mock_module_id());
    relayer.close_channel_on_a(&link, signer).unwrap();

    let module = relayer.get_ctx_a().module.clone();
    assert_eq!(
        module.state().closed,
        vec![(link.port_id_on_a.clone(), link.chan_id_on_a.clone())]
    );
}

#[test]
fn test_packets_are_not_delivered_to_a_foreign_module() {
    let (mut relayer, link) = linked();
    let signer = dummy_account_id();

    let packet = relayer
        .get_ctx_b_mut()
        .send_mock_packet(&link.chan_id_on_b, b"hello".to_vec())
        .unwrap();

    let intruder = hand_port_to_intruder(relayer.get_ctx_a_mut());

    let result = relayer.relay_packet_on_b(&link, packet, signer);
    assert!(matches!(
        capability_error(result),
        CapabilityError::Unauthorized { .. }
    ));
    assert!(intruder.state().received.is_empty());
    assert!(relayer.get_ctx_a().module.state().received.is_empty());
}

#[test]
fn test_sending_requires_a_capability() {
    let (mut relayer, _link) = linked();

    let result = relayer
        .get_ctx_a_mut()
        .send_mock_packet(&ChannelId::new(7), b"hello".to_vec());
    assert!(matches!(
        result,
        Err(RelayerError::MissingCapability { channel_id, .. }) if channel_id == ChannelId::new(7)
    ));
}

#[test]
fn test_capability_covers_a_single_channel() {
    let (mut relayer, link) = linked();

    let ctx_a = relayer.get_ctx_a_mut();
    let packet = ctx_a
        .send_mock_packet(&link.chan_id_on_a, b"hello".to_vec())
        .unwrap();

    // the same packet, rerouted to a channel the capability was not minted for
    let rerouted = Packet {
        chan_id_on_a: ChannelId::new(1),
        ..packet
    };

    let state = ctx_a.module.state();
    let capability = state
        .capabilities
        .get(&(link.port_id_on_a.clone(), link.chan_id_on_a.clone()))
        .unwrap();

    let result = send_packet_validate(&ctx_a.ibc_store, capability, &rerouted);
    assert!(matches!(
        result,
        Err(ContextError::CapabilityError(CapabilityError::Unauthorized { channel_id, .. }))
            if channel_id == ChannelId::new(1)
    ));
}
