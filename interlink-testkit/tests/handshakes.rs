mod common;

use core::time::Duration;

use interlink_core::channel::types::channel::Order;
use interlink_core::channel::types::error::ChannelError;
use interlink_core::channel::types::msgs::{ChannelMsg, MsgChannelOpenInit};
use interlink_core::channel::types::Version as ChannelVersion;
use interlink_core::connection::types::error::ConnectionError;
use interlink_core::connection::types::version::Version as ConnectionVersion;
use interlink_core::connection::types::State as ConnectionState;
use interlink_core::handler::types::error::ContextError;
use interlink_core::handler::types::msgs::MsgEnvelope;
use interlink_core::host::types::identifiers::{ChannelId, ConnectionId};
use interlink_core::host::ValidationContext;
use interlink_testkit::fixtures::core::signer::dummy_account_id;
use interlink_testkit::relayer::{utils, RelayerError};
use interlink_testkit::testapp::ibc::applications::mock::mock_port_id;
use test_log::test;

use common::two_chains;

#[test]
fn test_conn_open_try_without_a_common_version() {
    let mut relayer = two_chains();
    let signer = dummy_account_id();

    let client_id_on_a = relayer.create_client_on_a(signer.clone()).unwrap();
    let client_id_on_b = relayer.create_client_on_b(signer.clone()).unwrap();

    let (ctx_a, ctx_b) = relayer.split_mut();
    let conn_id_on_a = utils::connection_open_init_on_a(
        ctx_a,
        ctx_b,
        &client_id_on_a,
        &client_id_on_b,
        Duration::ZERO,
        signer.clone(),
    )
    .unwrap();

    let unknown = ConnectionVersion::new("2".to_string(), vec!["ORDER_ORDERED".to_string()])
        .unwrap();
    let result = utils::connection_open_try_on_b_offering(
        ctx_b,
        ctx_a,
        &conn_id_on_a,
        &client_id_on_a,
        &client_id_on_b,
        vec![unknown],
        signer,
    );

    assert!(matches!(
        result,
        Err(RelayerError::TransactionFailed(ContextError::ConnectionError(
            ConnectionError::NoCommonVersion
        )))
    ));

    // `B` allocated no connection, while `A` still waits in INIT
    assert!(ctx_b
        .ibc_store
        .connection_end(&ConnectionId::new(0))
        .is_err());
    assert_eq!(
        ctx_a.ibc_store.connection_end(&conn_id_on_a).unwrap().state(),
        &ConnectionState::Init
    );
}

#[test]
fn test_chan_open_init_with_a_version_the_module_refuses() {
    let mut relayer = two_chains();
    let signer = dummy_account_id();

    let client_id_on_a = relayer.create_client_on_a(signer.clone()).unwrap();
    let client_id_on_b = relayer.create_client_on_b(signer.clone()).unwrap();
    let (conn_id_on_a, _) = relayer
        .create_connection_on_a(&client_id_on_a, &client_id_on_b, Duration::ZERO, signer.clone())
        .unwrap();

    let port_id = mock_port_id();
    let proposed = ChannelVersion::new("unsupported-1".to_string());
    let msg = MsgEnvelope::Channel(ChannelMsg::OpenInit(MsgChannelOpenInit {
        port_id_on_a: port_id.clone(),
        connection_hops_on_a: vec![conn_id_on_a],
        port_id_on_b: port_id.clone(),
        ordering: Order::Unordered,
        signer,
        version_proposal: proposed.clone(),
    }));

    let result = relayer.get_ctx_a_mut().deliver(msg);
    match result {
        Err(RelayerError::TransactionFailed(ContextError::ChannelError(
            ChannelError::VersionNegotiationFailed { proposed: version },
        ))) => assert_eq!(version, proposed),
        other => panic!("expected a failed version negotiation, got {other:?}"),
    }

    assert!(utils::channel_end(relayer.get_ctx_a(), &port_id, &ChannelId::new(0)).is_err());
    assert!(relayer.get_ctx_a().module.state().capabilities.is_empty());
}
