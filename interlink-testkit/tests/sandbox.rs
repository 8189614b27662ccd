mod common;

use core::time::Duration;
use std::sync::Arc;

use interlink_core::client::context::prelude::*;
use interlink_core::client::types::msgs::{ClientMsg, MsgUpdateClient, MsgUpgradeClient};
use interlink_core::client::types::Status;
use interlink_core::commitment_types::commitment::CommitmentRoot;
use interlink_core::connection::types::State as ConnectionState;
use interlink_core::handler::types::error::ContextError;
use interlink_core::handler::types::msgs::MsgEnvelope;
use interlink_core::host::ValidationContext;
use interlink_core::primitives::Any;
use interlink_testkit::context::MockContext;
use interlink_testkit::fixtures::clients::headerchain::ClientStateConfig;
use interlink_testkit::fixtures::core::signer::dummy_account_id;
use interlink_testkit::hosts::DEFAULT_UPGRADE_PATH;
use interlink_testkit::relayer::{utils, RelayerError};
use interlink_testkit::testapp::ibc::sandbox::{
    MockClientData, MockConsensusData, MockHeader, MockSandboxProgram, MOCK_PROGRAM_CHECKSUM,
};
use test_log::test;

use common::chain;

/// `A` runs the mock program and holds a sandbox client of `B`.
fn sandboxed_chains() -> (MockContext, MockContext, Arc<MockSandboxProgram>) {
    let mut ctx_a = chain("chaina-0");
    let ctx_b = chain("chainb-0");

    let program = Arc::new(MockSandboxProgram::new());
    ctx_a.register_sandbox_program(MOCK_PROGRAM_CHECKSUM, program.clone());

    (ctx_a, ctx_b, program)
}

#[test]
fn test_sandbox_client_lifecycle() {
    let (mut ctx_a, mut ctx_b, program) = sandboxed_chains();
    let signer = dummy_account_id();

    let client_id_on_a =
        utils::create_sandbox_client_on_a(&mut ctx_a, &ctx_b, MOCK_PROGRAM_CHECKSUM, signer.clone())
            .unwrap();
    assert_eq!(ctx_a.client_status(&client_id_on_a).unwrap(), Status::Active);
    assert_eq!(program.calls().first().map(String::as_str), Some("instantiate"));

    ctx_b.advance_block();
    utils::update_client_on_a_with_sync(&mut ctx_a, &ctx_b, &client_id_on_a, signer).unwrap();

    let client_state = ctx_a.client_state(&client_id_on_a).unwrap();
    assert_eq!(client_state.latest_height(), ctx_b.latest_height());

    let calls = program.calls();
    for call in [
        "query:verify_client_message",
        "query:check_for_misbehaviour",
        "sudo:update_state",
    ] {
        assert!(calls.iter().any(|c| c == call), "missing call {call}");
    }
}

#[test]
fn test_rejected_update_leaves_the_client_untouched() {
    let (mut ctx_a, mut ctx_b, program) = sandboxed_chains();
    let signer = dummy_account_id();

    let client_id_on_a =
        utils::create_sandbox_client_on_a(&mut ctx_a, &ctx_b, MOCK_PROGRAM_CHECKSUM, signer.clone())
            .unwrap();
    let created_at = ctx_a.client_state(&client_id_on_a).unwrap().latest_height();

    program.omit_updated_heights();
    ctx_b.advance_block();

    let result = utils::update_client_on_a_with_sync(&mut ctx_a, &ctx_b, &client_id_on_a, signer);
    assert!(matches!(
        result,
        Err(RelayerError::TransactionFailed(ContextError::ClientError(_)))
    ));
    assert!(program.calls().iter().any(|c| c == "sudo:update_state"));

    // the program wrote a consensus state and a client state before failing
    assert_eq!(
        ctx_a.client_state(&client_id_on_a).unwrap().latest_height(),
        created_at
    );
    assert_eq!(
        ctx_a.ibc_store.consensus_state_heights(&client_id_on_a).unwrap(),
        vec![created_at]
    );
}

#[test]
fn test_unregistered_program_is_rejected() {
    let mut ctx_a = chain("chaina-0");
    let ctx_b = chain("chainb-0");

    let result =
        utils::create_sandbox_client_on_a(&mut ctx_a, &ctx_b, b"unknown-program", dummy_account_id());
    assert!(result.is_err());
}

#[test]
fn test_conflicting_header_freezes_sandbox_client() {
    let (mut ctx_a, ctx_b, program) = sandboxed_chains();
    let signer = dummy_account_id();

    let client_id_on_a =
        utils::create_sandbox_client_on_a(&mut ctx_a, &ctx_b, MOCK_PROGRAM_CHECKSUM, signer.clone())
            .unwrap();

    let trusted = ctx_b.sandbox_header(&ctx_b.latest_height()).unwrap();
    let forged = MockHeader {
        root: CommitmentRoot::from(b"forged".to_vec()),
        ..trusted
    };

    ctx_a
        .deliver(MsgEnvelope::Client(ClientMsg::UpdateClient(MsgUpdateClient {
            client_id: client_id_on_a.clone(),
            client_message: forged.into_client_message().into(),
            signer,
        })))
        .unwrap();

    assert_eq!(ctx_a.client_status(&client_id_on_a).unwrap(), Status::Frozen);
    assert!(program
        .calls()
        .iter()
        .any(|c| c == "sudo:update_state_on_misbehaviour"));
}

#[test]
fn test_connection_proofs_verified_by_the_program() {
    let (mut ctx_a, mut ctx_b, program) = sandboxed_chains();
    let signer = dummy_account_id();

    let client_id_on_a =
        utils::create_sandbox_client_on_a(&mut ctx_a, &ctx_b, MOCK_PROGRAM_CHECKSUM, signer.clone())
            .unwrap();
    let client_id_on_b = utils::create_headerchain_client_on_a(
        &mut ctx_b,
        &ctx_a,
        &ClientStateConfig::default(),
        signer.clone(),
    )
    .unwrap();

    // `B` opens the connection and `A` answers through its sandbox client
    let conn_id_on_b = utils::connection_open_init_on_a(
        &mut ctx_b,
        &ctx_a,
        &client_id_on_b,
        &client_id_on_a,
        Duration::ZERO,
        signer.clone(),
    )
    .unwrap();

    utils::update_client_on_a_with_sync(&mut ctx_a, &ctx_b, &client_id_on_a, signer.clone())
        .unwrap();

    let conn_id_on_a = utils::connection_open_try_on_b(
        &mut ctx_a,
        &ctx_b,
        &conn_id_on_b,
        &client_id_on_b,
        &client_id_on_a,
        signer,
    )
    .unwrap();

    let conn_end_on_a = ctx_a.ibc_store.connection_end(&conn_id_on_a).unwrap();
    assert_eq!(conn_end_on_a.state(), &ConnectionState::TryOpen);
    assert_eq!(conn_end_on_a.client_id(), &client_id_on_a);

    // the connection end, the client state and the consensus state
    let memberships = program
        .calls()
        .iter()
        .filter(|c| *c == "sudo:verify_membership")
        .count();
    assert_eq!(memberships, 3);
}

#[test]
fn test_sandbox_client_upgrade() {
    let (mut ctx_a, mut ctx_b, program) = sandboxed_chains();
    let signer = dummy_account_id();

    let client_id_on_a =
        utils::create_sandbox_client_on_a(&mut ctx_a, &ctx_b, MOCK_PROGRAM_CHECKSUM, signer.clone())
            .unwrap();

    let plan_height = ctx_b.latest_height().increment();
    let upgraded_height = plan_height.add(10);

    let upgraded_client_state: Any = MockClientData::new(upgraded_height, DEFAULT_UPGRADE_PATH)
        .into_client_state(MOCK_PROGRAM_CHECKSUM)
        .into();
    let upgraded_header = ctx_b.sandbox_header(&ctx_b.latest_height()).unwrap();
    let upgraded_consensus_state: Any = MockConsensusData::from(&upgraded_header)
        .into_consensus_state()
        .into();

    ctx_b.schedule_upgrade(
        plan_height,
        upgraded_client_state.clone(),
        upgraded_consensus_state.clone(),
    );
    ctx_b.advance_block();
    assert_eq!(ctx_b.latest_height(), plan_height);

    utils::update_client_on_a_with_sync(&mut ctx_a, &ctx_b, &client_id_on_a, signer.clone())
        .unwrap();

    let (proof_upgrade_client, proof_upgrade_consensus_state) =
        ctx_b.upgrade_proofs(plan_height, plan_height).unwrap();

    ctx_a
        .deliver(MsgEnvelope::Client(ClientMsg::UpgradeClient(MsgUpgradeClient {
            client_id: client_id_on_a.clone(),
            upgraded_client_state,
            upgraded_consensus_state,
            proof_upgrade_client,
            proof_upgrade_consensus_state,
            signer,
        })))
        .unwrap();

    assert_eq!(
        ctx_a.client_state(&client_id_on_a).unwrap().latest_height(),
        upgraded_height
    );
    assert!(program
        .calls()
        .iter()
        .any(|c| c == "sudo:verify_upgrade_and_update_state"));
}
