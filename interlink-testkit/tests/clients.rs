mod common;

use core::time::Duration;

use interlink_clients::headerchain::types::Misbehaviour as HeaderChainMisbehaviour;
use interlink_clients::solo::types::ClientState as SoloClientState;
use interlink_clients::AnyClientState;
use interlink_core::client::context::prelude::*;
use interlink_core::client::types::error::ClientError;
use interlink_core::client::types::msgs::{
    ClientMsg, MsgCreateClient, MsgSubmitMisbehaviour, MsgUpdateClient, MsgUpgradeClient,
};
use interlink_core::client::types::{Height, Status};
use interlink_core::commitment_types::commitment::CommitmentRoot;
use interlink_core::entrypoint::dispatch_any;
use interlink_core::handler::types::error::ContextError;
use interlink_core::handler::types::events::IbcEvent;
use interlink_core::handler::types::msgs::MsgEnvelope;
use interlink_core::host::types::identifiers::ClientId;
use interlink_core::primitives::{Any, AnyCodec};
use interlink_core::router::types::error::RouterError;
use interlink_testkit::context::MockContext;
use interlink_testkit::fixtures::clients::headerchain::ClientStateConfig;
use interlink_testkit::fixtures::clients::solo::SoloSigner;
use interlink_testkit::fixtures::core::signer::dummy_account_id;
use interlink_testkit::relayer::{utils, RelayerError};
use test_log::test;

use common::{chain, two_chains};

fn client_error(result: Result<(), RelayerError>) -> ClientError {
    match result {
        Err(RelayerError::TransactionFailed(ContextError::ClientError(e))) => e,
        other => panic!("expected a client error, got {other:?}"),
    }
}

fn update_msg(client_id: &ClientId, client_message: Any) -> MsgEnvelope {
    MsgEnvelope::Client(ClientMsg::UpdateClient(MsgUpdateClient {
        client_id: client_id.clone(),
        client_message,
        signer: dummy_account_id(),
    }))
}

fn misbehaviour_msg(client_id: &ClientId, misbehaviour: Any) -> MsgEnvelope {
    MsgEnvelope::Client(ClientMsg::Misbehaviour(MsgSubmitMisbehaviour {
        client_id: client_id.clone(),
        misbehaviour,
        signer: dummy_account_id(),
    }))
}

#[test]
fn test_raw_datagram_is_decoded_and_dispatched() {
    let mut ctx_a = chain("chaina-0");
    let ctx_b = chain("chainb-0");

    let (client_state, consensus_state) = ctx_b.headerchain_client(&ClientStateConfig::default());
    let msg = MsgCreateClient::new(
        client_state.into(),
        consensus_state.into(),
        dummy_account_id(),
    );

    dispatch_any(&mut ctx_a.ibc_store, &mut ctx_a.ibc_router, msg.to_any()).unwrap();
    let client_id = ctx_a
        .last_event(|event| match event {
            IbcEvent::CreateClient(e) => Some(e.client_id().clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(ctx_a.client_status(&client_id).unwrap(), Status::Active);

    let unknown = Any::new("/interlink.unknown.Msg", vec![1, 2, 3]);
    assert!(matches!(
        dispatch_any(&mut ctx_a.ibc_store, &mut ctx_a.ibc_router, unknown),
        Err(ContextError::RouterError(RouterError::UnknownMessageTypeUrl { .. }))
    ));
}

#[test]
fn test_client_expires_after_trusting_period() {
    let mut relayer = two_chains();
    let (ctx_a, ctx_b) = relayer.split_mut();
    let signer = dummy_account_id();

    let config = ClientStateConfig::builder()
        .trusting_period(Duration::from_secs(60))
        .unbonding_period(Duration::from_secs(120))
        .build();
    let client_id_on_a =
        utils::create_headerchain_client_on_a(ctx_a, ctx_b, &config, signer.clone()).unwrap();
    assert_eq!(ctx_a.client_status(&client_id_on_a).unwrap(), Status::Active);

    ctx_a.advance_block_by(Duration::from_secs(61));
    assert_eq!(ctx_a.client_status(&client_id_on_a).unwrap(), Status::Expired);

    ctx_b.advance_block();
    let error = client_error(utils::update_client_on_a(
        ctx_a,
        ctx_b,
        &client_id_on_a,
        signer,
    ));
    assert!(matches!(
        error,
        ClientError::ClientNotActive {
            status: Status::Expired
        }
    ));
}

#[test]
fn test_expired_consensus_states_are_pruned_on_update() {
    let mut relayer = two_chains();
    let (ctx_a, ctx_b) = relayer.split_mut();
    let signer = dummy_account_id();

    let config = ClientStateConfig::builder()
        .trusting_period(Duration::from_secs(60))
        .unbonding_period(Duration::from_secs(120))
        .build();
    let client_id_on_a =
        utils::create_headerchain_client_on_a(ctx_a, ctx_b, &config, signer.clone()).unwrap();
    let created_at = ctx_b.latest_height();

    let mut updated_at = Vec::new();
    for _ in 0..2 {
        ctx_b.advance_block_by(Duration::from_secs(40));
        utils::update_client_on_a_with_sync(ctx_a, ctx_b, &client_id_on_a, signer.clone())
            .unwrap();
        updated_at.push(ctx_b.latest_height());
    }

    // the first update still trusted the creation height, the second one
    // ran more than a trusting period after it
    let mut heights = ctx_a.ibc_store.consensus_state_heights(&client_id_on_a).unwrap();
    heights.sort();
    assert_eq!(heights, updated_at);
    assert!(!heights.contains(&created_at));
    assert_eq!(ctx_a.client_status(&client_id_on_a).unwrap(), Status::Active);
}

#[test]
fn test_header_from_the_future_is_rejected() {
    let mut relayer = two_chains();
    let (ctx_a, ctx_b) = relayer.split_mut();
    let signer = dummy_account_id();

    let client_id_on_a = utils::create_headerchain_client_on_a(
        ctx_a,
        ctx_b,
        &ClientStateConfig::default(),
        signer.clone(),
    )
    .unwrap();

    // `B` runs several blocks ahead of `A`'s clock, beyond the drift allowance
    for _ in 0..5 {
        ctx_b.advance_block();
    }
    let result = utils::update_client_on_a(ctx_a, ctx_b, &client_id_on_a, signer.clone());
    assert!(matches!(
        result,
        Err(RelayerError::TransactionFailed(ContextError::ClientError(_)))
    ));

    utils::update_client_on_a_with_sync(ctx_a, ctx_b, &client_id_on_a, signer).unwrap();
    assert_eq!(
        ctx_a.client_state(&client_id_on_a).unwrap().latest_height(),
        ctx_b.latest_height()
    );
}

#[test]
fn test_conflicting_headers_freeze_headerchain_client() {
    let mut relayer = two_chains();
    let (ctx_a, ctx_b) = relayer.split_mut();
    let signer = dummy_account_id();

    let client_id_on_a = utils::create_headerchain_client_on_a(
        ctx_a,
        ctx_b,
        &ClientStateConfig::default(),
        signer.clone(),
    )
    .unwrap();
    let trusted_height = ctx_b.latest_height();

    ctx_b.advance_block();
    utils::sync_clock_on_a(ctx_a, ctx_b);

    let target_height = ctx_b.latest_height();
    let honest = ctx_b
        .headerchain_header(&target_height, &trusted_height)
        .unwrap();
    let forged = ctx_b
        .host
        .generate_block(
            target_height,
            ctx_b.timestamp_at(target_height),
            CommitmentRoot::from(b"forged".to_vec()),
        )
        .into_header(ctx_b.host_block(&trusted_height).unwrap());

    let misbehaviour = HeaderChainMisbehaviour::new(client_id_on_a.clone(), honest, forged);
    ctx_a
        .deliver(misbehaviour_msg(&client_id_on_a, misbehaviour.into()))
        .unwrap();

    assert_eq!(ctx_a.client_status(&client_id_on_a).unwrap(), Status::Frozen);
    assert!(ctx_a
        .last_event(|event| match event {
            IbcEvent::ClientMisbehaviour(e) => Some(e.client_id().clone()),
            _ => None,
        })
        .is_some_and(|client_id| client_id == client_id_on_a));

    // a frozen client takes no further headers
    ctx_b.advance_block();
    let error = client_error(utils::update_client_on_a_with_sync(
        ctx_a,
        ctx_b,
        &client_id_on_a,
        signer,
    ));
    assert!(matches!(
        error,
        ClientError::ClientNotActive {
            status: Status::Frozen
        }
    ));
}

#[test]
fn test_identical_headers_are_not_misbehaviour() {
    let mut relayer = two_chains();
    let (ctx_a, ctx_b) = relayer.split_mut();

    let client_id_on_a = utils::create_headerchain_client_on_a(
        ctx_a,
        ctx_b,
        &ClientStateConfig::default(),
        dummy_account_id(),
    )
    .unwrap();
    let trusted_height = ctx_b.latest_height();

    ctx_b.advance_block();
    utils::sync_clock_on_a(ctx_a, ctx_b);

    let header = ctx_b
        .headerchain_header(&ctx_b.latest_height(), &trusted_height)
        .unwrap();
    let misbehaviour =
        HeaderChainMisbehaviour::new(client_id_on_a.clone(), header.clone(), header);

    let result = ctx_a.deliver(misbehaviour_msg(&client_id_on_a, misbehaviour.into()));
    assert!(matches!(
        client_error(result),
        ClientError::InvalidMisbehaviour { .. }
    ));
    assert_eq!(ctx_a.client_status(&client_id_on_a).unwrap(), Status::Active);
}

/// A solo client on a fresh chain trusting `signer` at sequence 1.
fn solo_client(ctx: &mut MockContext, signer: &SoloSigner) -> ClientId {
    let client_state = signer.client_state(1, ctx.latest_timestamp());
    let consensus_state = client_state.consensus_state.clone();
    utils::create_client_on_a(
        ctx,
        client_state.into(),
        consensus_state.into(),
        dummy_account_id(),
    )
    .unwrap()
}

fn solo_client_state(ctx: &MockContext, client_id: &ClientId) -> SoloClientState {
    match ctx.client_state(client_id).unwrap() {
        AnyClientState::Solo(client_state) => client_state,
        other => panic!("expected a solo client, got {other:?}"),
    }
}

#[test]
fn test_solo_client_hands_over_keys() {
    let mut ctx = chain("chaina-0");
    let first = SoloSigner::new(7, "solo");
    let second = SoloSigner::new(8, "solo-next");

    let client_id = solo_client(&mut ctx, &first);

    let header = first.header(1, ctx.latest_timestamp(), &second);
    ctx.deliver(update_msg(&client_id, header.into())).unwrap();

    let client_state = solo_client_state(&ctx, &client_id);
    assert_eq!(client_state.sequence, Height::new(0, 2).unwrap());
    assert_eq!(client_state.consensus_state.diversifier, "solo-next");

    // the retired key no longer signs for the client
    let stale = first.header(2, ctx.latest_timestamp(), &first);
    assert!(ctx.deliver(update_msg(&client_id, stale.into())).is_err());

    let header = second.header(2, ctx.latest_timestamp(), &first);
    ctx.deliver(update_msg(&client_id, header.into())).unwrap();
    assert_eq!(
        solo_client_state(&ctx, &client_id).sequence,
        Height::new(0, 3).unwrap()
    );
}

#[test]
fn test_solo_equivocation_freezes_client() {
    let mut ctx = chain("chaina-0");
    let first = SoloSigner::new(7, "solo");
    let second = SoloSigner::new(8, "solo-next");

    let client_id = solo_client(&mut ctx, &first);
    let header = first.header(1, ctx.latest_timestamp(), &second);
    ctx.deliver(update_msg(&client_id, header.into())).unwrap();

    // evidence at a past sequence is rejected
    let stale = first.misbehaviour(client_id.clone(), 1, ctx.latest_timestamp());
    assert!(ctx
        .deliver(misbehaviour_msg(&client_id, stale.into()))
        .is_err());
    assert_eq!(ctx.client_status(&client_id).unwrap(), Status::Active);

    let misbehaviour = second.misbehaviour(client_id.clone(), 2, ctx.latest_timestamp());
    ctx.deliver(misbehaviour_msg(&client_id, misbehaviour.into()))
        .unwrap();
    assert_eq!(ctx.client_status(&client_id).unwrap(), Status::Frozen);

    let header = second.header(2, ctx.latest_timestamp(), &first);
    let error = client_error(ctx.deliver(update_msg(&client_id, header.into())));
    assert!(matches!(
        error,
        ClientError::ClientNotActive {
            status: Status::Frozen
        }
    ));
}

#[test]
fn test_headerchain_client_upgrade() {
    let mut relayer = two_chains();
    let (ctx_a, ctx_b) = relayer.split_mut();
    let signer = dummy_account_id();
    let config = ClientStateConfig::default();

    let client_id_on_a =
        utils::create_headerchain_client_on_a(ctx_a, ctx_b, &config, signer.clone()).unwrap();

    let plan_height = ctx_b.latest_height().increment();
    let upgraded_height = plan_height.add(10);

    let upgraded_client_state: Any = ctx_b
        .host
        .generate_client_state(upgraded_height, &config)
        .unwrap()
        .into();
    let upgraded_consensus_state: Any = ctx_b.latest_block().consensus_state().into();

    ctx_b.schedule_upgrade(
        plan_height,
        upgraded_client_state.clone(),
        upgraded_consensus_state.clone(),
    );
    ctx_b.advance_block();
    assert_eq!(ctx_b.latest_height(), plan_height);

    utils::update_client_on_a_with_sync(ctx_a, ctx_b, &client_id_on_a, signer.clone()).unwrap();

    let upgrade_msg = |consensus_state: Any| -> Result<MsgEnvelope, RelayerError> {
        let (proof_upgrade_client, proof_upgrade_consensus_state) =
            ctx_b.upgrade_proofs(plan_height, plan_height)?;
        Ok(MsgEnvelope::Client(ClientMsg::UpgradeClient(
            MsgUpgradeClient {
                client_id: client_id_on_a.clone(),
                upgraded_client_state: upgraded_client_state.clone(),
                upgraded_consensus_state: consensus_state,
                proof_upgrade_client,
                proof_upgrade_consensus_state,
                signer: signer.clone(),
            },
        )))
    };

    // a consensus state other than the committed one does not match the proof
    let tampered: Any = ctx_b
        .host_block(&Height::new(0, 1).unwrap())
        .unwrap()
        .consensus_state()
        .into();
    let msg = upgrade_msg(tampered).unwrap();
    assert!(ctx_a.deliver(msg).is_err());

    let msg = upgrade_msg(upgraded_consensus_state.clone()).unwrap();
    ctx_a.deliver(msg.clone()).unwrap();

    let client_state = ctx_a.client_state(&client_id_on_a).unwrap();
    assert_eq!(client_state.latest_height(), upgraded_height);
    assert!(ctx_a
        .last_event(|event| match event {
            IbcEvent::UpgradeClient(_) => Some(()),
            _ => None,
        })
        .is_some());

    // the client already sits at the upgraded height
    assert!(ctx_a.deliver(msg).is_err());
}
