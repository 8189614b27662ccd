mod common;

use core::time::Duration;

use interlink_core::channel::types::channel::{Order, State};
use interlink_core::channel::types::error::{ChannelError, PacketError};
use interlink_core::channel::types::packet::Packet;
use interlink_core::channel::types::timeout::{TimeoutHeight, TimeoutTimestamp};
use interlink_core::client::context::prelude::*;
use interlink_core::client::types::error::ClientError;
use interlink_core::handler::types::error::ContextError;
use interlink_core::handler::types::events::IbcEvent;
use interlink_core::host::types::identifiers::{ChannelId, ConnectionId, Sequence};
use interlink_core::host::types::path::{AckPath, CommitmentPath, ReceiptPath, SeqRecvPath};
use interlink_core::host::ValidationContext;
use interlink_testkit::fixtures::core::signer::dummy_account_id;
use interlink_testkit::relayer::context::ChannelLink;
use interlink_testkit::relayer::{utils, RelayerContext, RelayerError};
use interlink_testkit::testapp::ibc::applications::mock::{
    mock_app_version, mock_port_id, REJECTED_PACKET_DATA,
};
use rstest::rstest;

use common::two_chains;

fn linked(ordering: Order, delay_period: Duration) -> (RelayerContext, ChannelLink) {
    let mut relayer = two_chains();
    let link = relayer
        .link_mock_channel(ordering, delay_period, dummy_account_id())
        .expect("channel opens");
    (relayer, link)
}

/// Sends `data` from `A` with a timeout `blocks` blocks past the latest
/// height of `B`.
fn send_with_timeout_on_a(
    relayer: &mut RelayerContext,
    link: &ChannelLink,
    data: &[u8],
    blocks: u64,
) -> Packet {
    let timeout_height = relayer.get_ctx_b().latest_height().add(blocks);
    relayer
        .get_ctx_a_mut()
        .send_packet(
            &link.port_id_on_a,
            &link.chan_id_on_a,
            data.to_vec(),
            TimeoutHeight::At(timeout_height),
            TimeoutTimestamp::Never,
        )
        .expect("packet sent")
}

fn packet_error(result: Result<impl core::fmt::Debug, RelayerError>) -> PacketError {
    match result {
        Err(RelayerError::TransactionFailed(ContextError::PacketError(e))) => e,
        other => panic!("expected a packet error, got {other:?}"),
    }
}

fn channel_error(result: Result<impl core::fmt::Debug, RelayerError>) -> ChannelError {
    match result {
        Err(RelayerError::TransactionFailed(ContextError::ChannelError(e))) => e,
        other => panic!("expected a channel error, got {other:?}"),
    }
}

fn next_sequence_recv_on_b(relayer: &RelayerContext, link: &ChannelLink) -> Sequence {
    relayer
        .get_ctx_b()
        .ibc_store
        .get_next_sequence_recv(&SeqRecvPath::new(&link.port_id_on_b, &link.chan_id_on_b))
        .unwrap()
}

#[rstest]
#[case::unordered(Order::Unordered)]
#[case::ordered(Order::Ordered)]
fn test_handshakes_open_both_ends(#[case] ordering: Order) {
    let (relayer, link) = linked(ordering, Duration::ZERO);

    assert_eq!(link.conn_id_on_a, ConnectionId::new(0));
    assert_eq!(link.conn_id_on_b, ConnectionId::new(0));
    assert_eq!(link.chan_id_on_a, ChannelId::new(0));
    assert_eq!(link.chan_id_on_b, ChannelId::new(0));

    for (ctx, chan_id) in [
        (relayer.get_ctx_a(), &link.chan_id_on_a),
        (relayer.get_ctx_b(), &link.chan_id_on_b),
    ] {
        let chan_end = utils::channel_end(ctx, &link.port_id_on_a, chan_id).unwrap();
        assert_eq!(chan_end.state(), &State::Open);
        assert_eq!(chan_end.ordering(), &ordering);
        assert_eq!(chan_end.version(), &mock_app_version());

        // the mock module holds the capability of its end
        assert!(ctx
            .module
            .state()
            .capabilities
            .contains_key(&(link.port_id_on_a.clone(), chan_id.clone())));
    }
}

#[test_log::test]
fn test_packet_round_trip() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);
    let signer = dummy_account_id();

    let packet = relayer.send_packet_on_a(&link, b"hello".to_vec()).unwrap();
    assert_eq!(packet.seq_on_a, Sequence::from(1));

    let ack = relayer
        .relay_packet_on_a(&link, packet.clone(), signer)
        .unwrap();
    assert_eq!(ack.as_bytes(), br#"{"result":"aGVsbG8="}"#);

    assert_eq!(relayer.get_ctx_b().module.state().received, vec![packet.clone()]);
    assert_eq!(
        relayer.get_ctx_a().module.state().acknowledged,
        vec![(packet.seq_on_a, ack)]
    );

    // an acknowledged packet leaves no commitment behind
    let commitment_path =
        CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a);
    assert!(relayer
        .get_ctx_a()
        .ibc_store
        .get_packet_commitment(&commitment_path)
        .is_err());

    let receipt_path =
        ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
    assert!(relayer
        .get_ctx_b()
        .ibc_store
        .get_packet_receipt(&receipt_path)
        .is_ok());
}

#[test_log::test]
fn test_packets_flow_both_ways() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);
    let signer = dummy_account_id();

    let from_a = relayer.send_packet_on_a(&link, b"ping".to_vec()).unwrap();
    relayer
        .relay_packet_on_a(&link, from_a, signer.clone())
        .unwrap();

    let from_b = relayer
        .get_ctx_b_mut()
        .send_mock_packet(&link.chan_id_on_b, b"pong".to_vec())
        .unwrap();
    // the channel of `B` keeps its own send sequence
    assert_eq!(from_b.seq_on_a, Sequence::from(1));

    relayer
        .relay_packet_on_b(&link, from_b.clone(), signer)
        .unwrap();
    assert_eq!(relayer.get_ctx_a().module.state().received, vec![from_b]);
}

#[test_log::test]
fn test_handshakes_initiated_by_b() {
    let mut relayer = two_chains();
    let signer = dummy_account_id();

    let client_id_on_a = relayer.create_client_on_a(signer.clone()).unwrap();
    let client_id_on_b = relayer.create_client_on_b(signer.clone()).unwrap();

    let (conn_id_on_b, conn_id_on_a) = relayer
        .create_connection_on_b(
            &client_id_on_b,
            &client_id_on_a,
            Duration::ZERO,
            signer.clone(),
        )
        .unwrap();

    let port_id = mock_port_id();
    let (chan_id_on_b, chan_id_on_a) = relayer
        .create_channel_on_b(
            &conn_id_on_b,
            &port_id,
            &conn_id_on_a,
            &port_id,
            Order::Ordered,
            signer.clone(),
        )
        .unwrap();

    let link = ChannelLink {
        client_id_on_a,
        client_id_on_b,
        conn_id_on_a,
        conn_id_on_b,
        port_id_on_a: port_id.clone(),
        port_id_on_b: port_id,
        chan_id_on_a,
        chan_id_on_b,
    };

    // the last handshake step ran on `A`, so the client on `B` lags behind
    relayer
        .update_client_on_b_with_sync(&link.client_id_on_b, signer.clone())
        .unwrap();
    assert_eq!(
        relayer
            .get_ctx_b()
            .client_state(&link.client_id_on_b)
            .unwrap()
            .latest_height(),
        relayer.get_ctx_a().latest_height()
    );

    relayer.close_channel_on_b(&link, signer).unwrap();
    for (ctx, chan_id) in [
        (relayer.get_ctx_a(), &link.chan_id_on_a),
        (relayer.get_ctx_b(), &link.chan_id_on_b),
    ] {
        let chan_end = utils::channel_end(ctx, &link.port_id_on_a, chan_id).unwrap();
        assert_eq!(chan_end.state(), &State::Closed);
    }
}

#[test_log::test]
fn test_rejected_packet_is_acknowledged_with_an_error() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);

    let packet = relayer
        .send_packet_on_a(&link, REJECTED_PACKET_DATA.to_vec())
        .unwrap();
    let ack = relayer
        .relay_packet_on_a(&link, packet, dummy_account_id())
        .unwrap();

    assert!(ack.as_bytes().starts_with(br#"{"error":"#));
}

#[test_log::test]
fn test_unordered_replay_is_rejected() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);
    let signer = dummy_account_id();

    let packet = relayer.send_packet_on_a(&link, b"once".to_vec()).unwrap();
    relayer
        .recv_packet_on_b(&link, packet.clone(), signer.clone())
        .unwrap();

    let err = packet_error(relayer.recv_packet_on_b(&link, packet.clone(), signer));
    assert!(matches!(err, PacketError::PacketAlreadyReceived(seq) if seq == packet.seq_on_a));
    assert_eq!(relayer.get_ctx_b().module.state().received.len(), 1);
}

#[test_log::test]
fn test_unordered_packets_arrive_in_any_order() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);
    let signer = dummy_account_id();

    let first = relayer.send_packet_on_a(&link, b"first".to_vec()).unwrap();
    let second = relayer.send_packet_on_a(&link, b"second".to_vec()).unwrap();

    relayer
        .recv_packet_on_b(&link, second.clone(), signer.clone())
        .unwrap();
    relayer
        .recv_packet_on_b(&link, first.clone(), signer)
        .unwrap();

    assert_eq!(
        relayer.get_ctx_b().module.state().received,
        vec![second, first]
    );
}

#[test_log::test]
fn test_ordered_packets_must_arrive_in_order() {
    let (mut relayer, link) = linked(Order::Ordered, Duration::ZERO);
    let signer = dummy_account_id();

    let first = relayer.send_packet_on_a(&link, b"first".to_vec()).unwrap();
    let second = relayer.send_packet_on_a(&link, b"second".to_vec()).unwrap();

    let err = packet_error(relayer.recv_packet_on_b(&link, second.clone(), signer.clone()));
    assert!(matches!(
        err,
        PacketError::PacketSequenceOutOfOrder { expected, actual }
            if expected == Sequence::from(1) && actual == Sequence::from(2)
    ));

    relayer
        .recv_packet_on_b(&link, first.clone(), signer.clone())
        .unwrap();
    relayer
        .recv_packet_on_b(&link, second.clone(), signer.clone())
        .unwrap();

    // a delivered sequence cannot be delivered again
    let err = packet_error(relayer.recv_packet_on_b(&link, first.clone(), signer));
    assert!(matches!(err, PacketError::PacketSequenceOutOfOrder { .. }));

    assert_eq!(
        relayer.get_ctx_b().module.state().received,
        vec![first, second]
    );
}

#[test_log::test]
fn test_ordered_gap_holds_until_filled() {
    let (mut relayer, link) = linked(Order::Ordered, Duration::ZERO);
    let signer = dummy_account_id();

    let packets: Vec<_> = [b"one", b"two", b"six"]
        .into_iter()
        .map(|data| relayer.send_packet_on_a(&link, data.to_vec()).unwrap())
        .collect();

    relayer
        .recv_packet_on_b(&link, packets[0].clone(), signer.clone())
        .unwrap();
    assert_eq!(next_sequence_recv_on_b(&relayer, &link), Sequence::from(2));

    let err = packet_error(relayer.recv_packet_on_b(&link, packets[2].clone(), signer.clone()));
    assert!(matches!(
        err,
        PacketError::PacketSequenceOutOfOrder { expected, actual }
            if expected == Sequence::from(2) && actual == Sequence::from(3)
    ));
    assert_eq!(next_sequence_recv_on_b(&relayer, &link), Sequence::from(2));

    for packet in &packets[1..] {
        relayer
            .recv_packet_on_b(&link, packet.clone(), signer.clone())
            .unwrap();
    }
    assert_eq!(next_sequence_recv_on_b(&relayer, &link), Sequence::from(4));
    assert_eq!(relayer.get_ctx_b().module.state().received, packets);
}

#[test_log::test]
fn test_rejected_recv_leaves_no_trace() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);
    let signer = dummy_account_id();

    let packet = send_with_timeout_on_a(&mut relayer, &link, b"late", 1);
    relayer.get_ctx_b_mut().advance_block();
    relayer.get_ctx_b_mut().advance_block();

    let err = packet_error(relayer.recv_packet_on_b(&link, packet.clone(), signer));
    assert!(matches!(err, PacketError::TimeoutElapsed { .. }));

    let ctx_b = relayer.get_ctx_b();
    assert!(ctx_b
        .ibc_store
        .get_packet_receipt(&ReceiptPath::new(
            &link.port_id_on_b,
            &link.chan_id_on_b,
            packet.seq_on_a
        ))
        .is_err());
    assert!(ctx_b
        .ibc_store
        .get_packet_acknowledgement(&AckPath::new(
            &link.port_id_on_b,
            &link.chan_id_on_b,
            packet.seq_on_a
        ))
        .is_err());
    assert!(ctx_b.module.state().received.is_empty());
}

#[test_log::test]
fn test_ordered_rejected_recv_keeps_the_sequence() {
    let (mut relayer, link) = linked(Order::Ordered, Duration::ZERO);
    let signer = dummy_account_id();

    let packet = send_with_timeout_on_a(&mut relayer, &link, b"late", 1);
    relayer.get_ctx_b_mut().advance_block();
    relayer.get_ctx_b_mut().advance_block();

    let err = packet_error(relayer.recv_packet_on_b(&link, packet, signer));
    assert!(matches!(err, PacketError::TimeoutElapsed { .. }));
    assert_eq!(next_sequence_recv_on_b(&relayer, &link), Sequence::from(1));
}

#[test_log::test]
fn test_ordered_acknowledgements_settle_in_order() {
    let (mut relayer, link) = linked(Order::Ordered, Duration::ZERO);
    let signer = dummy_account_id();

    let first = relayer.send_packet_on_a(&link, b"first".to_vec()).unwrap();
    let second = relayer.send_packet_on_a(&link, b"second".to_vec()).unwrap();
    let first_ack = relayer
        .recv_packet_on_b(&link, first.clone(), signer.clone())
        .unwrap();
    let second_ack = relayer
        .recv_packet_on_b(&link, second.clone(), signer.clone())
        .unwrap();

    let err = packet_error(relayer.ack_packet_on_a(
        &link,
        second.clone(),
        second_ack.clone(),
        signer.clone(),
    ));
    assert!(matches!(
        err,
        PacketError::PacketSequenceOutOfOrder { expected, actual }
            if expected == Sequence::from(1) && actual == Sequence::from(2)
    ));
    assert!(relayer.get_ctx_a().module.state().acknowledged.is_empty());

    relayer
        .ack_packet_on_a(&link, first.clone(), first_ack.clone(), signer.clone())
        .unwrap();
    relayer
        .ack_packet_on_a(&link, second.clone(), second_ack.clone(), signer)
        .unwrap();
    assert_eq!(
        relayer.get_ctx_a().module.state().acknowledged,
        vec![(first.seq_on_a, first_ack), (second.seq_on_a, second_ack)]
    );
}

#[test_log::test]
fn test_closed_channel_refuses_packet_messages() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);
    let signer = dummy_account_id();

    let acked = relayer.send_packet_on_a(&link, b"acked".to_vec()).unwrap();
    let ack = relayer
        .recv_packet_on_b(&link, acked.clone(), signer.clone())
        .unwrap();
    let expiring = send_with_timeout_on_a(&mut relayer, &link, b"expiring", 1);
    let stranded = relayer.send_packet_on_a(&link, b"stranded".to_vec()).unwrap();

    relayer.close_channel_on_a(&link, signer.clone()).unwrap();
    relayer.get_ctx_b_mut().advance_block();
    relayer.get_ctx_b_mut().advance_block();

    let err = channel_error(relayer.recv_packet_on_b(&link, stranded, signer.clone()));
    assert!(matches!(err, ChannelError::ChannelClosed));

    let err = channel_error(relayer.ack_packet_on_a(&link, acked, ack, signer.clone()));
    assert!(matches!(err, ChannelError::ChannelClosed));

    let err = channel_error(relayer.timeout_packet_on_a(&link, expiring, signer));
    assert!(matches!(err, ChannelError::ChannelClosed));

    assert_eq!(relayer.get_ctx_b().module.state().received.len(), 1);
    assert!(relayer.get_ctx_a().module.state().acknowledged.is_empty());
    assert!(relayer.get_ctx_a().module.state().timed_out.is_empty());
}

#[test_log::test]
fn test_double_acknowledgement_is_rejected() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);
    let signer = dummy_account_id();

    let packet = relayer.send_packet_on_a(&link, b"ack me".to_vec()).unwrap();
    let ack = relayer
        .relay_packet_on_a(&link, packet.clone(), signer.clone())
        .unwrap();

    let err = packet_error(relayer.ack_packet_on_a(&link, packet.clone(), ack, signer));
    assert!(matches!(err, PacketError::PacketCommitmentNotFound(seq) if seq == packet.seq_on_a));
    assert_eq!(relayer.get_ctx_a().module.state().acknowledged.len(), 1);
}

#[test_log::test]
fn test_expired_packet_times_out_on_the_sender() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);
    let signer = dummy_account_id();

    let packet = send_with_timeout_on_a(&mut relayer, &link, b"late", 2);

    // not expired yet, so the sender cannot time it out
    let err = packet_error(relayer.timeout_packet_on_a(&link, packet.clone(), signer.clone()));
    assert!(matches!(err, PacketError::TimeoutNotElapsed { .. }));

    relayer.get_ctx_b_mut().advance_block();
    relayer.get_ctx_b_mut().advance_block();

    let err = packet_error(relayer.recv_packet_on_b(&link, packet.clone(), signer.clone()));
    assert!(matches!(err, PacketError::TimeoutElapsed { .. }));

    relayer
        .timeout_packet_on_a(&link, packet.clone(), signer.clone())
        .unwrap();
    assert_eq!(
        relayer.get_ctx_a().module.state().timed_out,
        vec![packet.seq_on_a]
    );

    // an unordered channel stays open
    let chan_end_on_a =
        utils::channel_end(relayer.get_ctx_a(), &link.port_id_on_a, &link.chan_id_on_a).unwrap();
    assert_eq!(chan_end_on_a.state(), &State::Open);

    let err = packet_error(relayer.timeout_packet_on_a(&link, packet.clone(), signer));
    assert!(matches!(err, PacketError::PacketCommitmentNotFound(seq) if seq == packet.seq_on_a));
}

#[test_log::test]
fn test_ordered_timeout_closes_the_channel() {
    let (mut relayer, link) = linked(Order::Ordered, Duration::ZERO);
    let signer = dummy_account_id();

    let packet = send_with_timeout_on_a(&mut relayer, &link, b"late", 1);
    relayer.get_ctx_b_mut().advance_block();
    relayer.get_ctx_b_mut().advance_block();

    relayer
        .timeout_packet_on_a(&link, packet.clone(), signer)
        .unwrap();

    let chan_end_on_a =
        utils::channel_end(relayer.get_ctx_a(), &link.port_id_on_a, &link.chan_id_on_a).unwrap();
    assert_eq!(chan_end_on_a.state(), &State::Closed);
    assert!(relayer
        .get_ctx_a()
        .last_event(|event| match event {
            IbcEvent::ChannelClosed(_) => Some(()),
            _ => None,
        })
        .is_some());

    // nothing can be sent over a closed channel
    let err = channel_error(relayer.send_packet_on_a(&link, b"after".to_vec()));
    assert!(matches!(err, ChannelError::ChannelClosed));
}

#[test_log::test]
fn test_timeout_on_close() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);
    let signer = dummy_account_id();

    let packet = relayer.send_packet_on_a(&link, b"stranded".to_vec()).unwrap();

    utils::channel_close_init_on_a(
        relayer.get_ctx_b_mut(),
        &link.chan_id_on_b,
        &link.port_id_on_b,
        signer.clone(),
    )
    .unwrap();

    // the packet never expires, yet the closed counterparty can never receive it
    relayer
        .timeout_on_close_packet_on_a(&link, packet.clone(), signer)
        .unwrap();

    assert_eq!(
        relayer.get_ctx_a().module.state().timed_out,
        vec![packet.seq_on_a]
    );
    assert_eq!(
        relayer.get_ctx_b().module.state().closed,
        vec![(link.port_id_on_b.clone(), link.chan_id_on_b.clone())]
    );
}

#[test_log::test]
fn test_close_handshake() {
    let (mut relayer, link) = linked(Order::Unordered, Duration::ZERO);
    let signer = dummy_account_id();

    relayer.close_channel_on_a(&link, signer).unwrap();

    for (ctx, chan_id) in [
        (relayer.get_ctx_a(), &link.chan_id_on_a),
        (relayer.get_ctx_b(), &link.chan_id_on_b),
    ] {
        let chan_end = utils::channel_end(ctx, &link.port_id_on_a, chan_id).unwrap();
        assert_eq!(chan_end.state(), &State::Closed);
        assert_eq!(ctx.module.state().closed.len(), 1);
    }
}

#[test_log::test]
fn test_delay_period_holds_back_proofs() {
    let delay_period = Duration::from_secs(60);
    let (mut relayer, link) = linked(Order::Unordered, delay_period);
    let signer = dummy_account_id();

    let packet = relayer.send_packet_on_a(&link, b"patience".to_vec()).unwrap();

    // the client of `A` on `B` was just updated to the proof height
    let err = packet_error(relayer.recv_packet_on_b(&link, packet.clone(), signer.clone()));
    assert!(matches!(
        err,
        PacketError::FailedPacketVerification {
            client_error: ClientError::DelayPeriodNotElapsed { .. },
            ..
        }
    ));

    relayer.get_ctx_b_mut().advance_block_by(delay_period);

    relayer
        .recv_packet_on_b(&link, packet.clone(), signer)
        .unwrap();
    assert_eq!(relayer.get_ctx_b().module.state().received, vec![packet]);
}
