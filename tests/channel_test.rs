// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

mod common;

use std::{sync::Arc, time::Duration};

use futures_util::StreamExt;
use jmrpc::{
    JmRpc, JmRpcError,
    tls::TlsSettings,
    types::{CoinjoinState, NotificationEvent},
    ws::{ChannelFrame, ChannelStatus, Message, NotificationChannel},
};
use serde_json::json;
use tokio::{
    net::TcpListener,
    time::{sleep, timeout},
};
use tokio_tungstenite::accept_async;
use url::Url;
use wiremock::MockServer;

use common::{MockNotifier, RECEIVE_TIMEOUT, test_config};

fn channel_to(notifier: &MockNotifier) -> NotificationChannel {
    channel_with_buffer(&notifier.url, 16)
}

fn channel_with_buffer(url: &Url, buffer: usize) -> NotificationChannel {
    NotificationChannel::new(
        url.clone(),
        TlsSettings::default(),
        Duration::from_secs(2),
        Duration::from_millis(100),
        buffer,
    )
}

fn transaction_frame() -> String {
    json!({
        "txid": "ab12",
        "txdetails": {
            "hex": "0200000001",
            "txid": "ab12",
            "inputs": [{"outpoint": "cd34:0", "scriptSig": "", "nSequence": 4294967294u64}],
            "outputs": [{"value_sats": 100000, "scriptPubKey": "0014aa"}],
            "nLockTime": 0,
            "nVersion": 2
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_use_before_open_is_unavailable() {
    let notifier = MockNotifier::start().await;
    let channel = channel_to(&notifier);

    assert_eq!(channel.status().await, ChannelStatus::Idle);
    assert!(matches!(channel.send("tok").await, Err(JmRpcError::ChannelUnavailable(_))));
    assert!(matches!(channel.receive().await, Err(JmRpcError::ChannelUnavailable(_))));
}

#[tokio::test]
async fn test_frames_are_classified_in_arrival_order() {
    let notifier = MockNotifier::start().await;
    let channel = channel_to(&notifier);
    channel.open().await.unwrap();
    let mut events = channel.receive().await.unwrap();

    notifier.push_text(r#"{"coinjoin_state": 1}"#);
    notifier.push_text(&transaction_frame());
    notifier.push(Message::Binary(vec![1, 2, 3]));

    let first = timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap().unwrap().unwrap();
    match first {
        ChannelFrame::Notification(NotificationEvent::CoinjoinProgress(progress)) => {
            assert_eq!(progress.coinjoin_state, CoinjoinState::MakerRunning);
        },
        other => panic!("unexpected frame: {:?}", other),
    }

    let second = timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap().unwrap().unwrap();
    match second {
        ChannelFrame::Notification(NotificationEvent::Transaction(tx)) => {
            assert_eq!(tx.txid, "ab12");
            assert_eq!(tx.tx_details.total_output_sats(), 100_000);
        },
        other => panic!("unexpected frame: {:?}", other),
    }

    let third = timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap().unwrap().unwrap();
    assert!(matches!(third, ChannelFrame::Raw(Message::Binary(ref data)) if data == &vec![1, 2, 3]));

    channel.close().await;
}

#[tokio::test]
async fn test_undecodable_frame_does_not_end_the_stream() {
    let notifier = MockNotifier::start().await;
    let channel = channel_to(&notifier);
    channel.open().await.unwrap();
    let mut events = channel.receive().await.unwrap();

    notifier.push_text(r#"{"coinjoin_state": 7}"#);
    notifier.push_text(r#"{"coinjoin_state": 2}"#);

    let bad = timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap().unwrap();
    assert!(matches!(bad, Err(JmRpcError::Decode(_))));

    let good = timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap().unwrap().unwrap();
    assert!(matches!(
        good,
        ChannelFrame::Notification(NotificationEvent::CoinjoinProgress(_))
    ));

    channel.close().await;
}

#[tokio::test]
async fn test_stream_is_handed_out_once() {
    let notifier = MockNotifier::start().await;
    let channel = channel_to(&notifier);
    channel.open().await.unwrap();

    let _events = channel.receive().await.unwrap();
    assert!(matches!(channel.receive().await, Err(JmRpcError::ChannelUnavailable(_))));

    channel.close().await;
}

#[tokio::test]
async fn test_only_text_frames_can_be_sent() {
    let mut notifier = MockNotifier::start().await;
    let channel = channel_to(&notifier);
    channel.open().await.unwrap();

    let err = channel.send_message(Message::Binary(vec![0])).await.unwrap_err();
    assert!(matches!(err, JmRpcError::InvalidPayload("binary")));

    channel.send_message(Message::Text("hello".to_string())).await.unwrap();
    assert_eq!(notifier.next_received().await, "hello");

    channel.close().await;
}

#[tokio::test]
async fn test_daemon_close_ends_the_stream_cleanly() {
    let notifier = MockNotifier::start().await;
    let channel = channel_to(&notifier);
    channel.open().await.unwrap();
    let mut events = channel.receive().await.unwrap();

    notifier.push(Message::Close(None));

    assert!(timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap().is_none());
    assert_eq!(channel.status().await, ChannelStatus::Closed);
}

#[tokio::test]
async fn test_dropped_connection_yields_one_terminal_error() {
    let mut notifier = MockNotifier::start().await;
    let channel = channel_to(&notifier);
    channel.open().await.unwrap();
    let mut events = channel.receive().await.unwrap();

    notifier.disconnect();

    let last = timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap();
    assert!(matches!(last, Some(Err(JmRpcError::Channel(_)))), "unexpected item: {:?}", last);
    assert!(timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_closing_client_ends_pending_read() {
    let mock_server = MockServer::start().await;
    let mut notifier = MockNotifier::start().await;
    let client = Arc::new(JmRpc::new(&test_config(&mock_server.uri(), &notifier.url)).unwrap());

    client.adopt_token("tok-3").await.unwrap();
    assert_eq!(notifier.next_received().await, "tok-3");
    assert_eq!(client.channel_status().await, ChannelStatus::Open);

    let mut events = client.receive().await.unwrap();
    let pending = tokio::spawn(async move { events.next().await });
    sleep(Duration::from_millis(50)).await;

    client.close().await;

    let item = timeout(RECEIVE_TIMEOUT, pending).await.unwrap().unwrap();
    assert!(item.is_none(), "unexpected item: {:?}", item);
    assert_eq!(client.channel_status().await, ChannelStatus::Closed);
    assert!(!client.has_token().await);
}

#[tokio::test]
async fn test_adopting_same_token_twice_resends_it() {
    let mock_server = MockServer::start().await;
    let mut notifier = MockNotifier::start().await;
    let client = JmRpc::new(&test_config(&mock_server.uri(), &notifier.url)).unwrap();

    client.adopt_token("tok-4").await.unwrap();
    client.adopt_token("tok-4").await.unwrap();

    assert_eq!(notifier.next_received().await, "tok-4");
    assert_eq!(notifier.next_received().await, "tok-4");
    assert!(client.has_token().await);

    client.close().await;
}

#[tokio::test]
async fn test_lagging_consumer_loses_nothing() {
    let mut notifier = MockNotifier::start().await;
    let channel = channel_with_buffer(&notifier.url, 1);
    channel.open().await.unwrap();
    let mut events = channel.receive().await.unwrap();

    for code in 0..3 {
        notifier.push_text(&json!({ "coinjoin_state": code }).to_string());
    }
    notifier.disconnect();
    sleep(Duration::from_millis(200)).await;

    let mut states = Vec::new();
    for _ in 0..3 {
        match timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap() {
            Some(Ok(ChannelFrame::Notification(NotificationEvent::CoinjoinProgress(progress)))) => {
                states.push(progress.coinjoin_state)
            },
            other => panic!("unexpected item: {:?}", other),
        }
    }
    assert_eq!(
        states,
        vec![
            CoinjoinState::TakerRunning,
            CoinjoinState::MakerRunning,
            CoinjoinState::NotRunning
        ]
    );

    let last = timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap();
    assert!(matches!(last, Some(Err(JmRpcError::Channel(_)))), "unexpected item: {:?}", last);
    assert!(timeout(RECEIVE_TIMEOUT, events.next()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_stalled_peer_does_not_block_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = Url::parse(&format!("ws://{}", listener.local_addr().unwrap())).unwrap();
    // Completes the handshake, then never reads again.
    let peer = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = accept_async(stream).await.unwrap();
        sleep(Duration::from_secs(30)).await;
        drop(ws);
    });

    let channel = NotificationChannel::new(
        url,
        TlsSettings::default(),
        Duration::from_millis(500),
        Duration::from_millis(100),
        16,
    );
    channel.open().await.unwrap();

    let oversized = "x".repeat(64 * 1024 * 1024);
    let err = timeout(RECEIVE_TIMEOUT, channel.send(&oversized))
        .await
        .expect("send did not give up")
        .unwrap_err();
    assert!(matches!(err, JmRpcError::ChannelUnavailable(_)), "unexpected error: {:?}", err);
    assert_eq!(channel.status().await, ChannelStatus::Closed);

    timeout(RECEIVE_TIMEOUT, channel.close()).await.expect("close blocked");
    assert!(matches!(channel.send("tok").await, Err(JmRpcError::ChannelUnavailable(_))));

    peer.abort();
}
