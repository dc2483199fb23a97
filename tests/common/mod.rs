// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use jmrpc::config::ClientConfig;
use tokio::{net::TcpListener, sync::mpsc, time::timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use url::Url;

pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Config pointing at a wiremock daemon and a websocket endpoint.
pub fn test_config(endpoint: &str, ws_endpoint: &Url) -> ClientConfig {
    ClientConfig {
        endpoint: Url::parse(endpoint).unwrap(),
        ws_endpoint: ws_endpoint.clone(),
        timeout_secs: 5,
        shutdown_grace_ms: 50,
        ..ClientConfig::default()
    }
}

/// A websocket endpoint nobody listens on.
pub fn unreachable_ws() -> Url {
    Url::parse("ws://127.0.0.1:9").unwrap()
}

/// Stand-in for the daemon's notification websocket. Accepts a single
/// connection, records inbound text frames and pushes whatever the test
/// queues.
pub struct MockNotifier {
    pub url: Url,
    received: mpsc::UnboundedReceiver<String>,
    outbound: Option<mpsc::UnboundedSender<Message>>,
}

impl MockNotifier {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(ws) = accept_async(stream).await else {
                return;
            };
            let (mut sink, mut source) = ws.split();
            loop {
                tokio::select! {
                    inbound = source.next() => match inbound {
                        Some(Ok(Message::Text(text))) => {
                            let _ = in_tx.send(text);
                        },
                        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                        Some(Ok(_)) => {},
                    },
                    outbound = out_rx.recv() => match outbound {
                        Some(message) => {
                            if sink.send(message).await.is_err() {
                                break;
                            }
                        },
                        // Dropping the socket without a close handshake.
                        None => break,
                    },
                }
            }
        });

        Self {
            url: Url::parse(&format!("ws://{}", addr)).unwrap(),
            received: in_rx,
            outbound: Some(out_tx),
        }
    }

    pub fn push(&self, message: Message) {
        if let Some(outbound) = &self.outbound {
            outbound.send(message).unwrap();
        }
    }

    pub fn push_text(&self, text: &str) {
        self.push(Message::Text(text.to_string()));
    }

    /// Drops the connection without a close frame.
    pub fn disconnect(&mut self) {
        self.outbound = None;
    }

    pub async fn next_received(&mut self) -> String {
        timeout(RECEIVE_TIMEOUT, self.received.recv())
            .await
            .expect("no frame received in time")
            .expect("notifier stopped")
    }
}
