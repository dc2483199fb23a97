// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use futures_util::{
    SinkExt, Stream, StreamExt,
    stream::{SplitSink, SplitStream},
};
use log::{debug, info, warn};
use tokio::{
    net::TcpStream,
    sync::{Mutex, mpsc},
    task::JoinHandle,
    time::timeout,
};
use tokio_tungstenite::{
    Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config,
    tungstenite::{Message, protocol::CloseFrame, protocol::frame::coding::CloseCode},
};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{error::JmRpcError, tls::TlsSettings, types::NotificationEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type FrameResult = Result<ChannelFrame, JmRpcError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    /// Never opened.
    Idle,
    Open,
    /// Closed locally, by the daemon, or after a transport error.
    Closed,
}

/// One inbound item of the notification stream.
#[derive(Debug)]
pub enum ChannelFrame {
    /// A classified and decoded text frame.
    Notification(NotificationEvent),
    /// A non-text frame, handed over unclassified.
    Raw(Message),
}

/// The single persistent websocket to the daemon's notification endpoint.
///
/// The connection is read by a background task that classifies text frames
/// and queues them for the one [`NotificationStream`] handed out by
/// [`receive`](Self::receive). Reading never holds the lock used for sending,
/// and neither touches the HTTP transport.
pub struct NotificationChannel {
    url: Url,
    tls: TlsSettings,
    connect_timeout: Duration,
    grace: Duration,
    buffer: usize,
    state: Mutex<ChannelState>,
}

struct ChannelState {
    status: ChannelStatus,
    sink: Option<WsSink>,
    events: Option<mpsc::Receiver<FrameResult>>,
    shutdown: CancellationToken,
    reader: Option<JoinHandle<()>>,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            status: ChannelStatus::Idle,
            sink: None,
            events: None,
            shutdown: CancellationToken::new(),
            reader: None,
        }
    }
}

impl NotificationChannel {
    pub fn new(url: Url, tls: TlsSettings, connect_timeout: Duration, grace: Duration, buffer: usize) -> Self {
        Self {
            url,
            tls,
            connect_timeout,
            grace,
            buffer,
            state: Mutex::new(ChannelState::default()),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn status(&self) -> ChannelStatus {
        let state = self.state.lock().await;
        match state.status {
            ChannelStatus::Open if state.shutdown.is_cancelled() => ChannelStatus::Closed,
            status => status,
        }
    }

    /// Connects to the daemon if not already connected.
    pub async fn open(&self) -> Result<(), JmRpcError> {
        let mut state = self.state.lock().await;
        if state.status == ChannelStatus::Open && !state.shutdown.is_cancelled() {
            return Ok(());
        }

        let connector = self.connector()?;
        debug!(url:% = self.url; "WS: Connecting to notification channel");
        let (ws, _) = timeout(
            self.connect_timeout,
            connect_async_tls_with_config(self.url.as_str(), None, false, connector),
        )
        .await
        .map_err(|_| JmRpcError::ChannelUnavailable(format!("timed out connecting to {}", self.url)))?
        .map_err(|e| JmRpcError::ChannelUnavailable(format!("could not connect to {}: {}", self.url, e)))?;

        let (sink, stream) = ws.split();
        let (tx, rx) = mpsc::channel(self.buffer);
        let shutdown = CancellationToken::new();
        let reader = tokio::spawn(read_frames(stream, tx, shutdown.clone()));

        *state = ChannelState {
            status: ChannelStatus::Open,
            sink: Some(sink),
            events: Some(rx),
            shutdown,
            reader: Some(reader),
        };
        info!(url:% = self.url; "WS: Notification channel open");
        Ok(())
    }

    fn connector(&self) -> Result<Option<Connector>, JmRpcError> {
        if self.url.scheme() != "wss" || self.tls.is_default() {
            return Ok(None);
        }
        Ok(Some(Connector::NativeTls(self.tls.websocket_connector()?)))
    }

    /// Sends a text frame.
    pub async fn send(&self, text: &str) -> Result<(), JmRpcError> {
        self.send_message(Message::Text(text.to_string())).await
    }

    /// Sends a raw frame. Only text frames are accepted.
    pub async fn send_message(&self, message: Message) -> Result<(), JmRpcError> {
        let kind = match &message {
            Message::Text(_) => None,
            Message::Binary(_) => Some("binary"),
            Message::Ping(_) => Some("ping"),
            Message::Pong(_) => Some("pong"),
            Message::Close(_) => Some("close"),
            Message::Frame(_) => Some("raw frame"),
        };
        if let Some(kind) = kind {
            return Err(JmRpcError::InvalidPayload(kind));
        }

        let mut state = self.state.lock().await;
        if state.status != ChannelStatus::Open || state.shutdown.is_cancelled() {
            return Err(JmRpcError::ChannelUnavailable("channel is not open".to_string()));
        }
        let sink = state
            .sink
            .as_mut()
            .ok_or_else(|| JmRpcError::ChannelUnavailable("channel is not open".to_string()))?;
        let sent = timeout(self.connect_timeout, sink.send(message)).await;
        match sent {
            Ok(sent) => Ok(sent?),
            Err(_) => {
                warn!(url:% = self.url; "WS: Send stalled, closing notification channel");
                state.shutdown.cancel();
                state.sink = None;
                Err(JmRpcError::ChannelUnavailable("timed out sending to notification channel".to_string()))
            },
        }
    }

    /// Hands out the event stream of the current connection. Only one
    /// stream exists per connection.
    pub async fn receive(&self) -> Result<NotificationStream, JmRpcError> {
        let mut state = self.state.lock().await;
        if state.status == ChannelStatus::Idle {
            return Err(JmRpcError::ChannelUnavailable("channel has not been opened".to_string()));
        }
        state
            .events
            .take()
            .map(|rx| NotificationStream { rx })
            .ok_or_else(|| JmRpcError::ChannelUnavailable("notification stream already taken".to_string()))
    }

    /// Closes the connection. Pending [`NotificationStream`] reads end
    /// cleanly. Calling `close` on a closed channel does nothing.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if state.status != ChannelStatus::Open {
            return;
        }

        state.shutdown.cancel();
        if let Some(mut sink) = state.sink.take() {
            let close = Message::Close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: "client closing".into(),
            }));
            match timeout(self.grace, async {
                sink.send(close).await?;
                sink.close().await
            })
            .await
            {
                Ok(Ok(())) => {},
                Ok(Err(e)) => debug!(error:% = e; "WS: Close handshake failed"),
                Err(_) => debug!("WS: Close handshake timed out"),
            }
        }

        if let Some(mut reader) = state.reader.take() {
            if timeout(self.grace, &mut reader).await.is_err() {
                reader.abort();
            }
        }
        state.events = None;
        state.status = ChannelStatus::Closed;
        info!(url:% = self.url; "WS: Notification channel closed");
    }
}

async fn read_frames(mut stream: SplitStream<WsStream>, tx: mpsc::Sender<FrameResult>, shutdown: CancellationToken) {
    loop {
        let message = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            message = stream.next() => message,
        };

        let item = match message {
            None | Some(Ok(Message::Close(_))) => {
                debug!("WS: Notification channel closed by peer");
                break;
            },
            Some(Ok(Message::Text(text))) => NotificationEvent::from_text(&text)
                .map(ChannelFrame::Notification)
                .map_err(JmRpcError::from),
            Some(Ok(other)) => Ok(ChannelFrame::Raw(other)),
            Some(Err(_)) if shutdown.is_cancelled() => break,
            Some(Err(e)) => {
                warn!(error:% = e; "WS: Notification channel failed");
                deliver(&tx, Err(JmRpcError::Channel(e)), &shutdown).await;
                break;
            },
        };

        if !deliver(&tx, item, &shutdown).await {
            break;
        }
    }
    shutdown.cancel();
}

/// Waits for queue space. Returns false once the channel is shutting down or
/// the subscriber has gone away.
async fn deliver(tx: &mpsc::Sender<FrameResult>, item: FrameResult, shutdown: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}

/// Events pushed by the daemon, in arrival order.
///
/// The reader waits for this stream to catch up rather than drop frames, so a
/// slow consumer only delays reading from the socket.
///
/// Yields `None` once the channel is closed by either side. An abnormal
/// close yields one final `Err(JmRpcError::Channel)`. A text frame that fails
/// to decode yields `Err(JmRpcError::Decode)` and the stream continues.
pub struct NotificationStream {
    rx: mpsc::Receiver<FrameResult>,
}

impl NotificationStream {
    pub async fn next_frame(&mut self) -> Option<FrameResult> {
        self.rx.recv().await
    }
}

impl Stream for NotificationStream {
    type Item = FrameResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
