//! Notification websocket.
//!
//! The daemon pushes coinjoin progress and completed transactions over a
//! separate secure websocket. Clients authenticate by sending their bearer
//! token as the first text frame; afterwards the connection is receive-only
//! in practice.
//!
//! # Example
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use jmrpc::{JmRpc, config::ClientConfig, ws::ChannelFrame};
//!
//! # async fn example() -> Result<(), jmrpc::JmRpcError> {
//! let client = JmRpc::new(&ClientConfig::default())?;
//! client.unlock_wallet("w.jmdat", "secret").await?;
//!
//! let mut events = client.receive().await?;
//! while let Some(frame) = events.next().await {
//!     if let ChannelFrame::Notification(event) = frame? {
//!         println!("{:?}", event);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod channel;

pub use channel::{ChannelFrame, ChannelStatus, NotificationChannel, NotificationStream};
pub use tokio_tungstenite::tungstenite::Message;
