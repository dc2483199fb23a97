//! Typed client for the JoinMarket wallet daemon (`jmwalletd`).
//!
//! The daemon exposes wallet management, payments, coinjoins and the maker
//! service over an HTTPS JSON interface, and pushes coinjoin progress and
//! transaction events over a websocket. [`JmRpc`] wraps both.
//!
//! # Modules
//!
//! - [`http`] - Route table, wire protocol and daemon error taxonomy
//! - [`types`] - Reply records and their validating decoder
//! - [`ws`] - The notification websocket
//! - [`session`] - Bearer token lifecycle
//! - [`config`] - Configuration file and environment loading
//! - [`log`] - log4rs initialization and redaction helpers

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod log;
pub mod session;
pub mod tls;
pub mod types;
pub mod ws;

pub use crate::client::{JmRpc, MakerSettings, OrderType, WalletType};
pub use crate::error::{DecodeError, JmRpcError, TemplateError};
