//! HTTP transport for the JoinMarket wallet daemon RPC interface.
//!
//! This module knows the daemon's route table and speaks its wire protocol.
//! It does not know about reply schemas: callers receive raw JSON and decode
//! it themselves (see [`crate::types`]).
//!
//! # Architecture
//!
//! - [`RpcMethod`] - The closed set of daemon operations with their verb and
//!   route template
//! - [`HttpTransport`] - Issues calls, attaches the bearer token, maps
//!   failures to [`JmRpcError`](crate::JmRpcError)
//! - [`DaemonErrorKind`] - The daemon's fixed failure messages
//!
//! # Wire format
//!
//! GET requests carry no body. POST bodies are JSON objects holding
//! `"jsonrpc": "2.0"`, the call counter as `"id"`, and the method's own
//! fields. Every request carries `Authorization: Bearer <token>` once a token
//! has been adopted.
//!
//! # Example
//!
//! ```rust,no_run
//! use jmrpc::{
//!     config::ClientConfig,
//!     http::{HttpTransport, RequestOptions, RpcMethod},
//!     session::SessionToken,
//!     tls::TlsSettings,
//! };
//!
//! # async fn example() -> Result<(), jmrpc::JmRpcError> {
//! let config = ClientConfig::default();
//! let transport = HttpTransport::new(&config, &TlsSettings::load(&config)?, SessionToken::default())?;
//!
//! let reply = transport
//!     .get(RpcMethod::GetAddress, &[("walletname", "w.jmdat"), ("mixdepth", "0")], RequestOptions::default())
//!     .await?;
//! println!("{}", reply["address"]);
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;
mod method;

pub use error::DaemonErrorKind;
pub use http_client::{HttpTransport, JSONRPC_VERSION, RequestOptions, build_payload};
pub use method::{API_VERSION_PREFIX, RouteArgs, RpcMethod, Verb};
