// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the JoinMarket RPC client.
//!
//! [`JmRpcError`] is returned by every fallible client operation. Failures
//! reported by the daemon itself are classified through
//! [`DaemonErrorKind`](crate::http::DaemonErrorKind); everything else originates
//! locally (path templates, argument checks, schema decoding, the
//! notification channel, timeouts).

use reqwest::StatusCode;
use thiserror::Error;

use crate::http::{DaemonErrorKind, RpcMethod, Verb};

/// Errors that can occur while talking to the JoinMarket daemon.
///
/// # Example
///
/// ```rust,no_run
/// use jmrpc::{JmRpcError, http::DaemonErrorKind};
///
/// fn handle_error(err: JmRpcError) {
///     match err {
///         JmRpcError::Daemon { kind: DaemonErrorKind::NotAuthorized, .. } => {
///             eprintln!("Wrong password or stale token");
///         }
///         JmRpcError::HttpStatus { status, body } => {
///             eprintln!("Daemon returned {}: {}", status, body);
///         }
///         _ => eprintln!("Other error: {}", err),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum JmRpcError {
    /// A route template could not be filled from the supplied arguments.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The method was dispatched through a call of the wrong HTTP verb.
    #[error("Method {method} must be called with {expected}")]
    InvalidOperation { method: RpcMethod, expected: Verb },

    /// A caller-supplied argument is outside the accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The daemon replied with data that does not match the expected record.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The daemon reported one of its known failure messages.
    #[error("Daemon error {status}: {kind}")]
    Daemon { kind: DaemonErrorKind, status: StatusCode },

    /// The daemon returned a non-success status with an unrecognised body.
    #[error("Server error {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned by the daemon.
        status: StatusCode,
        /// The raw response body.
        body: String,
    },

    /// The request did not complete before its deadline.
    #[error("Request to {0} timed out")]
    Timeout(String),

    /// The HTTP request failed due to a network or connection error.
    #[error("Request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    /// An error occurred in the HTTP middleware layer (retry exhaustion).
    #[error("Middleware error: {0}")]
    Middleware(anyhow::Error),

    /// The notification channel is not open, could not be opened, or its
    /// event stream has already been handed out.
    #[error("Notification channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// Only text frames may be sent over the notification channel.
    #[error("Notification channel accepts text frames only, got {0}")]
    InvalidPayload(&'static str),

    /// The notification channel terminated abnormally.
    #[error("Notification channel error: {0}")]
    Channel(#[from] tokio_tungstenite::tungstenite::Error),

    /// The client has been closed.
    #[error("Client is closed")]
    ClientClosed,

    /// TLS trust material could not be loaded.
    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for JmRpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();
            JmRpcError::Timeout(url)
        } else {
            JmRpcError::RequestFailed(err)
        }
    }
}

impl From<reqwest_middleware::Error> for JmRpcError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => JmRpcError::Middleware(e),
        }
    }
}

impl From<native_tls::Error> for JmRpcError {
    fn from(err: native_tls::Error) -> Self {
        JmRpcError::Tls(err.to_string())
    }
}

/// Failure to turn a route template into a concrete path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Route {template} requires argument '{name}'")]
    MissingArgument { template: &'static str, name: String },

    #[error("Route {template} has no placeholder '{name}'")]
    UnknownArgument { template: &'static str, name: String },

    #[error("Invalid value {value:?} for route argument '{name}'")]
    InvalidValue { name: String, value: String },
}

/// A daemon reply that does not match its declared record schema.
///
/// `path` names the offending field using dotted/indexed notation relative to
/// the record root, e.g. `walletinfo.accounts[0].branches[1].balance`. It is
/// empty when the document root itself is at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to decode {record} at '{path}': {reason}")]
pub struct DecodeError {
    pub record: &'static str,
    pub path: String,
    pub reason: String,
}

impl DecodeError {
    pub fn new(record: &'static str, path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            record,
            path: path.into(),
            reason: reason.into(),
        }
    }
}
