// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::Duration,
};

use log::{debug, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::{Map, Value};
use url::Url;

use super::{
    error::DaemonErrorKind,
    method::{RouteArgs, RpcMethod, Verb},
};
use crate::{config::ClientConfig, error::JmRpcError, session::SessionToken, tls::TlsSettings};

pub const JSONRPC_VERSION: &str = "2.0";

/// Per-call overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    /// Replaces the configured deadline for this call only.
    pub timeout: Option<Duration>,
}

/// Executes daemon calls and returns raw JSON replies.
///
/// Replies are not validated against any schema here. The request counter
/// and the session token are the only shared mutable state: the counter is
/// atomic and the token is read as a snapshot per call.
pub struct HttpTransport {
    base_url: Url,
    client: reqwest_middleware::ClientWithMiddleware,
    token: SessionToken,
    id_count: AtomicU64,
    closed: AtomicBool,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, tls: &TlsSettings, token: SessionToken) -> Result<Self, JmRpcError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| JmRpcError::InvalidArgument(format!("invalid user agent {:?}", config.user_agent)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout());
        let inner_client = tls.apply_to_http(builder)?.build()?;

        let mut client_builder = reqwest_middleware::ClientBuilder::new(inner_client);
        if config.max_retries > 0 {
            let retry_policy =
                reqwest_retry::policies::ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
            client_builder =
                client_builder.with(reqwest_retry::RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(Self {
            base_url: with_trailing_slash(&config.endpoint),
            client: client_builder.build(),
            token,
            id_count: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Number of network calls issued so far.
    pub fn id_count(&self) -> u64 {
        self.id_count.load(Ordering::SeqCst)
    }

    pub async fn get(
        &self,
        method: RpcMethod,
        args: &RouteArgs<'_>,
        options: RequestOptions,
    ) -> Result<Value, JmRpcError> {
        ensure_verb(method, Verb::Get)?;
        self.send_request(method, args, None, options).await
    }

    /// POSTs `body` wrapped in the JSON-RPC envelope.
    pub async fn post(
        &self,
        method: RpcMethod,
        args: &RouteArgs<'_>,
        body: Map<String, Value>,
        options: RequestOptions,
    ) -> Result<Value, JmRpcError> {
        ensure_verb(method, Verb::Post)?;
        self.send_request(method, args, Some(body), options).await
    }

    async fn send_request(
        &self,
        method: RpcMethod,
        args: &RouteArgs<'_>,
        body: Option<Map<String, Value>>,
        options: RequestOptions,
    ) -> Result<Value, JmRpcError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(JmRpcError::ClientClosed);
        }
        let url = self.base_url.join(method.resolve(args)?.trim_start_matches('/'))?;
        let id = self.id_count.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(method = method.wire_name(), id = id; "HTTP: Sending request");

        let mut req = match method.verb() {
            Verb::Get => self.client.get(url),
            Verb::Post => {
                let payload = build_payload(id, body.unwrap_or_default());
                self.client.post(url).body(serde_json::to_string(&payload)?)
            },
        };
        if let Some(token) = self.token.snapshot().await {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(timeout) = options.timeout {
            req = req.timeout(timeout);
        }

        let resp = req.send().await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(match DaemonErrorKind::from_body(&text) {
                Some(kind) => {
                    warn!(method = method.wire_name(), id = id, status = status.as_u16(); "HTTP: Daemon error: {}", kind);
                    JmRpcError::Daemon { kind, status }
                },
                None => {
                    warn!(method = method.wire_name(), id = id, status = status.as_u16(); "HTTP: Unexpected status");
                    JmRpcError::HttpStatus { status, body: text }
                },
            });
        }

        debug!(method = method.wire_name(), id = id, status = status.as_u16(); "HTTP: Request successful");
        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Rejects every later call with [`JmRpcError::ClientClosed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Routes are joined relative to the endpoint, so any path prefix on it
/// (e.g. a reverse proxy mount) must end in `/` to survive the join.
fn with_trailing_slash(endpoint: &Url) -> Url {
    let mut url = endpoint.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn ensure_verb(method: RpcMethod, expected: Verb) -> Result<(), JmRpcError> {
    if method.verb() == expected {
        Ok(())
    } else {
        Err(JmRpcError::InvalidOperation { method, expected })
    }
}

/// `{"jsonrpc": "2.0", "id": <id>, ...body}`
pub fn build_payload(id: u64, body: Map<String, Value>) -> Value {
    let mut payload = Map::with_capacity(body.len() + 2);
    payload.insert("jsonrpc".to_string(), Value::from(JSONRPC_VERSION));
    payload.insert("id".to_string(), Value::from(id));
    payload.extend(body);
    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn payload_wraps_body_in_envelope() {
        let body = json!({"password": "secret"}).as_object().cloned().unwrap();
        assert_eq!(
            build_payload(4, body),
            json!({"jsonrpc": "2.0", "id": 4, "password": "secret"})
        );
    }

    #[test]
    fn endpoint_path_prefix_is_kept() {
        let url = with_trailing_slash(&Url::parse("https://host:28183/jm").unwrap());
        let joined = url
            .join(RpcMethod::Session.resolve(&[]).unwrap().trim_start_matches('/'))
            .unwrap();
        assert_eq!(joined.as_str(), "https://host:28183/jm/api/v1/session");

        let bare = with_trailing_slash(&Url::parse("https://host:28183").unwrap());
        assert_eq!(bare.as_str(), "https://host:28183/");
    }

    #[tokio::test]
    async fn verb_mismatch_is_rejected_before_any_request() {
        let transport =
            HttpTransport::new(&ClientConfig::default(), &TlsSettings::default(), SessionToken::default()).unwrap();

        let err = transport
            .get(RpcMethod::UnlockWallet, &[("walletname", "w.jmdat")], RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JmRpcError::InvalidOperation {
                method: RpcMethod::UnlockWallet,
                expected: Verb::Get
            }
        ));

        let err = transport
            .post(RpcMethod::Session, &[], Map::new(), RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, JmRpcError::InvalidOperation { .. }));
        assert_eq!(transport.id_count(), 0);
    }

    #[tokio::test]
    async fn template_errors_do_not_count_as_calls() {
        let transport =
            HttpTransport::new(&ClientConfig::default(), &TlsSettings::default(), SessionToken::default()).unwrap();

        let err = transport
            .get(RpcMethod::GetAddress, &[("walletname", "w.jmdat")], RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, JmRpcError::Template(_)));
        assert_eq!(transport.id_count(), 0);
    }

    #[tokio::test]
    async fn closed_transport_rejects_calls() {
        let transport =
            HttpTransport::new(&ClientConfig::default(), &TlsSettings::default(), SessionToken::default()).unwrap();
        transport.close();
        let err = transport
            .get(RpcMethod::Session, &[], RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, JmRpcError::ClientClosed));
    }
}
