// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    cli::ConnectionArgs,
    error::JmRpcError,
};

pub const DEFAULT_ENDPOINT: &str = "https://127.0.0.1:28183";
pub const DEFAULT_WS_ENDPOINT: &str = "wss://127.0.0.1:28283";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the daemon's HTTPS RPC interface.
    pub endpoint: Url,
    /// URL of the daemon's notification websocket.
    pub ws_endpoint: Url,
    /// Directory holding `cert.pem` (and optionally `key.pem`).
    pub ssl_dir: Option<PathBuf>,
    pub accept_invalid_hostnames: bool,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub user_agent: String,
    pub shutdown_grace_ms: u64,
    pub notification_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            ws_endpoint: Url::parse(DEFAULT_WS_ENDPOINT).expect("default websocket endpoint is a valid URL"),
            ssl_dir: None,
            accept_invalid_hostnames: false,
            timeout_secs: 30,
            max_retries: 0,
            user_agent: "jmrpc".to_string(),
            shutdown_grace_ms: 250,
            notification_buffer: 256,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    pub fn validate(&self) -> Result<(), JmRpcError> {
        if self.timeout_secs == 0 {
            return Err(JmRpcError::InvalidArgument("timeout_secs must be positive".to_string()));
        }
        if self.notification_buffer == 0 {
            return Err(JmRpcError::InvalidArgument(
                "notification_buffer must be positive".to_string(),
            ));
        }
        if !matches!(self.endpoint.scheme(), "http" | "https") {
            return Err(JmRpcError::InvalidArgument(format!(
                "endpoint must be an http(s) URL, got {}",
                self.endpoint
            )));
        }
        if !matches!(self.ws_endpoint.scheme(), "ws" | "wss") {
            return Err(JmRpcError::InvalidArgument(format!(
                "ws_endpoint must be a ws(s) URL, got {}",
                self.ws_endpoint
            )));
        }
        Ok(())
    }

    pub fn apply_connection(&mut self, args: &ConnectionArgs) {
        if let Some(endpoint) = &args.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(ws_endpoint) = &args.ws_endpoint {
            self.ws_endpoint = ws_endpoint.clone();
        }
        if let Some(ssl_dir) = &args.ssl_dir {
            self.ssl_dir = Some(ssl_dir.clone());
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        config.validate().unwrap();
        assert_eq!(config.endpoint.as_str(), "https://127.0.0.1:28183/");
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn rejects_wrong_schemes_and_zero_timeout() {
        let mut config = ClientConfig::default();
        config.ws_endpoint = Url::parse("https://127.0.0.1:28283").unwrap();
        assert!(matches!(config.validate(), Err(JmRpcError::InvalidArgument(_))));

        let mut config = ClientConfig::default();
        config.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(JmRpcError::InvalidArgument(_))));
    }
}
