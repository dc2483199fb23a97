// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Bearer token lifecycle shared by the HTTP transport and the notification
//! channel.
//!
//! The daemon issues a token when a wallet is created or unlocked. It stays
//! valid until the daemon restarts or another wallet is unlocked, so the
//! client never expires it locally.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{Mutex, RwLock};

use crate::{
    error::JmRpcError,
    log::mask_string,
    ws::{ChannelStatus, NotificationChannel},
};

/// The current bearer token, readable as a consistent snapshot from any task.
#[derive(Debug, Clone, Default)]
pub struct SessionToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SessionToken {
    pub async fn snapshot(&self) -> Option<String> {
        self.inner.read().await.clone()
    }

    pub async fn is_held(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Stores `token`, returning true if it differs from the one held.
    async fn replace(&self, token: &str) -> bool {
        let mut guard = self.inner.write().await;
        if guard.as_deref() == Some(token) {
            return false;
        }
        *guard = Some(token.to_string());
        true
    }

    async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

/// Owns the session state of one client: token, wallet name and the
/// notification channel the token is forwarded to.
pub struct SessionManager {
    token: SessionToken,
    wallet_name: RwLock<Option<String>>,
    channel: Arc<NotificationChannel>,
    adoption: Mutex<()>,
}

impl SessionManager {
    pub fn new(token: SessionToken, channel: Arc<NotificationChannel>) -> Self {
        Self {
            token,
            wallet_name: RwLock::new(None),
            channel,
            adoption: Mutex::new(()),
        }
    }

    pub async fn has_token(&self) -> bool {
        self.token.is_held().await
    }

    pub async fn wallet_name(&self) -> Option<String> {
        self.wallet_name.read().await.clone()
    }

    pub async fn channel_status(&self) -> ChannelStatus {
        self.channel.status().await
    }

    pub fn channel(&self) -> &Arc<NotificationChannel> {
        &self.channel
    }

    /// Installs `token` for subsequent HTTP calls and forwards it over the
    /// notification channel, opening the channel first if needed.
    ///
    /// The token is held for HTTP purposes as soon as this is called. Only a
    /// failure to establish the channel is reported; a failed send on an
    /// established channel is logged. Adopting the same token again only
    /// re-sends it.
    pub async fn adopt(&self, token: &str, wallet_name: Option<&str>) -> Result<(), JmRpcError> {
        let _serialized = self.adoption.lock().await;

        if self.token.replace(token).await {
            info!(token = &*mask_string(token); "Session: Adopted new bearer token");
        } else {
            debug!("Session: Bearer token unchanged");
        }
        if let Some(name) = wallet_name {
            *self.wallet_name.write().await = Some(name.to_string());
        }

        self.channel.open().await?;
        if let Err(e) = self.channel.send(token).await {
            warn!(error:% = e; "Session: Could not forward token to notification channel");
        }
        Ok(())
    }

    /// Drops the token and wallet name and closes the notification channel.
    pub async fn close(&self) {
        let _serialized = self.adoption.lock().await;
        self.channel.close().await;
        self.token.clear().await;
        *self.wallet_name.write().await = None;
    }
}
