// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! High-level client for the JoinMarket wallet daemon.
//!
//! [`JmRpc`] is the primary interface of this crate. It wraps the HTTP
//! transport, the session state and the notification channel, and offers
//! one typed method per daemon operation.
//!
//! # Overview
//!
//! - Wallet management: list, create, unlock, lock, display
//! - Funds: new deposit addresses, UTXO listing, direct sends, coinjoins
//! - Services: session status, maker start/stop, daemon configuration
//! - Notifications: coinjoin progress and transaction events pushed over the
//!   websocket once a wallet has been created or unlocked
//!
//! # Example
//!
//! ```rust,no_run
//! use jmrpc::{JmRpc, config::ClientConfig};
//!
//! # async fn example() -> Result<(), jmrpc::JmRpcError> {
//! let client = JmRpc::new(&ClientConfig::default())?;
//!
//! let wallets = client.list_wallets().await?;
//! let name = &wallets.wallets[0];
//! client.unlock_wallet(name, "hunter2").await?;
//!
//! let address = client.get_address(name, 0).await?;
//! println!("Deposit to {}", address.address);
//!
//! client.close().await;
//! # Ok(())
//! # }
//! ```

use std::{fmt, sync::Arc, time::Duration};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use url::Url;

use crate::{
    config::ClientConfig,
    error::JmRpcError,
    http::{HttpTransport, RequestOptions, RouteArgs, RpcMethod},
    log::{mask_amount, mask_string},
    session::{SessionManager, SessionToken},
    tls::TlsSettings,
    types::{
        ConfigGet, ConfigSet, CreateWallet, DirectSend, DisplayWallet, DoCoinjoin, GetAddress, ListUtxos, ListWallets,
        LockWallet, MakerStatus, Record, Session, UnlockWallet, decode,
    },
    ws::{ChannelStatus, Message, NotificationChannel, NotificationStream},
};

/// Wallet flavours the daemon can create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletType {
    /// Native segwit (P2WPKH).
    #[default]
    #[serde(rename = "sw")]
    Segwit,
    /// Segwit nested in P2SH.
    #[serde(rename = "sw-legacy")]
    SegwitLegacy,
    /// Native segwit with fidelity bond support.
    #[serde(rename = "sw-fb")]
    SegwitFidelityBond,
}

impl WalletType {
    pub const fn as_str(self) -> &'static str {
        match self {
            WalletType::Segwit => "sw",
            WalletType::SegwitLegacy => "sw-legacy",
            WalletType::SegwitFidelityBond => "sw-fb",
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offer types a maker can advertise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Fee relative to the coinjoin amount.
    #[default]
    #[serde(rename = "sw0reloffer")]
    Relative,
    /// Fixed fee in satoshis.
    #[serde(rename = "sw0absoffer")]
    Absolute,
}

impl OrderType {
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderType::Relative => "sw0reloffer",
            OrderType::Absolute => "sw0absoffer",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Yield generator parameters for [`JmRpc::maker_start`].
///
/// The daemon expects every value as a string; fees are passed through
/// verbatim so that relative fees keep their decimal notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakerSettings {
    /// Contribution to the miner fee, in satoshis.
    pub tx_fee: String,
    /// Absolute coinjoin fee, in satoshis.
    pub cjfee_a: String,
    /// Relative coinjoin fee, as a decimal fraction (e.g. `0.0003`).
    pub cjfee_r: String,
    pub order_type: OrderType,
    /// Smallest coinjoin amount accepted, in satoshis.
    pub min_size: u64,
}

impl MakerSettings {
    fn to_body(&self) -> Result<Map<String, Value>, JmRpcError> {
        for (name, value) in [("txfee", &self.tx_fee), ("cjfee_a", &self.cjfee_a), ("cjfee_r", &self.cjfee_r)] {
            if value.trim().is_empty() {
                return Err(JmRpcError::InvalidArgument(format!("{} must not be empty", name)));
            }
        }
        Ok(body(json!({
            "txfee": self.tx_fee,
            "cjfee_a": self.cjfee_a,
            "cjfee_r": self.cjfee_r,
            "ordertype": self.order_type.as_str(),
            "minsize": self.min_size.to_string(),
        })))
    }
}

/// Typed client for a JoinMarket wallet daemon.
///
/// One instance talks to one daemon and holds at most one session. It is
/// `Send + Sync`; share it between tasks through an `Arc`.
///
/// # Session handling
///
/// [`create_wallet`](Self::create_wallet) and
/// [`unlock_wallet`](Self::unlock_wallet) return a bearer token. The client
/// adopts it automatically: later HTTP calls are authenticated with it and it
/// is forwarded over the notification channel, which is opened on demand.
/// If the channel cannot be opened the reply is still returned (it may carry
/// a seed phrase that is shown only once) and the failure is logged.
pub struct JmRpc {
    transport: HttpTransport,
    session: SessionManager,
    grace: Duration,
}

impl JmRpc {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the TLS trust material under
    /// `ssl_dir` cannot be loaded. No connection is made here.
    pub fn new(config: &ClientConfig) -> Result<Self, JmRpcError> {
        config.validate()?;
        let tls = TlsSettings::load(config)?;
        let token = SessionToken::default();
        let transport = HttpTransport::new(config, &tls, token.clone())?;
        let channel = Arc::new(NotificationChannel::new(
            config.ws_endpoint.clone(),
            tls,
            config.timeout(),
            config.shutdown_grace(),
            config.notification_buffer,
        ));
        debug!(
            endpoint:% = config.endpoint,
            ws_endpoint:% = config.ws_endpoint;
            "Client: Created"
        );
        Ok(Self {
            transport,
            session: SessionManager::new(token, channel),
            grace: config.shutdown_grace(),
        })
    }

    /// Base URL of the daemon's RPC interface.
    pub fn endpoint(&self) -> &Url {
        self.transport.base_url()
    }

    /// Number of HTTP calls issued by this client.
    pub fn id_count(&self) -> u64 {
        self.transport.id_count()
    }

    /// The underlying transport, for calls with [`RequestOptions`].
    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub async fn has_token(&self) -> bool {
        self.session.has_token().await
    }

    /// Name of the wallet the current token was issued for, if known.
    pub async fn wallet_name(&self) -> Option<String> {
        self.session.wallet_name().await
    }

    pub async fn channel_status(&self) -> ChannelStatus {
        self.session.channel_status().await
    }

    /// Lists wallet files known to the daemon.
    pub async fn list_wallets(&self) -> Result<ListWallets, JmRpcError> {
        self.get(RpcMethod::ListWallets, &[]).await
    }

    /// Creates a new wallet and adopts the token it is unlocked with.
    ///
    /// # Errors
    ///
    /// Fails with [`DaemonErrorKind::WalletAlreadyExists`] when the file
    /// exists and with [`DaemonErrorKind::LockExists`] when another wallet is
    /// unlocked.
    ///
    /// [`DaemonErrorKind::WalletAlreadyExists`]: crate::http::DaemonErrorKind::WalletAlreadyExists
    /// [`DaemonErrorKind::LockExists`]: crate::http::DaemonErrorKind::LockExists
    pub async fn create_wallet(
        &self,
        wallet_name: &str,
        password: &str,
        wallet_type: WalletType,
    ) -> Result<CreateWallet, JmRpcError> {
        require_wallet_name(wallet_name)?;
        require_non_empty("password", password)?;
        let request = body(json!({
            "walletname": wallet_name,
            "password": password,
            "wallettype": wallet_type.as_str(),
        }));
        let reply: CreateWallet = self.post(RpcMethod::CreateWallet, &[], request).await?;
        info!(wallet = &*reply.wallet_name, wallet_type:% = wallet_type; "Client: Wallet created");
        self.adopt_quietly(&reply.token, &reply.wallet_name).await;
        Ok(reply)
    }

    /// Unlocks an existing wallet and adopts the returned token.
    pub async fn unlock_wallet(&self, wallet_name: &str, password: &str) -> Result<UnlockWallet, JmRpcError> {
        require_wallet_name(wallet_name)?;
        let request = body(json!({ "password": password }));
        let reply: UnlockWallet = self
            .post(RpcMethod::UnlockWallet, &[("walletname", wallet_name)], request)
            .await?;
        info!(wallet = &*reply.wallet_name; "Client: Wallet unlocked");
        self.adopt_quietly(&reply.token, &reply.wallet_name).await;
        Ok(reply)
    }

    /// Locks the wallet. The token is kept; the daemon rejects it from now on.
    pub async fn lock_wallet(&self, wallet_name: &str) -> Result<LockWallet, JmRpcError> {
        require_wallet_name(wallet_name)?;
        self.get(RpcMethod::LockWallet, &[("walletname", wallet_name)]).await
    }

    pub async fn display_wallet(&self, wallet_name: &str) -> Result<DisplayWallet, JmRpcError> {
        require_wallet_name(wallet_name)?;
        self.get(RpcMethod::DisplayWallet, &[("walletname", wallet_name)]).await
    }

    /// Requests a fresh deposit address in `mixdepth`.
    pub async fn get_address(&self, wallet_name: &str, mixdepth: u32) -> Result<GetAddress, JmRpcError> {
        require_wallet_name(wallet_name)?;
        let mixdepth = mixdepth.to_string();
        self.get(
            RpcMethod::GetAddress,
            &[("walletname", wallet_name), ("mixdepth", &mixdepth)],
        )
        .await
    }

    pub async fn list_utxos(&self, wallet_name: &str) -> Result<ListUtxos, JmRpcError> {
        require_wallet_name(wallet_name)?;
        self.get(RpcMethod::ListUtxos, &[("walletname", wallet_name)]).await
    }

    /// Pays `amount_sats` from `mixdepth` to `destination` without a coinjoin.
    ///
    /// An `amount_sats` of zero is rejected locally. The daemon's sweep
    /// semantics for zero are not exposed.
    pub async fn direct_send(
        &self,
        wallet_name: &str,
        mixdepth: u32,
        amount_sats: u64,
        destination: &str,
    ) -> Result<DirectSend, JmRpcError> {
        require_wallet_name(wallet_name)?;
        require_positive_amount(amount_sats)?;
        require_non_empty("destination", destination)?;
        info!(
            wallet = wallet_name,
            mixdepth = mixdepth,
            amount = &*mask_amount(amount_sats),
            destination = &*mask_string(destination);
            "Client: Direct send"
        );
        let request = body(json!({
            "mixdepth": mixdepth,
            "amount_sats": amount_sats,
            "destination": destination,
        }));
        self.post(RpcMethod::DirectSend, &[("walletname", wallet_name)], request)
            .await
    }

    /// Starts a coinjoin as taker. The reply only acknowledges the start;
    /// progress arrives on the notification channel.
    pub async fn do_coinjoin(
        &self,
        wallet_name: &str,
        mixdepth: u32,
        amount_sats: u64,
        counterparties: u32,
        destination: &str,
    ) -> Result<DoCoinjoin, JmRpcError> {
        require_wallet_name(wallet_name)?;
        require_positive_amount(amount_sats)?;
        if counterparties == 0 {
            return Err(JmRpcError::InvalidArgument(
                "at least one counterparty is required".to_string(),
            ));
        }
        require_non_empty("destination", destination)?;
        info!(
            wallet = wallet_name,
            mixdepth = mixdepth,
            counterparties = counterparties,
            amount = &*mask_amount(amount_sats),
            destination = &*mask_string(destination);
            "Client: Coinjoin requested"
        );
        let request = body(json!({
            "mixdepth": mixdepth,
            "amount_sats": amount_sats,
            "counterparties": counterparties,
            "destination": destination,
        }));
        self.post(RpcMethod::DoCoinjoin, &[("walletname", wallet_name)], request)
            .await
    }

    /// Reports whether the daemon has an authenticated session and which
    /// services are running.
    pub async fn session(&self) -> Result<Session, JmRpcError> {
        self.get(RpcMethod::Session, &[]).await
    }

    pub async fn maker_start(&self, wallet_name: &str, settings: &MakerSettings) -> Result<MakerStatus, JmRpcError> {
        require_wallet_name(wallet_name)?;
        let request = settings.to_body()?;
        info!(wallet = wallet_name, order_type:% = settings.order_type; "Client: Starting maker");
        self.post(RpcMethod::MakerStart, &[("walletname", wallet_name)], request)
            .await
    }

    pub async fn maker_stop(&self, wallet_name: &str) -> Result<MakerStatus, JmRpcError> {
        require_wallet_name(wallet_name)?;
        self.get(RpcMethod::MakerStop, &[("walletname", wallet_name)]).await
    }

    /// Reads `section.field` from the daemon's configuration.
    pub async fn config_get(&self, wallet_name: &str, section: &str, field: &str) -> Result<ConfigGet, JmRpcError> {
        require_wallet_name(wallet_name)?;
        require_non_empty("section", section)?;
        require_non_empty("field", field)?;
        let request = body(json!({ "section": section, "field": field }));
        self.post(RpcMethod::ConfigGet, &[("walletname", wallet_name)], request)
            .await
    }

    /// Overrides `section.field` for the lifetime of the daemon process.
    pub async fn config_set(
        &self,
        wallet_name: &str,
        section: &str,
        field: &str,
        value: &str,
    ) -> Result<ConfigSet, JmRpcError> {
        require_wallet_name(wallet_name)?;
        require_non_empty("section", section)?;
        require_non_empty("field", field)?;
        let request = body(json!({ "section": section, "field": field, "value": value }));
        self.post(RpcMethod::ConfigSet, &[("walletname", wallet_name)], request)
            .await
    }

    /// Opens the notification channel without authenticating on it.
    pub async fn open_channel(&self) -> Result<(), JmRpcError> {
        self.session.channel().open().await
    }

    /// Takes the notification stream of the current connection.
    pub async fn receive(&self) -> Result<NotificationStream, JmRpcError> {
        self.session.channel().receive().await
    }

    /// Sends a text frame over the notification channel.
    pub async fn send(&self, text: &str) -> Result<(), JmRpcError> {
        self.session.channel().send(text).await
    }

    /// Sends a frame over the notification channel. Only text frames are
    /// accepted.
    pub async fn send_message(&self, message: Message) -> Result<(), JmRpcError> {
        self.session.channel().send_message(message).await
    }

    /// Installs a token obtained elsewhere, for example from an earlier run.
    ///
    /// The token is used for HTTP calls even when this returns
    /// [`JmRpcError::ChannelUnavailable`].
    pub async fn adopt_token(&self, token: &str) -> Result<(), JmRpcError> {
        require_non_empty("token", token)?;
        self.session.adopt(token, None).await
    }

    /// Shuts the client down: closes the notification channel, rejects
    /// further calls and waits the configured grace period.
    pub async fn close(&self) {
        if self.transport.is_closed() {
            return;
        }
        self.session.close().await;
        self.transport.close();
        tokio::time::sleep(self.grace).await;
        info!("Client: Closed");
    }

    async fn adopt_quietly(&self, token: &str, wallet_name: &str) {
        if let Err(e) = self.session.adopt(token, Some(wallet_name)).await {
            warn!(
                wallet = wallet_name,
                error:% = e;
                "Client: Token adopted for HTTP but notification channel is unavailable"
            );
        }
    }

    async fn get<R: Record>(&self, method: RpcMethod, args: &RouteArgs<'_>) -> Result<R, JmRpcError> {
        let reply = self.transport.get(method, args, RequestOptions::default()).await?;
        Ok(decode(&reply)?)
    }

    async fn post<R: Record>(
        &self,
        method: RpcMethod,
        args: &RouteArgs<'_>,
        request: Map<String, Value>,
    ) -> Result<R, JmRpcError> {
        let reply = self
            .transport
            .post(method, args, request, RequestOptions::default())
            .await?;
        Ok(decode(&reply)?)
    }
}

fn body(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn require_wallet_name(wallet_name: &str) -> Result<(), JmRpcError> {
    require_non_empty("wallet name", wallet_name)
}

fn require_non_empty(name: &str, value: &str) -> Result<(), JmRpcError> {
    if value.trim().is_empty() {
        return Err(JmRpcError::InvalidArgument(format!("{} must not be empty", name)));
    }
    Ok(())
}

fn require_positive_amount(amount_sats: u64) -> Result<(), JmRpcError> {
    if amount_sats == 0 {
        return Err(JmRpcError::InvalidArgument("amount_sats must be positive".to_string()));
    }
    Ok(())
}
