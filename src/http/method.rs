// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Static registry of the daemon's RPC methods.
//!
//! Every supported operation is a variant of [`RpcMethod`]. Its HTTP verb,
//! route template and wire name are constant data; [`RpcMethod::resolve`]
//! turns the template into a request path.
//!
//! Route arguments are matched strictly: every `{placeholder}` must be
//! supplied and no argument may be supplied that the template does not name.

use std::fmt::Display;

use crate::error::TemplateError;

/// Version prefix shared by every route.
pub const API_VERSION_PREFIX: &str = "/api/v1";

/// Named values for a route's `{placeholder}`s.
pub type RouteArgs<'a> = [(&'a str, &'a str)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
}

impl Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verb::Get => write!(f, "GET"),
            Verb::Post => write!(f, "POST"),
        }
    }
}

impl From<Verb> for reqwest::Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
        }
    }
}

/// JoinMarket wallet daemon RPC methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    /// List currently available wallet files.
    ListWallets,
    /// Make a new wallet.
    CreateWallet,
    /// Open an existing wallet using a password.
    UnlockWallet,
    /// Stop the wallet service for the current wallet.
    LockWallet,
    /// Get the JSON representation of the wallet contents.
    DisplayWallet,
    /// Get a new address for deposits.
    GetAddress,
    /// List details of all utxos currently in the wallet.
    ListUtxos,
    /// Make a bitcoin payment from the wallet, without coinjoin.
    DirectSend,
    /// Initiate a coinjoin as taker.
    DoCoinjoin,
    /// Check the status and liveness of the session.
    Session,
    /// Start the yield generator (maker) service for the given wallet.
    MakerStart,
    /// Stop the maker service if it is currently running.
    MakerStop,
    /// Read a value from the daemon's configuration.
    ConfigGet,
    /// Change a value in the daemon's configuration for this session.
    ConfigSet,
}

impl RpcMethod {
    pub const ALL: [RpcMethod; 14] = [
        RpcMethod::ListWallets,
        RpcMethod::CreateWallet,
        RpcMethod::UnlockWallet,
        RpcMethod::LockWallet,
        RpcMethod::DisplayWallet,
        RpcMethod::GetAddress,
        RpcMethod::ListUtxos,
        RpcMethod::DirectSend,
        RpcMethod::DoCoinjoin,
        RpcMethod::Session,
        RpcMethod::MakerStart,
        RpcMethod::MakerStop,
        RpcMethod::ConfigGet,
        RpcMethod::ConfigSet,
    ];

    pub const fn verb(self) -> Verb {
        match self {
            RpcMethod::CreateWallet
            | RpcMethod::UnlockWallet
            | RpcMethod::DirectSend
            | RpcMethod::DoCoinjoin
            | RpcMethod::MakerStart
            | RpcMethod::ConfigGet
            | RpcMethod::ConfigSet => Verb::Post,
            RpcMethod::ListWallets
            | RpcMethod::LockWallet
            | RpcMethod::DisplayWallet
            | RpcMethod::GetAddress
            | RpcMethod::ListUtxos
            | RpcMethod::Session
            | RpcMethod::MakerStop => Verb::Get,
        }
    }

    /// Route template relative to [`API_VERSION_PREFIX`].
    pub const fn route(self) -> &'static str {
        match self {
            RpcMethod::ListWallets => "/wallet/all",
            RpcMethod::CreateWallet => "/wallet/create",
            RpcMethod::UnlockWallet => "/wallet/{walletname}/unlock",
            RpcMethod::LockWallet => "/wallet/{walletname}/lock",
            RpcMethod::DisplayWallet => "/wallet/{walletname}/display",
            RpcMethod::GetAddress => "/wallet/{walletname}/address/new/{mixdepth}",
            RpcMethod::ListUtxos => "/wallet/{walletname}/utxos",
            RpcMethod::DirectSend => "/wallet/{walletname}/taker/direct-send",
            RpcMethod::DoCoinjoin => "/wallet/{walletname}/taker/coinjoin",
            RpcMethod::Session => "/session",
            RpcMethod::MakerStart => "/wallet/{walletname}/maker/start",
            RpcMethod::MakerStop => "/wallet/{walletname}/maker/stop",
            RpcMethod::ConfigGet => "/wallet/{walletname}/configget",
            RpcMethod::ConfigSet => "/wallet/{walletname}/configset",
        }
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            RpcMethod::ListWallets => "listwallets",
            RpcMethod::CreateWallet => "createwallet",
            RpcMethod::UnlockWallet => "unlockwallet",
            RpcMethod::LockWallet => "lockwallet",
            RpcMethod::DisplayWallet => "displaywallet",
            RpcMethod::GetAddress => "getaddress",
            RpcMethod::ListUtxos => "listutxos",
            RpcMethod::DirectSend => "directsend",
            RpcMethod::DoCoinjoin => "docoinjoin",
            RpcMethod::Session => "session",
            RpcMethod::MakerStart => "maker-start",
            RpcMethod::MakerStop => "maker-stop",
            RpcMethod::ConfigGet => "configget",
            RpcMethod::ConfigSet => "configset",
        }
    }

    /// Names of the placeholders in [`route`](Self::route), in order.
    pub fn placeholders(self) -> impl Iterator<Item = &'static str> {
        self.route()
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
    }

    /// Fills the route template and returns the full request path,
    /// including [`API_VERSION_PREFIX`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use jmrpc::http::RpcMethod;
    ///
    /// let path = RpcMethod::GetAddress
    ///     .resolve(&[("walletname", "w.jmdat"), ("mixdepth", "0")])
    ///     .unwrap();
    /// assert_eq!(path, "/api/v1/wallet/w.jmdat/address/new/0");
    /// ```
    pub fn resolve(self, args: &RouteArgs<'_>) -> Result<String, TemplateError> {
        let template = self.route();

        for (name, value) in args {
            if !self.placeholders().any(|p| p == *name) {
                return Err(TemplateError::UnknownArgument {
                    template,
                    name: name.to_string(),
                });
            }
            if !is_plain_segment(value) {
                return Err(TemplateError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }

        let mut path = String::with_capacity(API_VERSION_PREFIX.len() + template.len());
        path.push_str(API_VERSION_PREFIX);
        for segment in template.split('/').skip(1) {
            path.push('/');
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    let value = args
                        .iter()
                        .find(|(n, _)| *n == name)
                        .map(|(_, v)| *v)
                        .ok_or_else(|| TemplateError::MissingArgument {
                            template,
                            name: name.to_string(),
                        })?;
                    path.push_str(value);
                },
                None => path.push_str(segment),
            }
        }
        Ok(path)
    }
}

/// A value that stays a single literal path segment once joined and
/// normalised: no separators, no dot segments, no percent escapes.
fn is_plain_segment(value: &str) -> bool {
    !value.is_empty() && value != "." && value != ".." && !value.contains(['/', '\\', '?', '#', '%'])
}

impl Display for RpcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}
