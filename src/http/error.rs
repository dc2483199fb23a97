// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Classification of daemon error replies.
//!
//! The daemon signals failures with a non-success status and a fixed human
//! readable message. Depending on its revision that message is either the
//! whole response body or the `message` field of a JSON object. Both forms are
//! accepted: a JSON object with a string `message` is matched on that field,
//! anything else is matched on the trimmed body text.

use std::fmt::Display;

use serde_json::Value;

/// Failures the daemon reports by exact message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DaemonErrorKind {
    NotAuthorized,
    NoWalletFound,
    BackendNotReady,
    InvalidRequestFormat,
    ServiceAlreadyStarted,
    WalletAlreadyUnlocked,
    WalletAlreadyExists,
    LockExists,
    ConfigNotPresent,
    ServiceNotStarted,
    TransactionFailed,
}

impl DaemonErrorKind {
    pub const ALL: [DaemonErrorKind; 11] = [
        DaemonErrorKind::NotAuthorized,
        DaemonErrorKind::NoWalletFound,
        DaemonErrorKind::BackendNotReady,
        DaemonErrorKind::InvalidRequestFormat,
        DaemonErrorKind::ServiceAlreadyStarted,
        DaemonErrorKind::WalletAlreadyUnlocked,
        DaemonErrorKind::WalletAlreadyExists,
        DaemonErrorKind::LockExists,
        DaemonErrorKind::ConfigNotPresent,
        DaemonErrorKind::ServiceNotStarted,
        DaemonErrorKind::TransactionFailed,
    ];

    /// The exact message the daemon sends for this failure.
    pub const fn message(self) -> &'static str {
        match self {
            DaemonErrorKind::NotAuthorized => "Invalid credentials.",
            DaemonErrorKind::NoWalletFound => "No wallet loaded.",
            DaemonErrorKind::BackendNotReady => "Backend daemon not available",
            DaemonErrorKind::InvalidRequestFormat => "Invalid request format.",
            DaemonErrorKind::ServiceAlreadyStarted => "Service already started.",
            DaemonErrorKind::WalletAlreadyUnlocked => "Wallet already unlocked.",
            DaemonErrorKind::WalletAlreadyExists => "Wallet file cannot be overwritten.",
            DaemonErrorKind::LockExists => "Wallet cannot be created/opened, it is locked.",
            DaemonErrorKind::ConfigNotPresent => "Action cannot be performed, config vars are not set.",
            DaemonErrorKind::ServiceNotStarted => "Service cannot be stopped as it is not running.",
            DaemonErrorKind::TransactionFailed => "Transaction failed.",
        }
    }

    pub fn from_message(message: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.message() == message)
    }

    /// Classifies a raw error response body.
    pub fn from_body(body: &str) -> Option<Self> {
        let trimmed = body.trim();
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => match map.get("message") {
                Some(Value::String(message)) => Self::from_message(message),
                _ => None,
            },
            Ok(Value::String(message)) => Self::from_message(&message),
            _ => Self::from_message(trimmed),
        }
    }
}

impl Display for DaemonErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}
