// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use serde::Serialize;
use serde_json::Value;

use super::schema::{Fields, Record};
use crate::error::DecodeError;

/// Wallet name the daemon reports when no wallet is loaded.
const NO_WALLET: &str = "None";

/// Reply to `session`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// True if and only if there is an active authentication and an unlocked wallet.
    pub session: bool,
    pub maker_running: bool,
    pub coinjoin_in_process: bool,
    /// Daemon-internal wallet name, or `"None"`.
    pub wallet_name: String,
    pub nickname: Option<String>,
    pub rescanning: Option<bool>,
    pub block_height: Option<u64>,
    pub offer_list: Option<Vec<Value>>,
}

impl Session {
    pub fn loaded_wallet(&self) -> Option<&str> {
        Some(self.wallet_name.as_str()).filter(|name| *name != NO_WALLET && !name.is_empty())
    }
}

impl Record for Session {
    const NAME: &'static str = "Session";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            session: fields.required("session")?,
            maker_running: fields.required("maker_running")?,
            coinjoin_in_process: fields.required("coinjoin_in_process")?,
            wallet_name: fields.required("wallet_name")?,
            nickname: fields.optional("nickname")?,
            rescanning: fields.optional("rescanning")?,
            block_height: fields.optional("block_height")?,
            offer_list: fields.optional("offer_list")?,
        })
    }
}

/// Reply to `maker-start` and `maker-stop`. Current daemons acknowledge
/// with an empty object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MakerStatus {
    pub wallet_name: Option<String>,
}

impl Record for MakerStatus {
    const NAME: &'static str = "MakerStatus";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            wallet_name: fields.optional("walletname")?,
        })
    }
}

/// Reply to `configget`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigGet {
    pub config_value: String,
}

impl Record for ConfigGet {
    const NAME: &'static str = "ConfigGet";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            config_value: fields.required("configvalue")?,
        })
    }
}

/// Reply to `configset`, which carries no fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSet {}

impl Record for ConfigSet {
    const NAME: &'static str = "ConfigSet";

    fn from_fields(_fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {})
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::decode;

    #[test]
    fn session_decodes_idle_daemon() {
        let record: Session = decode(&json!({
            "session": false,
            "maker_running": false,
            "coinjoin_in_process": false,
            "wallet_name": "None"
        }))
        .unwrap();
        assert!(!record.session);
        assert_eq!(record.loaded_wallet(), None);
        assert_eq!(record.block_height, None);
    }

    #[test]
    fn session_decodes_optional_fields() {
        let record: Session = decode(&json!({
            "session": true,
            "maker_running": true,
            "coinjoin_in_process": false,
            "wallet_name": "joinmarket-wallet-3a5f9c",
            "nickname": "J5xyz",
            "rescanning": false,
            "block_height": 812345,
            "offer_list": [{"oid": 0, "ordertype": "sw0reloffer"}]
        }))
        .unwrap();
        assert_eq!(record.loaded_wallet(), Some("joinmarket-wallet-3a5f9c"));
        assert_eq!(record.block_height, Some(812345));
        assert_eq!(record.offer_list.map(|o| o.len()), Some(1));
    }

    #[test]
    fn session_rejects_wrong_flag_type() {
        let err = decode::<Session>(&json!({
            "session": "yes",
            "maker_running": false,
            "coinjoin_in_process": false,
            "wallet_name": "None"
        }))
        .unwrap_err();
        assert_eq!(err.path, "session");
    }

    #[test]
    fn config_get_resolves_alias() {
        let record: ConfigGet = decode(&json!({"configvalue": "1.5"})).unwrap();
        assert_eq!(record.config_value, "1.5");
        assert_eq!(decode::<ConfigGet>(&json!({})).unwrap_err().path, "configvalue");
    }
}
