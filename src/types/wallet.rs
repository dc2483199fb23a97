// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use serde::Serialize;

use super::schema::{Fields, Record};
use crate::error::DecodeError;

/// Reply to `listwallets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListWallets {
    /// Wallet file names in the daemon's `wallets` directory, `.jmdat`
    /// extension included.
    pub wallets: Vec<String>,
}

impl Record for ListWallets {
    const NAME: &'static str = "ListWallets";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            wallets: fields.required("wallets")?,
        })
    }
}

/// Reply to `createwallet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateWallet {
    pub wallet_name: String,
    pub token: String,
    /// BIP39 seed phrase of the new wallet. Shown once.
    pub seed_phrase: String,
    pub refresh_token: Option<String>,
    /// Whether another wallet was already unlocked. Older daemons omit it.
    pub already_loaded: Option<bool>,
}

impl Record for CreateWallet {
    const NAME: &'static str = "CreateWallet";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            wallet_name: fields.required("walletname")?,
            token: fields.required("token")?,
            seed_phrase: fields.required("seedphrase")?,
            refresh_token: fields.optional("refresh_token")?,
            already_loaded: fields.optional("already_loaded")?,
        })
    }
}

/// Reply to `unlockwallet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlockWallet {
    pub wallet_name: String,
    pub token: String,
    pub refresh_token: Option<String>,
    pub already_loaded: Option<bool>,
}

impl Record for UnlockWallet {
    const NAME: &'static str = "UnlockWallet";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            wallet_name: fields.required("walletname")?,
            token: fields.required("token")?,
            refresh_token: fields.optional("refresh_token")?,
            already_loaded: fields.optional("already_loaded")?,
        })
    }
}

/// Reply to `lockwallet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockWallet {
    pub wallet_name: String,
    /// False if a wallet was unlocked and has now been locked.
    pub already_locked: bool,
}

impl Record for LockWallet {
    const NAME: &'static str = "LockWallet";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            wallet_name: fields.required("walletname")?,
            already_locked: fields.required("already_locked")?,
        })
    }
}

/// Reply to `displaywallet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayWallet {
    pub wallet_name: String,
    pub wallet_info: WalletInfo,
}

impl Record for DisplayWallet {
    const NAME: &'static str = "DisplayWallet";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            wallet_name: fields.required("walletname")?,
            wallet_info: fields.record("walletinfo")?,
        })
    }
}

/// Wallet contents as a tree of accounts (mixdepths), branches and entries.
///
/// Balances are decimal BTC strings exactly as the daemon formats them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletInfo {
    pub wallet_name: String,
    pub total_balance: String,
    pub available_balance: Option<String>,
    pub accounts: Vec<Account>,
}

impl Record for WalletInfo {
    const NAME: &'static str = "WalletInfo";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            wallet_name: fields.required("wallet_name")?,
            total_balance: fields.required("total_balance")?,
            available_balance: fields.optional("available_balance")?,
            accounts: fields.records("accounts")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub account: String,
    pub account_balance: String,
    pub available_balance: Option<String>,
    pub branches: Vec<Branch>,
}

impl Record for Account {
    const NAME: &'static str = "Account";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            account: fields.required("account")?,
            account_balance: fields.required("account_balance")?,
            available_balance: fields.optional("available_balance")?,
            branches: fields.records("branches")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    /// Human readable branch description, e.g. `external addresses\tm/84'/1'/0'/0\ttpub...`.
    pub branch: String,
    pub balance: String,
    pub available_balance: Option<String>,
    pub entries: Vec<Entry>,
}

impl Record for Branch {
    const NAME: &'static str = "Branch";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            branch: fields.required("branch")?,
            balance: fields.required("balance")?,
            available_balance: fields.optional("available_balance")?,
            entries: fields.records("entries")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub hd_path: String,
    pub address: String,
    pub amount: String,
    /// `new`, `used`, `reused`, `cj-out`, `change-out`, `non-cj-change`, `deposit`...
    pub status: String,
    pub label: Option<String>,
    pub extradata: Option<String>,
}

impl Record for Entry {
    const NAME: &'static str = "Entry";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            hd_path: fields.required("hd_path")?,
            address: fields.required("address")?,
            amount: fields.required("amount")?,
            status: fields.required("status")?,
            label: fields.optional("label")?,
            extradata: fields.optional("extradata")?,
        })
    }
}

/// Reply to `getaddress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetAddress {
    /// First unused address on the external branch of the requested mixdepth.
    pub address: String,
}

impl Record for GetAddress {
    const NAME: &'static str = "GetAddress";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            address: fields.required("address")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::decode;

    fn display_wallet_json() -> serde_json::Value {
        json!({
            "walletname": "w.jmdat",
            "walletinfo": {
                "wallet_name": "JM wallet",
                "total_balance": "0.01000000",
                "available_balance": "0.01000000",
                "accounts": [{
                    "account": "0",
                    "account_balance": "0.01000000",
                    "branches": [{
                        "branch": "external addresses\tm/84'/1'/0'/0\ttpubDEG",
                        "balance": "0.01000000",
                        "entries": [{
                            "hd_path": "m/84'/1'/0'/0/0",
                            "address": "bcrt1qwpkxgm8d3tyzdph5ujcs8ut9w7am5m2ph2ryey",
                            "amount": "0.01000000",
                            "status": "deposit",
                            "label": "",
                            "extradata": ""
                        }]
                    }]
                }]
            }
        })
    }

    #[test]
    fn unlock_reports_already_loaded_when_present() {
        let record: UnlockWallet =
            decode(&json!({"walletname": "w.jmdat", "token": "t", "already_loaded": true})).unwrap();
        assert_eq!(record.already_loaded, Some(true));

        let record: UnlockWallet = decode(&json!({"walletname": "w.jmdat", "token": "t"})).unwrap();
        assert_eq!(record.already_loaded, None);

        let err = decode::<UnlockWallet>(&json!({"walletname": "w.jmdat", "token": "t", "already_loaded": "yes"}))
            .unwrap_err();
        assert_eq!(err.path, "already_loaded");
    }

    #[test]
    fn list_wallets_decodes_names() {
        let record: ListWallets = decode(&json!({"wallets": ["a.jmdat", "b.jmdat"]})).unwrap();
        assert_eq!(record.wallets, vec!["a.jmdat", "b.jmdat"]);
    }

    #[test]
    fn list_wallets_rejects_non_string_entries() {
        let err = decode::<ListWallets>(&json!({"wallets": ["a.jmdat", 3]})).unwrap_err();
        assert_eq!(err.path, "wallets[1]");
    }

    #[test]
    fn create_wallet_resolves_aliases() {
        let record: CreateWallet = decode(&json!({
            "walletname": "new.jmdat",
            "token": "tok",
            "seedphrase": "abandon abandon ability",
            "refresh_token": "refresh"
        }))
        .unwrap();
        assert_eq!(record.wallet_name, "new.jmdat");
        assert_eq!(record.seed_phrase, "abandon abandon ability");
        assert_eq!(record.refresh_token.as_deref(), Some("refresh"));
    }

    #[test]
    fn unlock_wallet_requires_token() {
        let err = decode::<UnlockWallet>(&json!({"walletname": "w.jmdat"})).unwrap_err();
        assert_eq!(err.record, "UnlockWallet");
        assert_eq!(err.path, "token");
    }

    #[test]
    fn client_names_are_not_accepted_on_the_wire() {
        let err = decode::<LockWallet>(&json!({"wallet_name": "w.jmdat", "already_locked": false})).unwrap_err();
        assert_eq!(err.path, "walletname");
    }

    #[test]
    fn display_wallet_decodes_tree() {
        let record: DisplayWallet = decode(&display_wallet_json()).unwrap();
        let account = &record.wallet_info.accounts[0];
        assert_eq!(account.account, "0");
        assert_eq!(account.available_balance, None);
        let entry = &account.branches[0].entries[0];
        assert_eq!(entry.hd_path, "m/84'/1'/0'/0/0");
        assert_eq!(entry.status, "deposit");
    }

    #[test]
    fn display_wallet_reports_nested_path() {
        let mut doc = display_wallet_json();
        doc["walletinfo"]["accounts"][0]["branches"][0]["entries"][0]
            .as_object_mut()
            .unwrap()
            .remove("amount");
        let err = decode::<DisplayWallet>(&doc).unwrap_err();
        assert_eq!(err.record, "DisplayWallet");
        assert_eq!(err.path, "walletinfo.accounts[0].branches[0].entries[0].amount");
    }
}
