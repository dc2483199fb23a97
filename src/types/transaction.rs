// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use serde::Serialize;

use super::schema::{Fields, Record};
use crate::error::DecodeError;

/// Human readable transaction as produced by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub hex: String,
    pub txid: String,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u64,
    pub version: u64,
}

impl Transaction {
    pub fn total_output_sats(&self) -> u64 {
        self.outputs
            .iter()
            .fold(0u64, |acc, o| acc.saturating_add(o.value_sats))
    }
}

impl Record for Transaction {
    const NAME: &'static str = "Transaction";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            hex: fields.required("hex")?,
            txid: fields.required("txid")?,
            inputs: fields.records("inputs")?,
            outputs: fields.records("outputs")?,
            lock_time: fields.required("nLockTime")?,
            version: fields.required("nVersion")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxInput {
    pub outpoint: String,
    pub script_sig: String,
    pub sequence: u64,
    pub witness: Option<String>,
}

impl Record for TxInput {
    const NAME: &'static str = "TxInput";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            outpoint: fields.required("outpoint")?,
            script_sig: fields.required("scriptSig")?,
            sequence: fields.required("nSequence")?,
            witness: fields.optional("witness")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOutput {
    pub value_sats: u64,
    pub script_pubkey: String,
    pub address: Option<String>,
}

impl Record for TxOutput {
    const NAME: &'static str = "TxOutput";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            value_sats: fields.required("value_sats")?,
            script_pubkey: fields.required("scriptPubKey")?,
            address: fields.optional("address")?,
        })
    }
}

/// Reply to `directsend`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectSend {
    pub wallet_name: Option<String>,
    pub tx_info: Transaction,
}

impl Record for DirectSend {
    const NAME: &'static str = "DirectSend";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            wallet_name: fields.optional("walletname")?,
            tx_info: fields.embedded("txinfo")?,
        })
    }
}

/// Reply to `docoinjoin`. Acceptance only; completion is announced on the
/// notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoCoinjoin {
    pub coinjoin_started: Option<bool>,
}

impl Record for DoCoinjoin {
    const NAME: &'static str = "DoCoinjoin";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            coinjoin_started: fields.optional("coinjoin_started")?,
        })
    }
}
