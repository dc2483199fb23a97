// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use serde::Serialize;

use super::schema::{Fields, Record};
use crate::error::DecodeError;

/// Reply to `listutxos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListUtxos {
    pub utxos: Vec<Utxo>,
}

impl ListUtxos {
    pub fn in_mixdepth(&self, mixdepth: u32) -> impl Iterator<Item = &Utxo> {
        self.utxos.iter().filter(move |u| u.mixdepth == mixdepth)
    }

    /// Sum of all unfrozen coins, in satoshis.
    pub fn spendable_sats(&self) -> u64 {
        self.utxos
            .iter()
            .filter(|u| !u.frozen)
            .fold(0u64, |acc, u| acc.saturating_add(u.value))
    }
}

impl Record for ListUtxos {
    const NAME: &'static str = "ListUtxos";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            utxos: fields.records("utxos")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utxo {
    /// Outpoint as `txid:vout`.
    pub utxo: String,
    pub address: String,
    /// Value in satoshis.
    pub value: u64,
    pub tries: u64,
    pub tries_remaining: u64,
    pub external: bool,
    pub mixdepth: u32,
    pub confirmations: i64,
    pub frozen: bool,
    pub path: Option<String>,
    pub label: Option<String>,
    /// Set for fidelity bond outputs.
    pub locktime: Option<String>,
}

impl Record for Utxo {
    const NAME: &'static str = "Utxo";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            utxo: fields.required("utxo")?,
            address: fields.required("address")?,
            value: fields.required("value")?,
            tries: fields.required("tries")?,
            tries_remaining: fields.required("tries_remaining")?,
            external: fields.required("external")?,
            mixdepth: fields.required("mixdepth")?,
            confirmations: fields.required("confirmations")?,
            frozen: fields.required("frozen")?,
            path: fields.optional("path")?,
            label: fields.optional("label")?,
            locktime: fields.optional("locktime")?,
        })
    }
}
