// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Payloads pushed by the daemon over the notification websocket.
//!
//! Two disjoint shapes exist. Coinjoin progress frames carry a
//! `coinjoin_state` marker; every other frame announces a transaction.

use serde::Serialize;
use serde_json::Value;

use super::{
    schema::{Fields, Record, decode},
    transaction::Transaction,
};
use crate::error::DecodeError;

/// Field present only in coinjoin progress frames.
pub const COINJOIN_STATE_MARKER: &str = "coinjoin_state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoinjoinState {
    TakerRunning,
    MakerRunning,
    NotRunning,
}

impl CoinjoinState {
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(CoinjoinState::TakerRunning),
            1 => Some(CoinjoinState::MakerRunning),
            2 => Some(CoinjoinState::NotRunning),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinjoinProgress {
    pub coinjoin_state: CoinjoinState,
}

impl Record for CoinjoinProgress {
    const NAME: &'static str = "CoinjoinProgress";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        let code: u64 = fields.required(COINJOIN_STATE_MARKER)?;
        let coinjoin_state = CoinjoinState::from_code(code).ok_or_else(|| {
            DecodeError::new(
                Self::NAME,
                COINJOIN_STATE_MARKER,
                format!("unknown coinjoin state {}", code),
            )
        })?;
        Ok(Self { coinjoin_state })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionNotification {
    pub txid: String,
    pub tx_details: Transaction,
}

impl Record for TransactionNotification {
    const NAME: &'static str = "TransactionNotification";

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            txid: fields.required("txid")?,
            tx_details: fields.record("txdetails")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    CoinjoinProgress(CoinjoinProgress),
    Transaction(TransactionNotification),
}

impl NotificationEvent {
    /// Classifies a parsed frame by the coinjoin state marker and decodes it
    /// with the matching schema.
    pub fn classify(value: &Value) -> Result<Self, DecodeError> {
        let is_progress = value
            .as_object()
            .is_some_and(|map| map.contains_key(COINJOIN_STATE_MARKER));
        if is_progress {
            decode(value).map(NotificationEvent::CoinjoinProgress)
        } else {
            decode(value).map(NotificationEvent::Transaction)
        }
    }

    /// Parses and classifies a text frame.
    pub fn from_text(text: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| DecodeError::new("NotificationEvent", "", format!("invalid JSON: {}", e)))?;
        Self::classify(&value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::transaction::tests::transaction_json;

    #[test]
    fn marker_selects_coinjoin_progress() {
        let event = NotificationEvent::from_text(r#"{"coinjoin_state": 0}"#).unwrap();
        assert_eq!(
            event,
            NotificationEvent::CoinjoinProgress(CoinjoinProgress {
                coinjoin_state: CoinjoinState::TakerRunning
            })
        );
    }

    #[test]
    fn frame_without_marker_is_a_transaction() {
        let frame = json!({"txid": "9c8d", "txdetails": transaction_json()});
        match NotificationEvent::classify(&frame).unwrap() {
            NotificationEvent::Transaction(tx) => {
                assert_eq!(tx.txid, "9c8d");
                assert_eq!(tx.tx_details.outputs.len(), 2);
            },
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn marker_frame_is_never_decoded_as_transaction() {
        let frame = json!({"coinjoin_state": 7, "txid": "9c8d", "txdetails": transaction_json()});
        let err = NotificationEvent::classify(&frame).unwrap_err();
        assert_eq!(err.record, "CoinjoinProgress");
        assert_eq!(err.path, COINJOIN_STATE_MARKER);
    }

    #[test]
    fn malformed_frames_fail() {
        assert!(NotificationEvent::from_text("not json").is_err());
        let err = NotificationEvent::from_text(r#"{"txid": "9c8d"}"#).unwrap_err();
        assert_eq!(err.record, "TransactionNotification");
        assert_eq!(err.path, "txdetails");
    }
}
