//! Typed records for daemon replies and notifications.
//!
//! Each reply shape is a plain struct implementing [`Record`]; [`decode`] is
//! the single entry point that validates a raw JSON document and constructs
//! the record, or fails with a [`DecodeError`](crate::DecodeError) naming the
//! offending field. Decoding is all-or-nothing.
//!
//! # Example
//!
//! ```rust
//! use jmrpc::types::{decode, ListWallets};
//! use serde_json::json;
//!
//! let reply: ListWallets = decode(&json!({"wallets": ["a.jmdat"]})).unwrap();
//! assert_eq!(reply.wallets, vec!["a.jmdat".to_string()]);
//! ```

mod notification;
mod schema;
mod service;
mod transaction;
mod utxo;
mod wallet;

pub use notification::{
    COINJOIN_STATE_MARKER, CoinjoinProgress, CoinjoinState, NotificationEvent, TransactionNotification,
};
pub use schema::{FieldValue, Fields, Record, decode, decode_str};
pub use service::{ConfigGet, ConfigSet, MakerStatus, Session};
pub use transaction::{DirectSend, DoCoinjoin, Transaction, TxInput, TxOutput};
pub use utxo::{ListUtxos, Utxo};
pub use wallet::{Account, Branch, CreateWallet, DisplayWallet, Entry, GetAddress, ListWallets, LockWallet, UnlockWallet, WalletInfo};
