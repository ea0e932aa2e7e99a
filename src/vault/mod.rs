//! Vault module: the transaction log and the view built from it.
//!
//! This module provides:
//! - `Entry`, `EntryChange` and `EntryRef` types (`entry`)
//! - The append-only `TxLog` and its content digests (`tx`)
//! - Binary encoding of the log (`codec`)
//! - The materialized `Store` over encrypted storage (`store`)

pub mod codec;
pub mod entry;
pub mod store;
pub mod tx;

// Re-export the most commonly used items.
pub use entry::{Entry, EntryChange, EntryRef};
pub use store::{replay, Store};
pub use tx::{compute_digest, HashAlgorithm, Tx, TxKind, TxLog};
