//! Append-only transaction log.
//!
//! Every mutation of the vault is recorded as an immutable `Tx`.  Nothing
//! is ever edited or removed: an update is a Delete of the old snapshot
//! followed by an Add of the new one.  The current set of entries is
//! recovered by replaying the log in append order.
//!
//! Each `Tx` carries a content digest over
//! `kind ∥ timestamp ∥ title ∥ secret ∥ created_at ∥ updated_at`.
//! Digests are not chained, so the log alone does not detect reordering
//! or truncation.

use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::codec;
use super::entry::Entry;
use crate::errors::{Result, TxVaultError};

/// The operation a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Add,
    Delete,
}

impl TxKind {
    /// Wire code for this kind.
    pub const fn code(self) -> u8 {
        match self {
            Self::Add => 0x00,
            Self::Delete => 0x02,
        }
    }

    /// Map a wire code back to a kind.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::Add),
            0x02 => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Hash function used for transaction digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// SHA-1, 160-bit.
    #[default]
    Sha1,
    /// SHA-256.
    Sha256,
    /// MD5, 128-bit.
    Md5,
}

impl HashAlgorithm {
    /// Hash `data` in one shot.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Md5 => Md5::digest(data).to_vec(),
        }
    }

    /// Digest length in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Md5 => 16,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => f.write_str("sha1"),
            Self::Sha256 => f.write_str("sha256"),
            Self::Md5 => f.write_str("md5"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = TxVaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "md5" => Ok(Self::Md5),
            other => Err(TxVaultError::ConfigError(format!(
                "unknown hash '{other}' — expected 'sha1', 'sha256' or 'md5'"
            ))),
        }
    }
}

/// One immutable log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    /// Content digest (see module docs).
    pub digest: Vec<u8>,
    pub kind: TxKind,
    /// When the transaction was appended.
    pub timestamp: DateTime<Utc>,
    /// Snapshot of the entry the transaction applies to.
    pub payload: Entry,
}

impl Tx {
    /// The digest as lowercase hex.
    pub fn digest_hex(&self) -> String {
        hex::encode(&self.digest)
    }
}

/// Compute the digest for a transaction's content.
pub fn compute_digest(
    hash: HashAlgorithm,
    kind: TxKind,
    timestamp: DateTime<Utc>,
    entry: &Entry,
) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(1 + 8 * 3 + entry.title.len() + entry.secret.len());

    buf.push(kind.code());
    buf.extend_from_slice(&codec::to_nanos(timestamp)?.to_le_bytes());
    buf.extend_from_slice(entry.title.as_bytes());
    buf.extend_from_slice(entry.secret.as_bytes());
    buf.extend_from_slice(&codec::to_nanos(entry.created_at)?.to_le_bytes());
    buf.extend_from_slice(&codec::to_nanos(entry.updated_at)?.to_le_bytes());

    Ok(hash.digest(&buf))
}

/// The ordered, append-only sequence of transactions.
///
/// Guarded by its own reader/writer lock: appends, traversal and
/// serialization are each atomic.  A caller composing several of these
/// (the `Store`) must hold its own lock around the sequence, and always
/// acquire it before this one.
#[derive(Debug, Default)]
pub struct TxLog {
    hash: HashAlgorithm,
    txs: RwLock<Vec<Tx>>,
}

impl TxLog {
    /// An empty log using SHA-1 digests.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty log using the given digest function.
    pub fn with_hash(hash: HashAlgorithm) -> Self {
        Self {
            hash,
            txs: RwLock::new(Vec::new()),
        }
    }

    /// The digest function used for new transactions.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    /// Record that `entry` was added.
    pub fn append_add(&self, entry: Entry) -> Result<Tx> {
        self.append(TxKind::Add, entry)
    }

    /// Record that `entry` was deleted.
    pub fn append_delete(&self, entry: Entry) -> Result<Tx> {
        self.append(TxKind::Delete, entry)
    }

    /// Visit every transaction in append order.
    ///
    /// The read lock is held for the whole traversal, so `visit` must not
    /// append to this log.
    pub fn each<F>(&self, mut visit: F)
    where
        F: FnMut(&Tx),
    {
        for tx in self.read().iter() {
            visit(tx);
        }
    }

    /// Find the first transaction whose hex digest equals `digest_hex`
    /// (case-insensitive).
    pub fn find_by_digest(&self, digest_hex: &str) -> Option<Tx> {
        let wanted = hex::decode(digest_hex.trim()).ok()?;
        self.read().iter().find(|tx| tx.digest == wanted).cloned()
    }

    /// Snapshot of every transaction, in append order.
    pub fn list(&self) -> Vec<Tx> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Encode the whole log with the binary codec.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        codec::encode(&self.read())
    }

    /// Decode `bytes` and append every record to the log.
    ///
    /// Additive: records already in memory are kept, so repeated calls
    /// accumulate.  On a decode error nothing is appended.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<usize> {
        let decoded = codec::decode(bytes)?;
        let count = decoded.len();

        self.write().extend(decoded);
        debug!(records = count, "deserialized transaction log");

        Ok(count)
    }

    fn append(&self, kind: TxKind, entry: Entry) -> Result<Tx> {
        let timestamp = Utc::now();
        let digest = compute_digest(self.hash, kind, timestamp, &entry)?;

        let tx = Tx {
            digest,
            kind,
            timestamp,
            payload: entry,
        };

        self.write().push(tx.clone());
        Ok(tx)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Tx>> {
        self.txs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Tx>> {
        self.txs.write().unwrap_or_else(PoisonError::into_inner)
    }
}
