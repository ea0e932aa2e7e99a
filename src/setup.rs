//! Wiring: pick a cipher, derive the key and open a `Store`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::crypto::{derive_key, CipherAlgorithm, CipherFs, EncryptedStorage};
use crate::errors::{Result, TxVaultError};
use crate::storage::{ByteStore, FileStore};
use crate::vault::{HashAlgorithm, Store, TxLog};

/// Cipher used for a brand-new (empty) vault when none is named.
pub const DEFAULT_CIPHER: CipherAlgorithm = CipherAlgorithm::Aes;

/// A store persisted to a file on disk.
pub type FileVault = Store<CipherFs<FileStore>>;

/// How the cipher for a vault is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherSelection {
    /// Follow the tag byte of the existing file, or [`DEFAULT_CIPHER`] if
    /// the file is empty.
    #[default]
    Auto,
    /// Use this algorithm; a file written with another one is rejected.
    Named(CipherAlgorithm),
}

impl CipherSelection {
    /// Resolve to a concrete algorithm by sniffing `store`'s tag byte.
    pub fn resolve(self, store: &impl ByteStore) -> Result<CipherAlgorithm> {
        match self {
            Self::Named(alg) => Ok(alg),
            Self::Auto => {
                let data = store.read()?;
                match data.first() {
                    None => Ok(DEFAULT_CIPHER),
                    Some(&tag) => {
                        CipherAlgorithm::from_tag(tag).ok_or(TxVaultError::UnsupportedCipher(tag))
                    }
                }
            }
        }
    }
}

impl fmt::Display for CipherSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Named(alg) => write!(f, "{alg}"),
        }
    }
}

impl FromStr for CipherSelection {
    type Err = TxVaultError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse().map(Self::Named)
    }
}

/// Open the vault stored in the file at `path`.
///
/// The file (and its parent directories) are created empty if missing.
pub fn open_store(
    path: &Path,
    password: &[u8],
    selection: CipherSelection,
    hash: HashAlgorithm,
) -> Result<FileVault> {
    open_with_store(FileStore::new(path), password, selection, hash)
}

/// Open a vault over any byte store.
///
/// Fails with `UnsupportedCipher`, `CipherMismatch` or `InvalidSecret` if
/// the persisted envelope does not match the selection and password.
pub fn open_with_store<S: ByteStore>(
    store: S,
    password: &[u8],
    selection: CipherSelection,
    hash: HashAlgorithm,
) -> Result<Store<CipherFs<S>>> {
    let algorithm = selection.resolve(&store)?;
    debug!(cipher = %algorithm, %selection, %hash, "opening vault");

    let key = derive_key(password, algorithm)?;
    let fs = CipherFs::new(&key, store)?;

    match fs.verify_cipher() {
        Ok(()) | Err(TxVaultError::EmptyStore) => {}
        Err(e) => return Err(e),
    }

    Store::new(fs, TxLog::with_hash(hash))
}
