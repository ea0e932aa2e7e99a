use thiserror::Error;

use crate::crypto::CipherAlgorithm;

/// All errors that can occur in TxVault.
#[derive(Debug, Error)]
pub enum TxVaultError {
    // --- Cipher envelope errors ---
    /// Nothing has been persisted yet. Callers treat this as a first run.
    #[error("Storage is empty — no vault has been written yet")]
    EmptyStore,

    #[error("Unsupported cipher tag 0x{0:02x}")]
    UnsupportedCipher(u8),

    #[error("Cipher mismatch — vault was written with {found}, but {expected} was selected")]
    CipherMismatch {
        expected: CipherAlgorithm,
        found: CipherAlgorithm,
    },

    #[error("Invalid secret — wrong password for this vault")]
    InvalidSecret,

    // --- Crypto errors ---
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Store errors ---
    #[error("Entry '{0}' not found")]
    NotFound(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for TxVault results.
pub type Result<T> = std::result::Result<T, TxVaultError>;
