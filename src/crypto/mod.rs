//! Cryptographic primitives for TxVault.
//!
//! This module provides:
//! - Block cipher selection and raw block operations (`cipher`)
//! - Deterministic PBKDF2 password-based key derivation (`kdf`)
//! - A zeroize-on-drop wrapper for derived keys (`keys`)
//! - The encrypted envelope wrapped around a byte store (`envelope`)

pub mod cipher;
pub mod envelope;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_key, CipherFs, CipherAlgorithm, ...};
pub use cipher::CipherAlgorithm;
pub use envelope::{CipherFs, EncryptedStorage};
pub use kdf::derive_key;
pub use keys::DerivedKey;
