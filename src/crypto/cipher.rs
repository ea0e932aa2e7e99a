//! Block cipher selection and raw block operations.
//!
//! Two algorithms are supported, each identified on disk by a one-byte
//! tag:
//!
//! | tag    | algorithm | key     | block    |
//! |--------|-----------|---------|----------|
//! | `0x00` | DES       | 8 bytes | 8 bytes  |
//! | `0x01` | AES-256   | 32 bytes| 16 bytes |
//!
//! Blocks are encrypted independently (no chaining mode, no IV).  Identical
//! plaintext blocks therefore produce identical ciphertext; the envelope
//! keeps this framing for compatibility with existing vault files.

use std::fmt;
use std::str::FromStr;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes256;
use des::Des;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TxVaultError};

/// The block cipher used to encrypt a vault file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherAlgorithm {
    /// DES, 64-bit blocks.
    Des,
    /// AES-256, 128-bit blocks.
    Aes,
}

impl CipherAlgorithm {
    /// The tag byte written at offset 0 of the envelope.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Des => 0x00,
            Self::Aes => 0x01,
        }
    }

    /// Map a persisted tag byte back to an algorithm.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x00 => Some(Self::Des),
            0x01 => Some(Self::Aes),
            _ => None,
        }
    }

    /// Length of the raw key expected by the cipher.
    pub const fn key_len(self) -> usize {
        match self {
            Self::Des => 8,
            Self::Aes => 32,
        }
    }

    /// Cipher block size in bytes.
    pub const fn block_size(self) -> usize {
        match self {
            Self::Des => 8,
            Self::Aes => 16,
        }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Des => f.write_str("DES"),
            Self::Aes => f.write_str("AES-256"),
        }
    }
}

impl FromStr for CipherAlgorithm {
    type Err = TxVaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes" | "aes256" | "aes-256" => Ok(Self::Aes),
            "des" => Ok(Self::Des),
            other => Err(TxVaultError::ConfigError(format!(
                "unknown cipher '{other}' — expected 'aes' or 'des'"
            ))),
        }
    }
}

/// A keyed block cipher instance.
pub(crate) enum BlockCipher {
    Aes(Box<Aes256>),
    Des(Box<Des>),
}

impl BlockCipher {
    /// Key the cipher for `algorithm`.  Fails if `key` has the wrong length.
    pub(crate) fn new(algorithm: CipherAlgorithm, key: &[u8]) -> Result<Self> {
        let invalid = |_| {
            TxVaultError::InvalidKey(format!(
                "{algorithm} expects a {}-byte key, got {}",
                algorithm.key_len(),
                key.len()
            ))
        };

        match algorithm {
            CipherAlgorithm::Aes => Aes256::new_from_slice(key)
                .map(|c| Self::Aes(Box::new(c)))
                .map_err(invalid),
            CipherAlgorithm::Des => Des::new_from_slice(key)
                .map(|c| Self::Des(Box::new(c)))
                .map_err(invalid),
        }
    }

    pub(crate) fn algorithm(&self) -> CipherAlgorithm {
        match self {
            Self::Aes(_) => CipherAlgorithm::Aes,
            Self::Des(_) => CipherAlgorithm::Des,
        }
    }

    pub(crate) fn block_size(&self) -> usize {
        self.algorithm().block_size()
    }

    /// Encrypt `src` block by block.
    ///
    /// The final short block is zero-padded inside a fresh full-size
    /// buffer.  Empty input yields empty output.
    pub(crate) fn encrypt_padded(&self, src: &[u8]) -> Vec<u8> {
        let size = self.block_size();
        let mut dst = Vec::with_capacity(src.len().div_ceil(size) * size);

        for chunk in src.chunks(size) {
            let mut block = vec![0u8; size];
            block[..chunk.len()].copy_from_slice(chunk);
            self.encrypt_block(&mut block);
            dst.extend_from_slice(&block);
        }

        dst
    }

    /// Decrypt block-aligned ciphertext.  Padding is left in place.
    pub(crate) fn decrypt_blocks(&self, src: &[u8]) -> Result<Vec<u8>> {
        let size = self.block_size();
        if src.len() % size != 0 {
            return Err(TxVaultError::Serialization(format!(
                "encrypted payload of {} bytes is not a multiple of the {size}-byte block size",
                src.len()
            )));
        }

        let mut dst = src.to_vec();
        for block in dst.chunks_exact_mut(size) {
            self.decrypt_block(block);
        }

        Ok(dst)
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        match self {
            Self::Aes(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Des(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
        }
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        match self {
            Self::Aes(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Des(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
        }
    }
}

impl fmt::Debug for BlockCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BlockCipher").field(&self.algorithm()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip() {
        for alg in [CipherAlgorithm::Des, CipherAlgorithm::Aes] {
            assert_eq!(CipherAlgorithm::from_tag(alg.tag()), Some(alg));
        }
        assert_eq!(CipherAlgorithm::from_tag(0x02), None);
        assert_eq!(CipherAlgorithm::from_tag(0xFF), None);
    }

    #[test]
    fn parses_names() {
        assert_eq!("aes".parse::<CipherAlgorithm>().unwrap(), CipherAlgorithm::Aes);
        assert_eq!("DES".parse::<CipherAlgorithm>().unwrap(), CipherAlgorithm::Des);
        assert!("blowfish".parse::<CipherAlgorithm>().is_err());
    }

    #[test]
    fn rejects_wrong_key_length() {
        assert!(BlockCipher::new(CipherAlgorithm::Aes, &[0u8; 16]).is_err());
        assert!(BlockCipher::new(CipherAlgorithm::Des, &[0u8; 32]).is_err());
    }

    #[test]
    fn padded_encryption_is_block_aligned() {
        let cipher = BlockCipher::new(CipherAlgorithm::Aes, &[7u8; 32]).unwrap();
        assert!(cipher.encrypt_padded(b"").is_empty());
        assert_eq!(cipher.encrypt_padded(b"abc").len(), 16);
        assert_eq!(cipher.encrypt_padded(&[1u8; 16]).len(), 16);
        assert_eq!(cipher.encrypt_padded(&[1u8; 17]).len(), 32);
    }

    #[test]
    fn decrypt_restores_plaintext_with_zero_padding() {
        let cipher = BlockCipher::new(CipherAlgorithm::Des, &[3u8; 8]).unwrap();
        let ciphertext = cipher.encrypt_padded(b"hello world");
        let plaintext = cipher.decrypt_blocks(&ciphertext).unwrap();

        assert_eq!(plaintext.len(), 16);
        assert_eq!(&plaintext[..11], b"hello world");
        assert!(plaintext[11..].iter().all(|&b| b == 0));
    }

    #[test]
    fn identical_blocks_encrypt_identically() {
        let cipher = BlockCipher::new(CipherAlgorithm::Aes, &[9u8; 32]).unwrap();
        let ciphertext = cipher.encrypt_padded(&[0x41u8; 32]);
        assert_eq!(ciphertext[..16], ciphertext[16..]);
    }

    #[test]
    fn decrypt_rejects_unaligned_input() {
        let cipher = BlockCipher::new(CipherAlgorithm::Aes, &[9u8; 32]).unwrap();
        assert!(cipher.decrypt_blocks(&[0u8; 15]).is_err());
    }
}
