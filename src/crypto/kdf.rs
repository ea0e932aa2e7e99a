//! Password-based key derivation using PBKDF2-HMAC-SHA512.
//!
//! The salt is the SHA-512 digest of the password itself, so the same
//! password always yields the same key and nothing besides the vault file
//! has to be stored.  The trade-off is that equal passwords produce equal
//! keys across vaults and precomputation against common passwords is
//! possible; the password is the only secret material.

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use super::cipher::CipherAlgorithm;
use super::keys::DerivedKey;
use crate::errors::{Result, TxVaultError};

/// PBKDF2 iteration count.
pub const PBKDF2_ROUNDS: u32 = 4096;

/// Derive the key for `algorithm` from `password`.
///
/// Returns 32 bytes for AES-256 and 8 bytes for DES.
pub fn derive_key(password: &[u8], algorithm: CipherAlgorithm) -> Result<DerivedKey> {
    let bytes = derive_key_bytes(password, algorithm.key_len())?;
    Ok(DerivedKey::new(algorithm, bytes))
}

/// Derive `len` raw key bytes from `password`.
pub fn derive_key_bytes(password: &[u8], len: usize) -> Result<Vec<u8>> {
    if len == 0 {
        return Err(TxVaultError::KeyDerivationFailed(
            "requested key length must be non-zero".into(),
        ));
    }

    let mut salt = Sha512::digest(password);

    let mut key = vec![0u8; len];
    pbkdf2_hmac::<Sha512>(password, &salt, PBKDF2_ROUNDS, &mut key);
    salt.as_mut_slice().zeroize();

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_lengths_match_cipher() {
        let aes = derive_key(b"password", CipherAlgorithm::Aes).unwrap();
        let des = derive_key(b"password", CipherAlgorithm::Des).unwrap();
        assert_eq!(aes.as_bytes().len(), 32);
        assert_eq!(des.as_bytes().len(), 8);
        assert_eq!(aes.algorithm(), CipherAlgorithm::Aes);
    }

    #[test]
    fn derivation_is_deterministic() {
        let k1 = derive_key(b"same-password", CipherAlgorithm::Aes).unwrap();
        let k2 = derive_key(b"same-password", CipherAlgorithm::Aes).unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn different_passwords_give_different_keys() {
        let k1 = derive_key(b"password-one", CipherAlgorithm::Aes).unwrap();
        let k2 = derive_key(b"password-two", CipherAlgorithm::Aes).unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn short_key_is_prefix_of_long_key() {
        // PBKDF2 output blocks are independent of the requested length.
        let long = derive_key_bytes(b"pw", 32).unwrap();
        let short = derive_key_bytes(b"pw", 8).unwrap();
        assert_eq!(&long[..8], short.as_slice());
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(derive_key_bytes(b"pw", 0).is_err());
    }
}
