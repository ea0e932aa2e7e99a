//! Encrypted envelope wrapped around a byte store.
//!
//! Layout of the persisted blob:
//!
//! ```text
//! [tag: 1 byte][verification block: 1 cipher block][encrypted payload: N blocks]
//! ```
//!
//! - **Tag**: the cipher algorithm (`0x00` DES, `0x01` AES-256).
//! - **Verification block**: a fixed phrase, zero-padded to one block and
//!   encrypted with the current key.  Re-encrypting the phrase and comparing
//!   tells us whether the key is right before any payload is trusted.
//! - **Payload**: the plaintext encrypted block by block, last block
//!   zero-padded.  The padding length is not recorded, so the plaintext
//!   encoding must be self-delimiting.

use subtle::ConstantTimeEq;
use tracing::debug;

use super::cipher::{BlockCipher, CipherAlgorithm};
use super::keys::DerivedKey;
use crate::errors::{Result, TxVaultError};
use crate::storage::ByteStore;

/// Known plaintext encrypted into the verification block.
pub const VERIFICATION_PHRASE: &[u8] = b"testphrase";

/// Size of the tag prefix.
const TAG_LEN: usize = 1;

/// Encrypted whole-blob storage, as seen by the vault.
pub trait EncryptedStorage {
    /// Verify the envelope and return the decrypted payload.
    ///
    /// An empty store is not an error here: it yields an empty buffer.
    fn open(&self) -> Result<Vec<u8>>;

    /// Encrypt `plaintext` and replace the stored envelope.
    fn write(&self, plaintext: &[u8]) -> Result<()>;

    /// Check the stored tag and verification block against this instance.
    ///
    /// Fails with `EmptyStore` when nothing has been persisted yet.
    fn verify_cipher(&self) -> Result<()>;
}

/// Block-cipher envelope over any [`ByteStore`].
pub struct CipherFs<S> {
    cipher: BlockCipher,
    store: S,
}

impl<S: ByteStore> CipherFs<S> {
    /// Build an envelope keyed with `key`.
    ///
    /// The algorithm is taken from the key.
    pub fn new(key: &DerivedKey, store: S) -> Result<Self> {
        let cipher = BlockCipher::new(key.algorithm(), key.as_bytes())?;
        Ok(Self { cipher, store })
    }

    /// Build an envelope from raw key bytes for an explicit algorithm.
    pub fn with_raw_key(algorithm: CipherAlgorithm, key: &[u8], store: S) -> Result<Self> {
        let cipher = BlockCipher::new(algorithm, key)?;
        Ok(Self { cipher, store })
    }

    /// The algorithm this envelope writes and expects.
    pub fn algorithm(&self) -> CipherAlgorithm {
        self.cipher.algorithm()
    }

    /// The underlying byte store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The phrase, truncated or zero-padded to one block, then encrypted.
    fn verification_block(&self) -> Vec<u8> {
        let size = self.cipher.block_size();
        let phrase = &VERIFICATION_PHRASE[..VERIFICATION_PHRASE.len().min(size)];
        self.cipher.encrypt_padded(phrase)
    }

    /// Validate an envelope that is known to be non-empty.
    fn verify_envelope(&self, data: &[u8]) -> Result<()> {
        let tag = data[0];
        let found = CipherAlgorithm::from_tag(tag).ok_or(TxVaultError::UnsupportedCipher(tag))?;

        let expected = self.algorithm();
        if found != expected {
            return Err(TxVaultError::CipherMismatch { expected, found });
        }

        let size = self.cipher.block_size();
        if data.len() < TAG_LEN + size {
            return Err(TxVaultError::Serialization(format!(
                "truncated envelope: {} bytes, need at least {}",
                data.len(),
                TAG_LEN + size
            )));
        }

        let stored = &data[TAG_LEN..TAG_LEN + size];
        let local = self.verification_block();
        if bool::from(local.as_slice().ct_eq(stored)) {
            Ok(())
        } else {
            Err(TxVaultError::InvalidSecret)
        }
    }
}

impl<S: ByteStore> EncryptedStorage for CipherFs<S> {
    fn open(&self) -> Result<Vec<u8>> {
        let data = self.store.read()?;
        if data.is_empty() {
            debug!(cipher = %self.algorithm(), "vault storage is empty");
            return Ok(Vec::new());
        }

        self.verify_envelope(&data)?;

        let payload = &data[TAG_LEN + self.cipher.block_size()..];
        let plaintext = self.cipher.decrypt_blocks(payload)?;
        debug!(
            cipher = %self.algorithm(),
            bytes = plaintext.len(),
            "decrypted vault payload"
        );

        Ok(plaintext)
    }

    fn write(&self, plaintext: &[u8]) -> Result<()> {
        let verification = self.verification_block();
        let payload = self.cipher.encrypt_padded(plaintext);

        let mut buf = Vec::with_capacity(TAG_LEN + verification.len() + payload.len());
        buf.push(self.algorithm().tag());
        buf.extend_from_slice(&verification);
        buf.extend_from_slice(&payload);

        self.store.write(&buf)
    }

    fn verify_cipher(&self) -> Result<()> {
        let data = self.store.read()?;
        if data.is_empty() {
            return Err(TxVaultError::EmptyStore);
        }

        self.verify_envelope(&data)
    }
}

impl<S> std::fmt::Debug for CipherFs<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherFs")
            .field("cipher", &self.cipher)
            .finish_non_exhaustive()
    }
}
