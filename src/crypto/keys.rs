//! A zeroize-on-drop holder for derived cipher keys.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::cipher::CipherAlgorithm;

/// Raw key bytes for a specific cipher, wiped from memory on drop.
///
/// Produced by [`derive_key`](super::kdf::derive_key); the length always
/// matches `algorithm.key_len()`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    #[zeroize(skip)]
    algorithm: CipherAlgorithm,
    bytes: Vec<u8>,
}

impl DerivedKey {
    /// Wrap raw key bytes produced for `algorithm`.
    pub fn new(algorithm: CipherAlgorithm, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    /// The cipher this key was derived for.
    pub fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    /// Access the raw key bytes (e.g. to key a block cipher).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("algorithm", &self.algorithm)
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
