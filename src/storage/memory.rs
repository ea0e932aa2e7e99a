//! In-memory byte store, mainly for tests.

use std::sync::{Arc, Mutex, PoisonError};

use super::ByteStore;
use crate::errors::Result;

/// A shared in-memory blob.  Clones share the same buffer, so a test can
/// keep one handle to inspect what the vault wrote through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with pre-existing contents.
    pub fn with_contents(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data.into())),
        }
    }

    /// Copy of the current contents.
    pub fn contents(&self) -> Vec<u8> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Overwrite the contents directly, bypassing any cipher.
    pub fn set_contents(&self, data: impl Into<Vec<u8>>) {
        *self.data.lock().unwrap_or_else(PoisonError::into_inner) = data.into();
    }
}

impl ByteStore for MemoryStore {
    fn read(&self) -> Result<Vec<u8>> {
        Ok(self.contents())
    }

    fn write(&self, data: &[u8]) -> Result<()> {
        self.set_contents(data);
        Ok(())
    }
}
