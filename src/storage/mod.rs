//! Raw byte storage underneath the cipher envelope.
//!
//! A `ByteStore` reads and writes one opaque blob.  The vault always
//! rewrites the whole blob; there is no incremental append.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::errors::Result;

/// Whole-blob persistence for an encrypted vault.
pub trait ByteStore {
    /// Read the full contents.  A store that has never been written
    /// returns an empty buffer.
    fn read(&self) -> Result<Vec<u8>>;

    /// Replace the full contents with `data`.
    fn write(&self, data: &[u8]) -> Result<()>;
}
