//! File-backed byte store with atomic replacement.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ByteStore;
use crate::errors::Result;

/// Stores the vault blob in a single file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty, owner-only file (and its parent directories).
    fn create_empty(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                restrict_permissions(parent, 0o700)?;
            }
        }

        fs::write(&self.path, b"")?;
        restrict_permissions(&self.path, 0o600)?;
        debug!(path = %self.path.display(), "created empty vault file");

        Ok(())
    }
}

impl ByteStore for FileStore {
    /// Read the file, creating it empty when it does not exist yet.
    fn read(&self) -> Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.create_empty()?;
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a temp file in the same directory, then rename it over
    /// the target so readers never see a half-written vault.
    fn write(&self, data: &[u8]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            restrict_permissions(parent, 0o700)?;
        }

        let tmp_path = parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ));

        fs::write(&tmp_path, data)?;
        restrict_permissions(&tmp_path, 0o600)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), bytes = data.len(), "wrote vault file");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
