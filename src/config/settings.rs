use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Result, TxVaultError};
use crate::setup::CipherSelection;
use crate::vault::HashAlgorithm;

/// User-level configuration, loaded from `settings.toml`.
///
/// Every field has a sensible default so TxVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file location.  `~/` is expanded against the home directory;
    /// unset means `~/.txvault/db.bin`.
    #[serde(default)]
    pub storage_file: Option<String>,

    /// Cipher for the vault file: "auto", "aes" or "des".
    #[serde(default = "default_cipher")]
    pub cipher: String,

    /// Transaction digest: "sha1", "sha256" or "md5".
    #[serde(default = "default_hash")]
    pub hash: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_cipher() -> String {
    "auto".to_string()
}

fn default_hash() -> String {
    "sha1".to_string()
}

/// Written on first run so users can discover the knobs.
const TEMPLATE: &str = r#"# TxVault settings

# Vault file. Defaults to ~/.txvault/db.bin
# storage_file = "~/.txvault/db.bin"

# Cipher for the vault file: "auto" (follow the existing file, AES for a
# new one), "aes" or "des".
cipher = "auto"

# Transaction digest: "sha1", "sha256" or "md5".
hash = "sha1"
"#;

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_file: None,
            cipher: default_cipher(),
            hash: default_hash(),
        }
    }
}

impl Settings {
    /// Name of the config file inside the config directory.
    pub const FILE_NAME: &'static str = "settings.toml";

    /// Load settings from `explicit`, or from the default location.
    ///
    /// An explicit path that does not exist yields defaults.  A missing
    /// default file is bootstrapped from a commented template.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let Some(dir) = default_config_dir() else {
            debug!("no home directory; using default settings");
            return Ok(Self::default());
        };

        let path = dir.join(Self::FILE_NAME);
        if !path.exists() {
            Self::bootstrap(&path)?;
        }
        Self::load_from(&path)
    }

    /// Load settings from `path`; a missing file yields defaults.
    ///
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            TxVaultError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Write the commented default template to `path`.
    pub fn bootstrap(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            create_private_dir(parent)?;
        }
        std::fs::write(path, TEMPLATE)?;

        debug!(path = %path.display(), "wrote default settings");
        Ok(())
    }

    /// Resolve the vault file path.
    pub fn storage_path(&self) -> Result<PathBuf> {
        match &self.storage_file {
            Some(raw) => expand_home(raw),
            None => Ok(home_dir()?.join(".txvault").join("db.bin")),
        }
    }

    pub fn cipher_selection(&self) -> Result<CipherSelection> {
        self.cipher.parse()
    }

    pub fn hash_algorithm(&self) -> Result<HashAlgorithm> {
        self.hash.parse()
    }
}

/// `$HOME/.config/txvault`, if a home directory can be found.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("txvault"))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| TxVaultError::ConfigError("cannot determine home directory".into()))
}

fn expand_home(raw: &str) -> Result<PathBuf> {
    match raw.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None if raw == "~" => home_dir(),
        None => Ok(PathBuf::from(raw)),
    }
}

fn create_private_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CipherAlgorithm;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.storage_file, None);
        assert_eq!(s.cipher_selection().unwrap(), CipherSelection::Auto);
        assert_eq!(s.hash_algorithm().unwrap(), HashAlgorithm::Sha1);
    }

    #[test]
    fn load_from_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.toml");
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings, Settings::default());
        // An explicit path is never created.
        assert!(!path.exists());
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
storage_file = "/var/lib/txvault/vault.bin"
cipher = "des"
hash = "sha256"
"#;
        let path = tmp.path().join(Settings::FILE_NAME);
        fs::write(&path, config).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(
            settings.storage_path().unwrap(),
            PathBuf::from("/var/lib/txvault/vault.bin")
        );
        assert_eq!(
            settings.cipher_selection().unwrap(),
            CipherSelection::Named(CipherAlgorithm::Des)
        );
        assert_eq!(settings.hash_algorithm().unwrap(), HashAlgorithm::Sha256);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(Settings::FILE_NAME);
        fs::write(&path, "hash = \"md5\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.hash, "md5");
        // Rest should be defaults
        assert_eq!(settings.cipher, "auto");
        assert_eq!(settings.storage_file, None);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(Settings::FILE_NAME);
        fs::write(&path, "not valid {{toml").unwrap();

        let result = Settings::load_from(&path);
        assert!(matches!(result, Err(TxVaultError::ConfigError(_))));
    }

    #[test]
    fn bootstrap_template_parses_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join(Settings::FILE_NAME);

        Settings::bootstrap(&path).unwrap();
        assert!(path.exists());
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[cfg(unix)]
    #[test]
    fn bootstrap_creates_private_dir() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("cfg");
        Settings::bootstrap(&dir.join(Settings::FILE_NAME)).unwrap();

        let mode = fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn bad_values_surface_when_used() {
        let s = Settings {
            cipher: "rot13".into(),
            hash: "crc32".into(),
            ..Settings::default()
        };
        assert!(s.cipher_selection().is_err());
        assert!(s.hash_algorithm().is_err());
    }

    #[test]
    fn absolute_storage_file_is_kept() {
        let s = Settings {
            storage_file: Some("/tmp/db.bin".into()),
            ..Settings::default()
        };
        assert_eq!(s.storage_path().unwrap(), PathBuf::from("/tmp/db.bin"));
    }
}
