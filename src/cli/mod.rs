//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::CipherAlgorithm;
use crate::errors::{Result, TxVaultError};
use crate::setup::{self, CipherSelection, FileVault};
use crate::vault::EntryRef;

/// Environment variable consulted before prompting for the password.
pub const PASSWORD_ENV: &str = "TXVAULT_PASSWORD";

/// TxVault CLI: encrypted secret store backed by a transaction log.
#[derive(Parser)]
#[command(
    name = "txvault",
    about = "Encrypted secret store backed by an append-only transaction log",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (default: ~/.config/txvault/settings.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Vault file (overrides `storage_file` from settings)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Enable debug diagnostics on stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Use AES-256 for the vault file
    #[arg(long, global = true, conflicts_with = "des")]
    pub aes: bool,

    /// Use DES for the vault file
    #[arg(long, global = true)]
    pub des: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add a new entry
    Add {
        /// Entry title (omit for interactive prompt)
        #[arg(short, long)]
        title: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List all entries
    List {
        /// Print a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a single entry
    View {
        /// Entry id, or its number from `list`
        target: String,
    },

    /// Change an entry's title and/or secret
    Change {
        /// Entry id, or its number from `list`
        target: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// Prompt for a new secret
        #[arg(short, long)]
        secret: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry id, or its number from `list`
        target: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Show every transaction in the log
    History,

    /// Show a single transaction by digest
    Tx {
        /// Hex digest as printed by `history`
        digest: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the vault password, trying in order:
/// 1. `TXVAULT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault password")
        .interact()
        .map_err(|e| TxVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Interpret a command-line target.
///
/// All ASCII digits means a 1-based list number; anything else is an id.
pub fn parse_target(raw: &str) -> Result<EntryRef> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TxVaultError::CommandFailed("entry target cannot be empty".into()));
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) {
        let number: usize = raw
            .parse()
            .map_err(|_| TxVaultError::CommandFailed(format!("entry number '{raw}' is too large")))?;
        if number == 0 {
            return Err(TxVaultError::CommandFailed(
                "entry numbers start at 1".into(),
            ));
        }
        return Ok(EntryRef::Position(number - 1));
    }

    Ok(EntryRef::Id(raw.to_string()))
}

/// Cipher requested by the flags, falling back to the settings.
pub fn cipher_selection(cli: &Cli, settings: &Settings) -> Result<CipherSelection> {
    if cli.aes {
        Ok(CipherSelection::Named(CipherAlgorithm::Aes))
    } else if cli.des {
        Ok(CipherSelection::Named(CipherAlgorithm::Des))
    } else {
        settings.cipher_selection()
    }
}

/// Vault file requested by `--file`, falling back to the settings.
pub fn storage_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    match &cli.file {
        Some(path) => Ok(path.clone()),
        None => settings.storage_path(),
    }
}

/// Load settings, ask for the password and open the vault.
pub fn open_vault(cli: &Cli) -> Result<FileVault> {
    let settings = Settings::load(cli.config.as_deref())?;
    let path = storage_path(cli, &settings)?;
    let selection = cipher_selection(cli, &settings)?;
    let hash = settings.hash_algorithm()?;

    debug!(path = %path.display(), %selection, %hash, "resolved vault settings");

    let password = prompt_password()?;
    setup::open_store(&path, password.as_bytes(), selection, hash)
}

/// Read a secret value: piped stdin if stdin is not a terminal, otherwise
/// a hidden prompt.
pub fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut *buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(trimmed);
        return Ok(buf);
    }

    let secret = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| TxVaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| TxVaultError::CommandFailed(format!("confirm prompt: {e}")))
}
