//! `txvault view`: show a single entry.

use crate::cli::output;
use crate::cli::{open_vault, parse_target, Cli};
use crate::errors::{Result, TxVaultError};

/// Execute the `view` command.
pub fn execute(cli: &Cli, target: &str) -> Result<()> {
    let target = parse_target(target)?;
    let store = open_vault(cli)?;

    let entry = store
        .find(&target)
        .ok_or_else(|| TxVaultError::NotFound(target.to_string()))?;

    output::print_entry(&entry);
    Ok(())
}
