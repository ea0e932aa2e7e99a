//! `txvault delete`: remove an entry from the vault.

use crate::cli::output;
use crate::cli::{confirm, open_vault, parse_target, Cli};
use crate::errors::{Result, TxVaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, target: &str, force: bool) -> Result<()> {
    let target = parse_target(target)?;

    // Open the vault first so the prompt can name the entry.
    let store = open_vault(cli)?;
    let entry = store
        .find(&target)
        .ok_or_else(|| TxVaultError::NotFound(target.to_string()))?;

    if !force && !confirm(&format!("Delete entry '{}' ({})?", entry.title, entry.id))? {
        return Err(TxVaultError::UserCancelled);
    }

    // Delete by id: the position could name another entry after a reload.
    store.delete_by_id(&entry.id)?;

    output::success(&format!(
        "Deleted '{}' ({} remaining)",
        entry.title,
        store.len()
    ));
    Ok(())
}
