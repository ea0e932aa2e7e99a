//! `txvault list`: display all entries.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, TxVaultError};

/// Execute the `list` command.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let store = open_vault(cli)?;
    let entries = store.list();

    if json {
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(|e| TxVaultError::Serialization(e.to_string()))?;
        println!("{rendered}");
        return Ok(());
    }

    output::print_entries_table(&entries);
    Ok(())
}
