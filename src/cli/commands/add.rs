//! `txvault add`: create a new entry.

use std::io::{self, IsTerminal};

use crate::cli::output;
use crate::cli::{confirm, open_vault, read_secret, Cli};
use crate::errors::{Result, TxVaultError};
use crate::vault::Entry;

/// Execute the `add` command.
pub fn execute(cli: &Cli, title: Option<&str>, yes: bool) -> Result<()> {
    if !yes && !confirm("Add a new entry?")? {
        return Err(TxVaultError::UserCancelled);
    }

    let title = match title {
        Some(t) => t.to_string(),
        None if !io::stdin().is_terminal() => {
            return Err(TxVaultError::CommandFailed(
                "--title is required when stdin is not a terminal".into(),
            ));
        }
        None => dialoguer::Input::<String>::new()
            .with_prompt("Title")
            .interact_text()
            .map_err(|e| TxVaultError::CommandFailed(format!("input prompt: {e}")))?,
    };
    let secret = read_secret(&format!("Secret for {title}"))?;

    let store = open_vault(cli)?;
    let entry = Entry::generate(title, secret.as_str());
    let id = store.add(entry.clone())?;

    output::success(&format!(
        "Added '{}' ({} total)",
        entry.title,
        store.len()
    ));
    println!("{id}");

    Ok(())
}
