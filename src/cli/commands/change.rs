//! `txvault change`: update an entry's title and/or secret.

use crate::cli::output;
use crate::cli::{open_vault, parse_target, read_secret, Cli};
use crate::errors::{Result, TxVaultError};
use crate::vault::EntryChange;

/// Execute the `change` command.
pub fn execute(cli: &Cli, target: &str, title: Option<&str>, secret: bool) -> Result<()> {
    let target = parse_target(target)?;
    if title.is_none() && !secret {
        return Err(TxVaultError::CommandFailed(
            "nothing to change: pass --title and/or --secret".into(),
        ));
    }

    let new_secret = if secret {
        Some(read_secret("New secret")?)
    } else {
        None
    };

    let change = EntryChange {
        title: title.map(str::to_string),
        secret: new_secret.as_deref().map(|s| s.to_string()),
    };

    let store = open_vault(cli)?;
    let updated = store.change(&target, &change)?;

    output::success(&format!("Changed '{}' ({})", updated.title, updated.id));
    Ok(())
}
