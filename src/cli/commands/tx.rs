//! `txvault tx`: show one transaction by digest.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, TxVaultError};

/// Execute the `tx` command.
pub fn execute(cli: &Cli, digest: &str) -> Result<()> {
    let store = open_vault(cli)?;

    let tx = store
        .log()
        .find_by_digest(digest)
        .ok_or_else(|| TxVaultError::NotFound(format!("transaction {digest}")))?;

    output::print_tx(&tx);
    Ok(())
}
