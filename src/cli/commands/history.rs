//! `txvault history`: display the transaction log.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `history` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = open_vault(cli)?;
    let txs = store.log().list();

    output::info(&format!(
        "{} transaction(s), {} live entr{}",
        txs.len(),
        store.len(),
        if store.len() == 1 { "y" } else { "ies" }
    ));
    output::print_history_table(&txs);

    Ok(())
}
