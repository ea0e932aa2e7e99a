//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::{DateTime, Local, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{Entry, Tx, TxKind};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Print a numbered table of entries (#, Id, Title, Secret, Created, Updated).
pub fn print_entries_table(entries: &[Entry]) {
    if entries.is_empty() {
        info("No entries in this vault yet.");
        tip("Run `txvault add` to add your first entry.");
        return;
    }

    let mut table = new_table(vec!["#", "Id", "Title", "Secret", "Created", "Updated"]);

    for (i, e) in entries.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            e.id.clone(),
            e.title.clone(),
            e.secret.clone(),
            local_time(e.created_at),
            local_time(e.updated_at),
        ]);
    }

    println!("{table}");
}

/// Print one entry as a two-column table.
pub fn print_entry(entry: &Entry) {
    let mut table = new_table(vec!["Field", "Value"]);
    table.add_row(vec!["Id".to_string(), entry.id.clone()]);
    table.add_row(vec!["Title".to_string(), entry.title.clone()]);
    table.add_row(vec!["Secret".to_string(), entry.secret.clone()]);
    table.add_row(vec!["Created".to_string(), local_time(entry.created_at)]);
    table.add_row(vec!["Updated".to_string(), local_time(entry.updated_at)]);

    println!("{table}");
}

/// Print every transaction (#, Digest, Kind, Time, Entry).
pub fn print_history_table(txs: &[Tx]) {
    if txs.is_empty() {
        info("The transaction log is empty.");
        return;
    }

    let mut table = new_table(vec!["#", "Digest", "Kind", "Time", "Entry"]);

    for (i, tx) in txs.iter().enumerate() {
        let kind = match tx.kind {
            TxKind::Add => style(tx.kind.to_string()).green().to_string(),
            TxKind::Delete => style(tx.kind.to_string()).red().to_string(),
        };
        table.add_row(vec![
            (i + 1).to_string(),
            tx.digest_hex(),
            kind,
            local_time(tx.timestamp),
            tx.payload.id.clone(),
        ]);
    }

    println!("{table}");
}

/// Print one transaction with its full payload snapshot.
pub fn print_tx(tx: &Tx) {
    let mut table = new_table(vec!["Field", "Value"]);
    table.add_row(vec!["Digest".to_string(), tx.digest_hex()]);
    table.add_row(vec!["Kind".to_string(), tx.kind.to_string()]);
    table.add_row(vec!["Time".to_string(), local_time(tx.timestamp)]);
    table.add_row(vec!["Entry id".to_string(), tx.payload.id.clone()]);
    table.add_row(vec!["Title".to_string(), tx.payload.title.clone()]);
    table.add_row(vec!["Secret".to_string(), tx.payload.secret.clone()]);
    table.add_row(vec!["Created".to_string(), local_time(tx.payload.created_at)]);
    table.add_row(vec!["Updated".to_string(), local_time(tx.payload.updated_at)]);

    println!("{table}");
}
