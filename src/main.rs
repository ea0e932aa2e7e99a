use clap::Parser;
use tracing_subscriber::EnvFilter;
use txvault::cli::{Cli, Commands};
use txvault::errors::TxVaultError;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Add { ref title, yes } => {
            txvault::cli::commands::add::execute(&cli, title.as_deref(), yes)
        }
        Commands::List { json } => txvault::cli::commands::list::execute(&cli, json),
        Commands::View { ref target } => txvault::cli::commands::view::execute(&cli, target),
        Commands::Change {
            ref target,
            ref title,
            secret,
        } => txvault::cli::commands::change::execute(&cli, target, title.as_deref(), secret),
        Commands::Delete { ref target, force } => {
            txvault::cli::commands::delete::execute(&cli, target, force)
        }
        Commands::History => txvault::cli::commands::history::execute(&cli),
        Commands::Tx { ref digest } => txvault::cli::commands::tx::execute(&cli, digest),
    };

    match result {
        Ok(()) => {}
        Err(TxVaultError::UserCancelled) => txvault::cli::output::info("Cancelled."),
        Err(e) => {
            txvault::cli::output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over the `--debug` default.
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
