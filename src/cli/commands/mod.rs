//! One module per subcommand; each exposes an `execute` function.

pub mod add;
pub mod change;
pub mod delete;
pub mod history;
pub mod list;
pub mod tx;
pub mod view;
