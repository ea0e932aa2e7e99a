//! Configuration: user settings loaded from `settings.toml`.

pub mod settings;

pub use settings::{default_config_dir, Settings};
