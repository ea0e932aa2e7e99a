pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod setup;
pub mod storage;
pub mod vault;
