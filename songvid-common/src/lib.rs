//! # songvid common library
//!
//! Shared code for the songvid crates:
//! - Error type used by configuration loading
//! - TOML bootstrap configuration and config file resolution

pub mod config;
pub mod error;

pub use config::TomlConfig;
pub use error::{Error, Result};
