//! Parsing and validation of `svstyle.toml` checker configuration.
//!
//! The file is optional: every section has defaults, so an absent or empty
//! configuration yields [`StyleConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME, DEFAULT_CONFIG};
pub use types::*;
