//! goalias CLI library
//!
//! This library exposes CLI functionality for programmatic use and testing.

pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod gopath;
pub mod logging;
pub mod output;

pub use config::GoaliasConfig;
pub use error::CliError;
pub use output::OutputFormat;
