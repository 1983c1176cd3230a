//! Lectern CLI Library
//!
//! Configuration and subcommands behind the `lectern` binary.
//!
//! This library exposes the core components for testing purposes.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::Context;
pub use config::AppConfig;
pub use error::{CliError, Result};
