//! Command-line front-end for pipeinfer.
//!
//! Stands in for the graphical front-end: it hands files to an
//! `InferenceSession` and prints what the worker reported.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for the test build of the library
#[cfg(test)]
use tempfile as _;

// Used only by the binary entry point
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap, resolve_settings};
pub use commands::Commands;
pub use error::CliError;
pub use parser::{Cli, SettingsArgs};
