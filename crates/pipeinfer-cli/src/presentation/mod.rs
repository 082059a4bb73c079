//! Terminal output for inference results.
//!
//! Format-only: handlers decide what to print, this module decides how.

pub mod report;

pub use report::{Report, print_separator};
