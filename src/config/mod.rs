//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (environment variable names, batch limits, table layout)
//! - The environment-backed runtime [`Config`]
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Command, Opt};
pub use constants::*;
pub use types::{validate_batch_size, Config, LogFormat, LogLevel};
