//! Error handling.
//!
//! This module provides the error type definitions for every phase of an import.
//!
//! Errors are split into:
//! - **Startup errors**: configuration and logger setup, raised before any event is handled
//! - **Import errors**: fatal failures that abort an invocation
//! - **Skippable outcomes**: unrecognized domains, logged and dropped by the caller

mod types;

// Re-export public API
pub use types::{
    CanonicalizeError, ConfigError, FetchFailureKind, ImportError, InitializationError,
    ObjectStoreError, TableError,
};
