//! interesting_domains library: import registrable domains from object storage
//!
//! Reacts to a file landing in object storage: downloads it, scans the text for
//! hostnames, resolves each one to its registrable domain with the Public Suffix
//! List, deduplicates, and upserts the result into a key-value table.
//!
//! # Example
//!
//! ```no_run
//! use interesting_domains::{DomainImporter, ImportSettings, LocalObjectStore, ObjectLocation, SqliteDomainTable};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = SqliteDomainTable::open(std::path::Path::new("domains.db")).await?;
//! let importer = DomainImporter::new(LocalObjectStore::new("/srv/lists"), table, ImportSettings::default());
//!
//! let report = importer.import_object(&ObjectLocation::new("daily", "bad.txt")).await?;
//! println!("{} unique domains from {} candidates", report.unique_domains, report.candidates);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
pub mod domain;
pub mod error_handling;
pub mod event;
pub mod extract;
pub mod fetch;
pub mod import;
pub mod initialization;
pub mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use domain::{canonicalize, collect_domains, dedupe, Harvest};
pub use error_handling::{
    CanonicalizeError, ConfigError, FetchFailureKind, ImportError, InitializationError,
    ObjectStoreError, TableError,
};
pub use event::{ObjectLocation, StorageEvent};
pub use extract::extract_hostnames;
pub use fetch::{fetch_text, LocalObjectStore, ObjectStore, S3ObjectStore};
pub use import::{DomainImporter, ImportReport, ImportSettings};
pub use storage::{persist, DomainTable, DynamoDbDomainTable, SqliteDomainTable};
