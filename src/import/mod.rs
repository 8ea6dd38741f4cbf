//! The import pipeline: fetch, extract and canonicalize, dedupe and persist.
//!
//! [`DomainImporter`] owns its object store, its domain table and the Public
//! Suffix List. Each object is processed to completion before the next one;
//! the first fatal error aborts the invocation.

use std::time::Instant;

use log::{error, info};
use psl::List;
use serde::Serialize;

use crate::config::{Config, DEFAULT_BATCH_SIZE};
use crate::domain::collect_domains;
use crate::error_handling::ImportError;
use crate::event::{ObjectLocation, StorageEvent};
use crate::fetch::{fetch_text, ObjectStore};
use crate::storage::{persist, DomainTable};

/// Tuning knobs for an importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    /// Items per table write
    pub batch_size: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl From<&Config> for ImportSettings {
    fn from(config: &Config) -> Self {
        Self {
            batch_size: config.batch_size,
        }
    }
}

/// Summary of one imported object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Source bucket
    pub bucket: String,
    /// Source object key
    pub key: String,
    /// Hostname-shaped matches found in the object
    pub candidates: usize,
    /// Candidates dropped for lack of a recognized public suffix
    pub skipped: usize,
    /// Unique domains written to the table
    pub unique_domains: usize,
    /// Table writes issued
    pub batches: usize,
    /// Wall-clock time spent on the object
    pub elapsed_ms: u64,
}

/// Runs the import pipeline against an object store and a domain table.
///
/// Built once per process and reused for every event.
pub struct DomainImporter<S, T> {
    store: S,
    table: T,
    suffixes: List,
    settings: ImportSettings,
}

impl<S, T> DomainImporter<S, T>
where
    S: ObjectStore,
    T: DomainTable,
{
    /// Creates an importer backed by the embedded Public Suffix List.
    pub fn new(store: S, table: T, settings: ImportSettings) -> Self {
        Self {
            store,
            table,
            suffixes: List,
            settings,
        }
    }

    /// Object store used for downloads.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Table receiving the domains.
    pub fn table(&self) -> &T {
        &self.table
    }

    /// Settings the importer was built with.
    pub fn settings(&self) -> ImportSettings {
        self.settings
    }

    /// Imports every object referenced by a trigger event, in record order.
    ///
    /// # Errors
    ///
    /// Stops at the first object that fails; objects before it stay imported.
    pub async fn handle_event(&self, event: &StorageEvent) -> Result<Vec<ImportReport>, ImportError> {
        let locations = event.locations()?;
        if locations.len() > 1 {
            info!("Event carries {} records", locations.len());
        }

        let mut reports = Vec::with_capacity(locations.len());
        for location in &locations {
            reports.push(self.import_object(location).await?);
        }
        Ok(reports)
    }

    /// Runs the full pipeline for one object.
    ///
    /// # Errors
    ///
    /// - `ImportError::ObjectFetch` if the object cannot be downloaded or read
    /// - `ImportError::DomainResolution` if a candidate fails for a reason other
    ///   than an unrecognized public suffix
    /// - `ImportError::PersistenceWrite` if a table write fails
    ///
    /// No table writes happen unless every candidate was resolved or skipped.
    pub async fn import_object(&self, location: &ObjectLocation) -> Result<ImportReport, ImportError> {
        let started = Instant::now();
        info!("Bucket: {}   File: {}", location.bucket, location.key);

        let text = fetch_text(&self.store, location).await.map_err(|source| {
            error!("Failed to fetch {location}: {source}");
            ImportError::ObjectFetch {
                location: location.clone(),
                source,
            }
        })?;
        info!("Domain list file {location} downloaded ({} bytes)", text.len());

        let harvest = collect_domains(&self.suffixes, &text).map_err(|e| {
            error!("Aborting import of {location}: {e}");
            ImportError::DomainResolution(e)
        })?;
        drop(text);

        info!("=> Total domains in file [{}]", harvest.resolved);
        info!("=> Unique domains in file [{}]", harvest.domains.len());

        let batches = persist(&self.table, &harvest.domains, self.settings.batch_size).await?;

        let report = ImportReport {
            bucket: location.bucket.clone(),
            key: location.key.clone(),
            candidates: harvest.candidates,
            skipped: harvest.skipped,
            unique_domains: harvest.domains.len(),
            batches,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(
            "Imported {location}: {} candidate(s), {} skipped, {} unique in {} batch(es)",
            report.candidates, report.skipped, report.unique_domains, report.batches
        );
        Ok(report)
    }
}
