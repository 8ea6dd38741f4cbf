// Import pipeline tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::*;
use crate::error_handling::{FetchFailureKind, ObjectStoreError, TableError};
use crate::storage::test_helpers::create_test_table;

/// In-memory object store keyed by "bucket/key".
#[derive(Default)]
struct MemoryStore {
    objects: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    fn with(mut self, bucket: &str, key: &str, body: &str) -> Self {
        self.objects
            .insert(format!("{bucket}/{key}"), body.as_bytes().to_vec());
        self
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn download(
        &self,
        location: &ObjectLocation,
        destination: &Path,
    ) -> Result<(), ObjectStoreError> {
        let body = self
            .objects
            .get(&location.to_string())
            .ok_or_else(|| ObjectStoreError::not_found(format!("NoSuchKey: {location}")))?;
        tokio::fs::write(destination, body).await?;
        Ok(())
    }
}

/// Table that counts write calls and can be told to reject everything.
#[derive(Default)]
struct CountingTable {
    writes: Mutex<Vec<Vec<String>>>,
    reject: bool,
}

#[async_trait]
impl DomainTable for CountingTable {
    async fn upsert_batch(&self, domains: &[String]) -> Result<(), TableError> {
        if self.reject {
            return Err(TableError::Request("ProvisionedThroughputExceeded".to_string()));
        }
        self.writes.lock().unwrap().push(domains.to_vec());
        Ok(())
    }
}

fn event_for(records: &[(&str, &str)]) -> StorageEvent {
    let records: Vec<_> = records
        .iter()
        .map(|(bucket, key)| json!({ "s3": { "bucket": { "name": bucket }, "object": { "key": key } } }))
        .collect();
    StorageEvent::from_value(json!({ "Records": records })).unwrap()
}

#[tokio::test]
async fn test_import_persists_unique_registrable_domains() {
    let store = MemoryStore::default().with(
        "lists",
        "bad.txt",
        "Visit bad-domain.com and sub.bad-domain.com today, also not_a_domain!!",
    );
    let importer = DomainImporter::new(store, create_test_table().await, ImportSettings::default());

    let report = importer
        .import_object(&ObjectLocation::new("lists", "bad.txt"))
        .await
        .unwrap();

    assert_eq!(report.candidates, 2);
    assert_eq!(report.unique_domains, 1);
    assert_eq!(report.batches, 1);
    assert_eq!(
        importer.table().domains().await.unwrap(),
        vec!["bad-domain.com".to_string()]
    );
}

#[tokio::test]
async fn test_import_skips_unrecognized_suffix() {
    let store = MemoryStore::default().with(
        "lists",
        "mixed.txt",
        "foo.bar.invalidtld123\nhost.notarealtld\nphish.example.org\n",
    );
    let importer = DomainImporter::new(store, create_test_table().await, ImportSettings::default());

    let report = importer
        .import_object(&ObjectLocation::new("lists", "mixed.txt"))
        .await
        .unwrap();

    // The final label must be letters only, so the word boundary cuts
    // "foo.bar.invalidtld123" back to "foo.bar", and .bar is a listed suffix.
    assert_eq!(report.candidates, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.unique_domains, 2);
    assert_eq!(
        importer.table().domains().await.unwrap(),
        vec!["example.org".to_string(), "foo.bar".to_string()]
    );
}

#[tokio::test]
async fn test_missing_object_fails_without_writes() {
    let table = CountingTable::default();
    let importer = DomainImporter::new(MemoryStore::default(), table, ImportSettings::default());

    let err = importer
        .import_object(&ObjectLocation::new("lists", "gone.txt"))
        .await
        .unwrap_err();

    match err {
        ImportError::ObjectFetch { location, source } => {
            assert_eq!(location, ObjectLocation::new("lists", "gone.txt"));
            assert_eq!(source.kind, FetchFailureKind::NotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(importer.table().writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_object_succeeds_with_no_writes() {
    let store = MemoryStore::default().with("lists", "empty.txt", "");
    let importer = DomainImporter::new(store, CountingTable::default(), ImportSettings::default());

    let report = importer
        .import_object(&ObjectLocation::new("lists", "empty.txt"))
        .await
        .unwrap();

    assert_eq!(report.candidates, 0);
    assert_eq!(report.unique_domains, 0);
    assert_eq!(report.batches, 0);
    assert!(importer.table().writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_importing_twice_is_idempotent() {
    let store = MemoryStore::default().with("lists", "a.txt", "a.example.com b.example.net");
    let importer = DomainImporter::new(store, create_test_table().await, ImportSettings::default());
    let location = ObjectLocation::new("lists", "a.txt");

    importer.import_object(&location).await.unwrap();
    let once = importer.table().domains().await.unwrap();
    importer.import_object(&location).await.unwrap();

    assert_eq!(importer.table().domains().await.unwrap(), once);
    assert_eq!(once, vec!["example.com".to_string(), "example.net".to_string()]);
}

#[tokio::test]
async fn test_table_failure_is_persistence_error() {
    let store = MemoryStore::default().with("lists", "a.txt", "a.example.com");
    let table = CountingTable {
        reject: true,
        ..Default::default()
    };
    let importer = DomainImporter::new(store, table, ImportSettings::default());

    let err = importer
        .import_object(&ObjectLocation::new("lists", "a.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::PersistenceWrite { batch: 1, .. }));
    assert_eq!(err.kind(), "PersistenceWriteError");
}

#[tokio::test]
async fn test_batch_size_controls_write_grouping() {
    let body: String = (0..7).map(|i| format!("host{i}.example{i}.com\n")).collect();
    let store = MemoryStore::default().with("lists", "seven.txt", &body);
    let importer = DomainImporter::new(
        store,
        CountingTable::default(),
        ImportSettings { batch_size: 3 },
    );

    let report = importer
        .import_object(&ObjectLocation::new("lists", "seven.txt"))
        .await
        .unwrap();

    assert_eq!(report.unique_domains, 7);
    assert_eq!(report.batches, 3);
    let sizes: Vec<usize> = importer
        .table()
        .writes
        .lock()
        .unwrap()
        .iter()
        .map(Vec::len)
        .collect();
    assert_eq!(sizes, vec![3, 3, 1]);
}

#[tokio::test]
async fn test_handle_event_processes_every_record() {
    let store = MemoryStore::default()
        .with("lists", "one.txt", "a.example.com")
        .with("lists", "two.txt", "b.example.org");
    let importer = DomainImporter::new(store, create_test_table().await, ImportSettings::default());

    let reports = importer
        .handle_event(&event_for(&[("lists", "one.txt"), ("lists", "two.txt")]))
        .await
        .unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].key, "one.txt");
    assert_eq!(reports[1].key, "two.txt");
    assert_eq!(
        importer.table().domains().await.unwrap(),
        vec!["example.com".to_string(), "example.org".to_string()]
    );
}

#[tokio::test]
async fn test_handle_event_stops_at_first_failure() {
    let store = MemoryStore::default()
        .with("lists", "one.txt", "a.example.com")
        .with("lists", "three.txt", "c.example.net");
    let importer = DomainImporter::new(store, CountingTable::default(), ImportSettings::default());

    let err = importer
        .handle_event(&event_for(&[
            ("lists", "one.txt"),
            ("lists", "two.txt"),
            ("lists", "three.txt"),
        ]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "ObjectFetchError");
    // only the first object was written
    assert_eq!(importer.table().writes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_handle_event_without_records() {
    let importer = DomainImporter::new(
        MemoryStore::default(),
        CountingTable::default(),
        ImportSettings::default(),
    );
    let event = StorageEvent::from_value(json!({ "Records": [] })).unwrap();
    let err = importer.handle_event(&event).await.unwrap_err();
    assert!(matches!(err, ImportError::InvalidEvent(_)));
}

#[test]
fn test_report_serializes_camel_case() {
    let report = ImportReport {
        bucket: "lists".to_string(),
        key: "a.txt".to_string(),
        candidates: 3,
        skipped: 1,
        unique_domains: 2,
        batches: 1,
        elapsed_ms: 5,
    };
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["uniqueDomains"], 2);
    assert_eq!(value["elapsedMs"], 5);
}
