//! Trigger event parsing.
//!
//! The importer is invoked with an S3 event notification. Only the bucket name
//! and object key of each record are consulted; everything else in the
//! envelope is ignored.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error_handling::ImportError;

/// Identifies one source object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    /// Bucket name
    pub bucket: String,
    /// Object key, already URL-decoded
    pub key: String,
}

impl ObjectLocation {
    /// Creates a location from a bucket name and a decoded key.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// S3 event notification envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEvent {
    /// One entry per object the notification refers to
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageEventRecord>,
}

/// One record of an event notification.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEventRecord {
    /// Bucket and object the record refers to
    pub s3: StorageEntity,
}

/// The `s3` section of a record.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEntity {
    /// Source bucket
    pub bucket: BucketEntity,
    /// Source object
    pub object: ObjectEntity,
}

/// Bucket section of a record.
#[derive(Debug, Clone, Deserialize)]
pub struct BucketEntity {
    /// Bucket name
    pub name: String,
}

/// Object section of a record.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntity {
    /// Key as delivered by S3, form-URL-encoded.
    pub key: String,
}

impl StorageEvent {
    /// Parses an event from the raw JSON payload handed over by the runtime.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ImportError> {
        serde_json::from_value(value).map_err(|e| ImportError::InvalidEvent(e.to_string()))
    }

    /// Returns the objects referenced by the event, in record order.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidEvent` when the event carries no records or a
    /// record names an empty bucket or key.
    pub fn locations(&self) -> Result<Vec<ObjectLocation>, ImportError> {
        if self.records.is_empty() {
            return Err(ImportError::InvalidEvent(
                "event contains no records".to_string(),
            ));
        }

        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let bucket = record.s3.bucket.name.trim();
                let key = decode_object_key(&record.s3.object.key);
                if bucket.is_empty() || key.is_empty() {
                    return Err(ImportError::InvalidEvent(format!(
                        "record {index} has an empty bucket name or object key"
                    )));
                }
                Ok(ObjectLocation::new(bucket, key))
            })
            .collect()
    }
}

/// Decodes an S3 event object key (`+` for space, `%XX` escapes).
///
/// S3 escapes `&` and `=` inside keys, so the encoded key is always a single
/// form field name.
pub fn decode_object_key(raw: &str) -> String {
    form_urlencoded::parse(raw.as_bytes())
        .map(|(name, _)| name.into_owned())
        .next()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(bucket: &str, key: &str) -> serde_json::Value {
        json!({
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "s3SchemaVersion": "1.0",
                "bucket": { "name": bucket, "arn": format!("arn:aws:s3:::{bucket}") },
                "object": { "key": key, "size": 1024 }
            }
        })
    }

    #[test]
    fn test_single_record() {
        let event = StorageEvent::from_value(json!({ "Records": [record("lists", "bad.txt")] }))
            .unwrap();
        assert_eq!(
            event.locations().unwrap(),
            vec![ObjectLocation::new("lists", "bad.txt")]
        );
    }

    #[test]
    fn test_all_records_in_order() {
        let event = StorageEvent::from_value(json!({
            "Records": [record("lists", "a.txt"), record("other", "b.txt")]
        }))
        .unwrap();
        let locations = event.locations().unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0], ObjectLocation::new("lists", "a.txt"));
        assert_eq!(locations[1], ObjectLocation::new("other", "b.txt"));
    }

    #[test]
    fn test_key_is_url_decoded() {
        let event = StorageEvent::from_value(json!({
            "Records": [record("lists", "daily+drops/bad%26ugly%3Dlist.txt")]
        }))
        .unwrap();
        assert_eq!(
            event.locations().unwrap()[0].key,
            "daily drops/bad&ugly=list.txt"
        );
    }

    #[test]
    fn test_empty_records_rejected() {
        let event = StorageEvent::from_value(json!({ "Records": [] })).unwrap();
        assert!(matches!(
            event.locations(),
            Err(ImportError::InvalidEvent(_))
        ));

        let missing = StorageEvent::from_value(json!({})).unwrap();
        assert!(missing.locations().is_err());
    }

    #[test]
    fn test_malformed_record_rejected() {
        let result = StorageEvent::from_value(json!({ "Records": [{ "s3": { "bucket": {} } }] }));
        assert!(matches!(result, Err(ImportError::InvalidEvent(_))));
    }

    #[test]
    fn test_empty_key_rejected() {
        let event = StorageEvent::from_value(json!({ "Records": [record("lists", "")] })).unwrap();
        assert!(event.locations().is_err());
    }

    #[test]
    fn test_location_display() {
        assert_eq!(
            ObjectLocation::new("lists", "a/b.txt").to_string(),
            "lists/a/b.txt"
        );
    }
}
