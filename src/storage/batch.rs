//! Batched table writes.

use std::collections::BTreeSet;

use log::{debug, error, info};

use super::DomainTable;
use crate::error_handling::ImportError;

/// Writes every domain in `domains` to `table`, `batch_size` items at a time.
///
/// Batches are written in order. The first failing batch is logged with its
/// number and contents and returned as `ImportError::PersistenceWrite`; later
/// batches are not attempted. An empty set writes nothing.
///
/// Returns the number of batches written.
pub async fn persist<T>(
    table: &T,
    domains: &BTreeSet<String>,
    batch_size: usize,
) -> Result<usize, ImportError>
where
    T: DomainTable + ?Sized,
{
    let items: Vec<String> = domains.iter().cloned().collect();
    let batch_size = batch_size.max(1);

    info!("Writing {} domain(s) to table", items.len());

    let mut written = 0;
    for (index, batch) in items.chunks(batch_size).enumerate() {
        let batch_number = index + 1;
        if let Err(e) = table.upsert_batch(batch).await {
            error!(
                "Failed to write batch {} [{}]: {}",
                batch_number,
                batch.join(", "),
                e
            );
            return Err(ImportError::PersistenceWrite {
                batch: batch_number,
                source: e,
            });
        }
        debug!("Flushed batch {} of {} item(s)", batch_number, batch.len());
        written += 1;
    }

    info!("Wrote {} domain(s) in {} batch(es)", items.len(), written);
    Ok(written)
}
