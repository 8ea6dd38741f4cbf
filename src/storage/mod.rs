//! Domain table backends and the batched persist path.

mod batch;
mod dynamodb;
mod migrations;
mod pool;
mod sqlite;
#[cfg(test)]
pub(crate) mod test_helpers;

use async_trait::async_trait;

use crate::error_handling::TableError;

// Re-export commonly used items
pub use batch::persist;
pub use dynamodb::DynamoDbDomainTable;
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use sqlite::SqliteDomainTable;

/// Key-value table holding one record per registrable domain.
///
/// Writes are upserts keyed by the domain name: writing a domain that already
/// exists overwrites it without error.
#[async_trait]
pub trait DomainTable: Send + Sync {
    /// Upserts every domain in `domains` as a single batch.
    async fn upsert_batch(&self, domains: &[String]) -> Result<(), TableError>;
}

#[async_trait]
impl<T: DomainTable + ?Sized> DomainTable for std::sync::Arc<T> {
    async fn upsert_batch(&self, domains: &[String]) -> Result<(), TableError> {
        (**self).upsert_batch(domains).await
    }
}
