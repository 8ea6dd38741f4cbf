//! SQLite-backed domain table for offline imports.

use std::path::Path;

use async_trait::async_trait;
use log::debug;
use sqlx::SqlitePool;

use super::{init_db_pool_with_path, run_migrations, DomainTable};
use crate::error_handling::{InitializationError, TableError};

const UPSERT_DOMAIN: &str = "INSERT INTO interesting_domains (domain_name) VALUES (?)
     ON CONFLICT(domain_name) DO UPDATE SET domain_name = excluded.domain_name";

/// Domain table in the `interesting_domains` SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteDomainTable {
    pool: SqlitePool,
}

impl SqliteDomainTable {
    /// Opens (creating if needed) the database at `db_path` and applies migrations.
    pub async fn open(db_path: &Path) -> Result<Self, InitializationError> {
        let pool = init_db_pool_with_path(db_path).await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, applying migrations first.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, InitializationError> {
        run_migrations(&pool)
            .await
            .map_err(|e| InitializationError::DatabaseError(format!("{e:#}")))?;
        Ok(Self { pool })
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns every stored domain, sorted.
    pub async fn domains(&self) -> Result<Vec<String>, TableError> {
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT domain_name FROM interesting_domains ORDER BY domain_name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }
}

#[async_trait]
impl DomainTable for SqliteDomainTable {
    async fn upsert_batch(&self, domains: &[String]) -> Result<(), TableError> {
        let mut tx = self.pool.begin().await?;
        for domain in domains {
            sqlx::query(UPSERT_DOMAIN)
                .bind(domain)
                .execute(&mut *tx)
                .await
                .map_err(|e| TableError::ItemRejected {
                    domain: domain.clone(),
                    message: e.to_string(),
                })?;
        }
        tx.commit().await?;
        debug!("Committed {} domain(s) to SQLite", domains.len());
        Ok(())
    }
}
