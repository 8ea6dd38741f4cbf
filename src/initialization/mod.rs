//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources once per process:
//! - Logger
//! - AWS SDK configuration and the service-backed importer
//!
//! All initialization functions return proper error types for error handling.

mod logger;

use crate::config::Config;
use crate::fetch::S3ObjectStore;
use crate::import::{DomainImporter, ImportSettings};
use crate::storage::DynamoDbDomainTable;

// Re-export public API
pub use logger::init_logger_with;

/// Importer wired to S3 and DynamoDB.
pub type AwsDomainImporter = DomainImporter<S3ObjectStore, DynamoDbDomainTable>;

/// Loads the shared AWS SDK configuration (region, credentials, endpoint) from the environment.
pub async fn init_aws_config() -> aws_config::SdkConfig {
    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await
}

/// Builds an importer that reads from S3 and writes to the DynamoDB table named in `config`.
pub fn init_aws_importer(sdk_config: &aws_config::SdkConfig, config: &Config) -> AwsDomainImporter {
    DomainImporter::new(
        S3ObjectStore::from_sdk_config(sdk_config),
        DynamoDbDomainTable::from_sdk_config(sdk_config, config.table_name.clone()),
        ImportSettings::from(config),
    )
}
