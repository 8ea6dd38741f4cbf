//! Configuration constants.
//!
//! Environment variable names, table layout, and operational defaults shared by
//! the CLI and the Lambda entry point.

/// Environment variable holding the target table identifier (required).
pub const TABLE_ENV_VAR: &str = "INTERESTING_DOMAINS_TABLE";

/// Environment variable overriding the write batch size.
pub const BATCH_SIZE_ENV_VAR: &str = "INTERESTING_DOMAINS_BATCH_SIZE";

/// Environment variable selecting the log format (`plain` or `json`).
pub const LOG_FORMAT_ENV_VAR: &str = "INTERESTING_DOMAINS_LOG_FORMAT";

/// Environment variable selecting the log level.
pub const LOG_LEVEL_ENV_VAR: &str = "INTERESTING_DOMAINS_LOG_LEVEL";

/// Number of items sent per table write.
///
/// DynamoDB rejects `BatchWriteItem` requests with more than 25 put requests,
/// so this is both the default and the upper bound.
pub const DEFAULT_BATCH_SIZE: usize = 25;
/// Largest batch accepted by the table service.
pub const MAX_BATCH_SIZE: usize = 25;

/// How many times a batch is resubmitted when the table reports unprocessed items.
pub const UNPROCESSED_RESUBMIT_LIMIT: usize = 3;

/// Partition key attribute of a stored domain record.
pub const DOMAIN_ATTRIBUTE: &str = "domainName";

/// Scheme prepended to a candidate hostname before URL parsing.
pub const SCHEME_PREFIX: &str = "http://";

/// Default SQLite file used by the offline `import` subcommand.
pub const DEFAULT_DB_PATH: &str = "./interesting_domains.db";

/// Prefix for the transient download file.
pub const TRANSIENT_FILE_PREFIX: &str = "interesting-domains-";
