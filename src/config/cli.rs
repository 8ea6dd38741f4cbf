//! Command-line options for the `interesting_domains` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::constants::{DEFAULT_BATCH_SIZE, DEFAULT_DB_PATH, TABLE_ENV_VAR};
use crate::config::types::{LogFormat, LogLevel};

/// Top-level command-line options.
#[derive(Debug, Parser)]
#[command(
    name = "interesting_domains",
    about = "Extracts registrable domains from a text file and upserts them into a table."
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Items per table write (1-25)
    #[arg(long, global = true, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// What to import
    #[command(subcommand)]
    pub command: Command,
}

/// Import sources supported by the CLI.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a local file into a SQLite-backed domain table
    Import {
        /// File to scan for hostnames
        #[arg(value_parser)]
        file: PathBuf,

        /// Database path (SQLite file)
        #[arg(long, value_parser, default_value = DEFAULT_DB_PATH)]
        db_path: PathBuf,
    },

    /// Import an object from S3 into the configured DynamoDB table
    S3 {
        /// Source bucket
        bucket: String,

        /// Object key (as stored, not URL-encoded)
        key: String,

        /// Target table (falls back to INTERESTING_DOMAINS_TABLE)
        #[arg(long, env = TABLE_ENV_VAR)]
        table: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_defaults() {
        let opt = Opt::try_parse_from(["interesting_domains", "import", "list.txt"]).unwrap();
        assert_eq!(opt.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(opt.log_level, LogLevel::Info);
        match opt.command {
            Command::Import { file, db_path } => {
                assert_eq!(file, PathBuf::from("list.txt"));
                assert_eq!(db_path, PathBuf::from(DEFAULT_DB_PATH));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_s3_with_explicit_table() {
        let opt = Opt::try_parse_from([
            "interesting_domains",
            "--log-format",
            "json",
            "s3",
            "lists",
            "daily/bad.txt",
            "--table",
            "domains",
        ])
        .unwrap();
        assert_eq!(opt.log_format, LogFormat::Json);
        match opt.command {
            Command::S3 { bucket, key, table } => {
                assert_eq!(bucket, "lists");
                assert_eq!(key, "daily/bad.txt");
                assert_eq!(table, "domains");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_log_level() {
        let result = Opt::try_parse_from([
            "interesting_domains",
            "--log-level",
            "chatty",
            "import",
            "list.txt",
        ]);
        assert!(result.is_err());
    }
}
