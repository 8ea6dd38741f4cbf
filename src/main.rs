//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `interesting_domains` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! The Lambda entry point lives in `src/bin/bootstrap.rs`.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use interesting_domains::config::{validate_batch_size, Command, Opt};
use interesting_domains::initialization::{init_aws_config, init_aws_importer, init_logger_with};
use interesting_domains::{
    Config, DomainImporter, ImportReport, ImportSettings, LocalObjectStore, ObjectLocation,
    SqliteDomainTable,
};

async fn run(opt: Opt) -> Result<ImportReport> {
    validate_batch_size(opt.batch_size)?;

    match opt.command {
        Command::Import { file, db_path } => {
            let (store, location) = LocalObjectStore::for_file(&file)
                .with_context(|| format!("Invalid input file {}", file.display()))?;
            let table = SqliteDomainTable::open(&db_path)
                .await
                .context("Failed to open domain database")?;

            let settings = ImportSettings {
                batch_size: opt.batch_size,
            };
            let importer = DomainImporter::new(store, table, settings);
            Ok(importer.import_object(&location).await?)
        }
        Command::S3 { bucket, key, table } => {
            let config = Config {
                table_name: table,
                batch_size: opt.batch_size,
                log_level: opt.log_level,
                log_format: opt.log_format,
            };
            config.validate()?;

            let sdk_config = init_aws_config().await;
            let importer = init_aws_importer(&sdk_config, &config);
            Ok(importer
                .import_object(&ObjectLocation::new(bucket, key))
                .await?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(opt).await {
        Ok(report) => {
            println!(
                "Imported {} unique domain{} from {} candidate{} ({} skipped) in {} ms",
                report.unique_domains,
                if report.unique_domains == 1 { "" } else { "s" },
                report.candidates,
                if report.candidates == 1 { "" } else { "s" },
                report.skipped,
                report.elapsed_ms
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("interesting_domains error: {:#}", e);
            process::exit(1);
        }
    }
}
