//! AWS Lambda entry point.
//!
//! Configuration and AWS clients are built once at cold start; every S3 event
//! delivered to the function is then handled by the same importer.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use log::{error, info};
use serde_json::Value;

use interesting_domains::initialization::{
    init_aws_config, init_aws_importer, init_logger_with, AwsDomainImporter,
};
use interesting_domains::{Config, ImportError, ImportReport, StorageEvent};

/// Logs a fatal import error with its kind and converts it for the runtime.
fn report_failure(e: ImportError) -> Error {
    error!("{}: {}", e.kind(), e);
    Error::from(e)
}

fn parse_event(payload: Value) -> Result<StorageEvent, Error> {
    StorageEvent::from_value(payload).map_err(report_failure)
}

async fn handle_request(
    importer: &AwsDomainImporter,
    event: LambdaEvent<Value>,
) -> Result<Vec<ImportReport>, Error> {
    info!("Handling request {}", event.context.request_id);

    let storage_event = parse_event(event.payload)?;
    importer
        .handle_event(&storage_event)
        .await
        .map_err(report_failure)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();

    // A missing table name fails the cold start, not individual invocations.
    let config = Config::from_env()?;
    init_logger_with(config.log_level.clone().into(), config.log_format.clone())?;
    info!("Writing domains to table {}", config.table_name);

    let sdk_config = init_aws_config().await;
    let importer = init_aws_importer(&sdk_config, &config);
    let importer = &importer;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(importer, event).await
    }))
    .await
}
