//! DynamoDB-backed domain table.
//!
//! Each batch is sent as one `BatchWriteItem` of `PutRequest`s keyed by
//! `domainName`. Items the service reports as unprocessed are resubmitted a
//! bounded number of times, the same way the SDK batch writers do.

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use log::{debug, warn};

use super::DomainTable;
use crate::config::{DOMAIN_ATTRIBUTE, UNPROCESSED_RESUBMIT_LIMIT};
use crate::error_handling::TableError;

/// Domain table stored in a DynamoDB table keyed by `domainName`.
#[derive(Clone)]
pub struct DynamoDbDomainTable {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoDbDomainTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbDomainTable")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl DynamoDbDomainTable {
    /// Wraps an existing DynamoDB client writing to `table_name`.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Builds a client from shared AWS configuration.
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, table_name: impl Into<String>) -> Self {
        Self::new(Client::new(sdk_config), table_name)
    }

    /// Name of the target table.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// Builds the put request for one stored domain record.
fn put_request(domain: &str) -> Result<WriteRequest, TableError> {
    let put = PutRequest::builder()
        .item(DOMAIN_ATTRIBUTE, AttributeValue::S(domain.to_string()))
        .build()
        .map_err(|e| TableError::ItemRejected {
            domain: domain.to_string(),
            message: e.to_string(),
        })?;
    Ok(WriteRequest::builder().put_request(put).build())
}

/// Recovers the domain name from a put request echoed back by the service.
fn request_domain(request: &WriteRequest) -> Option<String> {
    request
        .put_request()?
        .item()
        .get(DOMAIN_ATTRIBUTE)?
        .as_s()
        .ok()
        .cloned()
}

#[async_trait]
impl DomainTable for DynamoDbDomainTable {
    async fn upsert_batch(&self, domains: &[String]) -> Result<(), TableError> {
        if domains.is_empty() {
            return Ok(());
        }

        let mut pending = domains
            .iter()
            .map(|domain| put_request(domain))
            .collect::<Result<Vec<_>, _>>()?;

        for attempt in 0..=UNPROCESSED_RESUBMIT_LIMIT {
            if attempt > 0 {
                warn!(
                    "Resubmitting {} unprocessed item(s) to {} (attempt {})",
                    pending.len(),
                    self.table_name,
                    attempt
                );
            }

            let output = self
                .client
                .batch_write_item()
                .request_items(&self.table_name, pending)
                .send()
                .await
                .map_err(|e| TableError::Request(DisplayErrorContext(&e).to_string()))?;

            pending = output
                .unprocessed_items()
                .and_then(|items| items.get(&self.table_name))
                .cloned()
                .unwrap_or_default();

            if pending.is_empty() {
                debug!("BatchWriteItem accepted {} item(s)", domains.len());
                return Ok(());
            }
        }

        Err(TableError::Unprocessed {
            domains: pending.iter().filter_map(request_domain).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::operation::batch_write_item::{BatchWriteItemError, BatchWriteItemOutput};
    use aws_sdk_dynamodb::types::error::ResourceNotFoundException;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};

    const TABLE: &str = "interesting-domains";

    fn owned(domains: &[&str]) -> Vec<String> {
        domains.iter().map(|d| d.to_string()).collect()
    }

    fn accepted() -> BatchWriteItemOutput {
        BatchWriteItemOutput::builder().build()
    }

    fn unprocessed(domains: &[&str]) -> BatchWriteItemOutput {
        let requests = domains.iter().map(|d| put_request(d).unwrap()).collect();
        BatchWriteItemOutput::builder()
            .unprocessed_items(TABLE, requests)
            .build()
    }

    #[tokio::test]
    async fn test_upsert_batch_single_request() {
        let rule = mock!(Client::batch_write_item)
            .match_requests(|req| {
                req.request_items()
                    .and_then(|items| items.get(TABLE))
                    .map(|requests| requests.len())
                    == Some(2)
            })
            .then_output(accepted);
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);
        let table = DynamoDbDomainTable::new(client, TABLE);

        table
            .upsert_batch(&owned(&["a.com", "b.com"]))
            .await
            .unwrap();
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_upsert_batch_empty_sends_nothing() {
        let rule = mock!(Client::batch_write_item).then_output(accepted);
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);
        let table = DynamoDbDomainTable::new(client, TABLE);

        table.upsert_batch(&[]).await.unwrap();
        assert_eq!(rule.num_calls(), 0);
    }

    #[tokio::test]
    async fn test_upsert_batch_resubmits_unprocessed_items() {
        let rule = mock!(Client::batch_write_item)
            .sequence()
            .output(|| unprocessed(&["b.com"]))
            .output(accepted)
            .build();
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&rule]);
        let table = DynamoDbDomainTable::new(client, TABLE);

        table
            .upsert_batch(&owned(&["a.com", "b.com"]))
            .await
            .unwrap();
        assert_eq!(rule.num_calls(), 2);
    }

    #[tokio::test]
    async fn test_upsert_batch_gives_up_after_resubmit_limit() {
        let rule = mock!(Client::batch_write_item)
            .sequence()
            .output(|| unprocessed(&["b.com", "c.com"]))
            .times(UNPROCESSED_RESUBMIT_LIMIT + 1)
            .build();
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&rule]);
        let table = DynamoDbDomainTable::new(client, TABLE);

        let err = table
            .upsert_batch(&owned(&["a.com", "b.com", "c.com"]))
            .await
            .unwrap_err();
        match err {
            TableError::Unprocessed { domains } => {
                assert_eq!(domains, owned(&["b.com", "c.com"]));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(rule.num_calls(), UNPROCESSED_RESUBMIT_LIMIT + 1);
    }

    #[tokio::test]
    async fn test_upsert_batch_request_failure() {
        let rule = mock!(Client::batch_write_item).then_error(|| {
            BatchWriteItemError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("table missing")
                    .build(),
            )
        });
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);
        let table = DynamoDbDomainTable::new(client, TABLE);

        let err = table.upsert_batch(&owned(&["a.com"])).await.unwrap_err();
        assert!(matches!(err, TableError::Request(_)), "got {err:?}");
    }

    #[test]
    fn test_put_request_shape() {
        let request = put_request("example.com").unwrap();
        let item = request.put_request().unwrap().item();
        assert_eq!(item.len(), 1);
        assert_eq!(
            item.get(DOMAIN_ATTRIBUTE),
            Some(&AttributeValue::S("example.com".to_string()))
        );
    }

    #[test]
    fn test_request_domain_round_trip() {
        let request = put_request("example.co.uk").unwrap();
        assert_eq!(request_domain(&request).as_deref(), Some("example.co.uk"));
    }

    #[test]
    fn test_request_domain_ignores_deletes() {
        let request = WriteRequest::builder().build();
        assert_eq!(request_domain(&request), None);
    }
}
