use async_trait::async_trait;
use crawler_core::PostRecord;
use crawler_logging::crawler_info;
use serde::Serialize;

use crate::types::CrawlError;

/// Outbound delivery of one run's record set. Called once, at the end of a
/// successful collection; a rejection or transport fault fails the run
/// (no retries).
#[async_trait]
pub trait DeliverySink: Send + Sync {
    async fn deliver(&self, search_term: &str, records: &[PostRecord]) -> Result<(), CrawlError>;
}

#[derive(Serialize)]
struct DeliveryPayload<'a> {
    search_term: &'a str,
    records: &'a [PostRecord],
}

/// HTTP webhook sink: POSTs the record set as JSON to a configured endpoint.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    endpoint: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DeliverySink for WebhookSink {
    async fn deliver(&self, search_term: &str, records: &[PostRecord]) -> Result<(), CrawlError> {
        let payload = DeliveryPayload {
            search_term,
            records,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|err| CrawlError::DeliveryTransport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::DeliveryStatus(status.as_u16()));
        }
        crawler_info!(
            "delivered {} records for {search_term} to {}",
            records.len(),
            self.endpoint
        );
        Ok(())
    }
}
