//! CRM contact directory.
//!
//! Defines the [`ContactDirectory`] trait, the seam between the search proxy
//! and the third-party CRM, and [`HttpDirectory`], the implementation that
//! calls the LeadConnector contacts API.
//!
//! # Request shape
//!
//! ```text
//! GET {base_url}/contacts/?locationId=<loc>&query=<text>&limit=10
//! Authorization: Bearer <tenant api key>
//! Version: 2021-07-28
//! ```
//!
//! The directory performs exactly one request per call. Failures are
//! reported as [`UpstreamError`] and never retried.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::models::{TenantRecord, UpstreamContact, UpstreamSearchResponse};

/// Maximum number of contacts requested from the CRM per search.
pub const SEARCH_LIMIT: usize = 10;

/// Failure talking to the CRM.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The CRM answered with a non-success status.
    #[error("upstream rejected request with status {status}")]
    Rejected { status: u16, body: String },
    /// The request never completed or the body could not be decoded.
    #[error("upstream transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport(err.to_string())
    }
}

/// A source of contacts scoped to one tenant.
///
/// Implementations must be stateless between calls so that searches for
/// different tenants can run concurrently.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Search the tenant's contacts, returning at most `limit` raw records
    /// in the order the CRM ranks them.
    async fn search_contacts(
        &self,
        tenant: &TenantRecord,
        query: &str,
        limit: usize,
    ) -> Result<Vec<UpstreamContact>, UpstreamError>;
}

/// [`ContactDirectory`] backed by the CRM HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
}

impl HttpDirectory {
    /// Build a directory with a bounded per-request timeout.
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        })
    }
}

#[async_trait]
impl ContactDirectory for HttpDirectory {
    async fn search_contacts(
        &self,
        tenant: &TenantRecord,
        query: &str,
        limit: usize,
    ) -> Result<Vec<UpstreamContact>, UpstreamError> {
        let url = format!("{}/contacts/", self.base_url);
        let limit = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("locationId", tenant.upstream_location_id.as_str()),
                ("query", query),
                ("limit", limit.as_str()),
            ])
            .bearer_auth(tenant.upstream_api_key.expose())
            .header("Version", &self.api_version)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: UpstreamSearchResponse = response.json().await?;
        Ok(body.contacts.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let directory = HttpDirectory::new(&UpstreamConfig {
            base_url: "http://crm.local/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(directory.base_url, "http://crm.local");
    }

    #[test]
    fn test_rejected_error_message_has_status_only() {
        let err = UpstreamError::Rejected {
            status: 401,
            body: "invalid token pit-123".to_string(),
        };
        assert_eq!(err.to_string(), "upstream rejected request with status 401");
    }
}
