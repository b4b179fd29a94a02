//! Contact search proxy.
//!
//! Forwards a tenant-scoped query to a [`ContactDirectory`] and normalizes
//! the result into [`Contact`]s.
//!
//! # Behavior
//!
//! | Input | Result |
//! |-------|--------|
//! | query shorter than [`MIN_QUERY_CHARS`] | `Ok(vec![])`, directory not called |
//! | directory succeeds | normalized contacts, upstream order |
//! | directory returns non-success status | `Err(UpstreamError::Rejected)`, logged |
//! | transport or decode failure | `Err(UpstreamError::Transport)`, logged |
//!
//! There is a single attempt per search.

use tracing::{debug, debug_span, error, Instrument};

use crate::models::{Contact, SearchQuery, TenantRecord};
use crate::upstream::{ContactDirectory, UpstreamError, SEARCH_LIMIT};

/// Queries with fewer characters than this never reach the CRM.
pub const MIN_QUERY_CHARS: usize = 2;

/// Whether `query_text` is long enough to forward.
pub fn is_searchable(query_text: &str) -> bool {
    query_text.chars().count() >= MIN_QUERY_CHARS
}

/// Search one tenant's contacts.
pub async fn search_contacts(
    directory: &dyn ContactDirectory,
    tenant: &TenantRecord,
    query_text: &str,
) -> Result<Vec<Contact>, UpstreamError> {
    if !is_searchable(query_text) {
        return Ok(Vec::new());
    }

    debug!(tenant = %tenant.identifier, "forwarding contact search");

    match directory
        .search_contacts(tenant, query_text, SEARCH_LIMIT)
        .await
    {
        Ok(raw) => Ok(raw.into_iter().map(Contact::from_upstream).collect()),
        Err(err) => {
            match &err {
                UpstreamError::Rejected { status, body } => {
                    error!(tenant = %tenant.identifier, status, body = %body, "CRM API error");
                }
                UpstreamError::Transport(message) => {
                    error!(tenant = %tenant.identifier, error = %message, "CRM search failed");
                }
            }
            Err(err)
        }
    }
}

/// Run a [`SearchQuery`] against its already-resolved tenant.
///
/// The request's identifier may differ in case from the configured one; it
/// is recorded as requested.
pub async fn run_search(
    directory: &dyn ContactDirectory,
    tenant: &TenantRecord,
    query: &SearchQuery,
) -> Result<Vec<Contact>, UpstreamError> {
    let span = debug_span!(
        "contact_search",
        requested = %query.tenant_identifier,
        tenant = %tenant.identifier,
    );
    search_contacts(directory, tenant, &query.query_text)
        .instrument(span)
        .await
}
