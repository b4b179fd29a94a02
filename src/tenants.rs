//! Tenant registry.
//!
//! Built once at startup from the configured [`TenantRecord`]s and shared
//! read-only with every request handler. Only enabled tenants are indexed,
//! so a disabled tenant is indistinguishable from one that was never
//! configured.
//!
//! Identifiers are lower-cased on insertion and on lookup:
//!
//! ```rust
//! use member_lookup::models::{Secret, TenantRecord};
//! use member_lookup::tenants::TenantRegistry;
//!
//! let registry = TenantRegistry::from_records(vec![TenantRecord {
//!     identifier: "Downtown".into(),
//!     display_name: "Downtown".into(),
//!     upstream_location_id: "loc_1".into(),
//!     upstream_api_key: Secret::new("pit-1"),
//!     referral_form_url: None,
//!     day_one_form_url: None,
//!     manual_entry_url: None,
//!     enabled: true,
//! }])
//! .unwrap();
//! assert!(registry.resolve("DOWNTOWN").is_some());
//! ```

use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::models::TenantRecord;

/// Read-only lookup from normalized identifier to tenant.
#[derive(Debug, Default)]
pub struct TenantRegistry {
    /// Enabled tenants in configuration order.
    tenants: Vec<TenantRecord>,
    index: HashMap<String, usize>,
}

/// Identifiers that collide with fixed top-level routes.
pub const RESERVED_IDENTIFIERS: &[&str] = &["health"];

/// Normalizes an identifier for registry keys.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.to_lowercase()
}

impl TenantRegistry {
    /// Build the registry, skipping disabled records.
    ///
    /// # Errors
    ///
    /// Fails if an enabled record is missing its identifier, upstream
    /// location id or API key, if its identifier contains `/` or is one of
    /// [`RESERVED_IDENTIFIERS`], or if two enabled records normalize to the
    /// same identifier.
    ///
    /// Surrounding whitespace is stripped from stored identifiers so that
    /// links rendered from a record resolve back to it.
    pub fn from_records(records: Vec<TenantRecord>) -> Result<Self> {
        let mut registry = Self::default();

        for mut record in records.into_iter().filter(|r| r.enabled) {
            record.identifier = record.identifier.trim().to_string();
            let key = normalize_identifier(&record.identifier);
            if key.is_empty() {
                bail!("tenant '{}' has an empty identifier", record.display_name);
            }
            if key.contains('/') {
                bail!("tenant identifier '{}' must not contain '/'", record.identifier);
            }
            if RESERVED_IDENTIFIERS.contains(&key.as_str()) {
                bail!("tenant identifier '{}' is reserved", record.identifier);
            }
            if record.upstream_location_id.trim().is_empty() {
                bail!("tenant '{}' is enabled but has no upstream location id", key);
            }
            if record.upstream_api_key.is_empty() {
                bail!("tenant '{}' is enabled but has no upstream API key", key);
            }
            if registry.index.contains_key(&key) {
                bail!("duplicate tenant identifier '{}'", key);
            }

            registry.index.insert(key, registry.tenants.len());
            registry.tenants.push(record);
        }

        Ok(registry)
    }

    /// Look up an enabled tenant, ignoring case.
    pub fn resolve(&self, identifier: &str) -> Option<&TenantRecord> {
        self.index
            .get(&normalize_identifier(identifier))
            .map(|&i| &self.tenants[i])
    }

    /// Enabled tenants in configuration order.
    pub fn enabled(&self) -> &[TenantRecord] {
        &self.tenants
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}
