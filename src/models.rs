//! Core data models used throughout Member Lookup.
//!
//! These types represent the tenant records loaded at startup, the partial
//! contact records returned by the CRM, and the normalized shapes that are
//! sent back to browser clients.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A credential that must never be printed or serialized to clients.
///
/// `Debug` is redacted so a tenant record can be logged safely.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw credential. Only the upstream client should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// One configured location with its own CRM credentials and form links.
///
/// Accepts both the snake_case keys used in `lookup.toml` and the camelCase
/// keys of the legacy `clubs-config.json` tenants file.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantRecord {
    #[serde(alias = "slug")]
    pub identifier: String,
    #[serde(alias = "clubName", alias = "displayName")]
    pub display_name: String,
    #[serde(default, alias = "ghlLocationId", alias = "upstreamLocationId")]
    pub upstream_location_id: String,
    #[serde(default, alias = "ghlApiKey", alias = "upstreamApiKey")]
    pub upstream_api_key: Secret,
    #[serde(default, alias = "referralFormUrl")]
    pub referral_form_url: Option<String>,
    #[serde(default, alias = "dayOneFormUrl")]
    pub day_one_form_url: Option<String>,
    #[serde(default, alias = "manualEntryUrl")]
    pub manual_entry_url: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

/// A contact record as returned by the CRM.
///
/// Every field is optional; [`Contact::from_upstream`] is the only place
/// that deals with missing values. Scalar values of the wrong type (a
/// numeric phone, say) are kept as their text form so one odd record does
/// not fail the whole response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamContact {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
}

/// Strings pass through, numbers and booleans become text, anything else
/// counts as missing.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Body of a successful CRM contact search.
#[derive(Debug, Default, Deserialize)]
pub struct UpstreamSearchResponse {
    #[serde(default)]
    pub contacts: Option<Vec<UpstreamContact>>,
}

/// A normalized contact. Every field is always present as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Trimmed `"{first_name} {last_name}"`, never taken from the CRM.
    #[serde(rename = "name")]
    pub display_name: String,
}

impl Contact {
    pub fn from_upstream(raw: UpstreamContact) -> Self {
        let first_name = raw.first_name.unwrap_or_default();
        let last_name = raw.last_name.unwrap_or_default();
        let display_name = format!("{} {}", first_name, last_name).trim().to_string();
        Self {
            id: raw.id.unwrap_or_default(),
            first_name,
            last_name,
            email: raw.email.unwrap_or_default(),
            phone: raw.phone.unwrap_or_default(),
            display_name,
        }
    }
}

/// The subset of a tenant's configuration that browser clients may see.
///
/// Built only from display fields; the API key and upstream location id
/// have no representation here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub club_name: String,
    pub referral_form_url: String,
    pub day_one_form_url: String,
    pub manual_entry_url: String,
}

impl From<&TenantRecord> for PublicConfig {
    fn from(tenant: &TenantRecord) -> Self {
        Self {
            club_name: tenant.display_name.clone(),
            referral_form_url: tenant.referral_form_url.clone().unwrap_or_default(),
            day_one_form_url: tenant.day_one_form_url.clone().unwrap_or_default(),
            manual_entry_url: tenant.manual_entry_url.clone().unwrap_or_default(),
        }
    }
}

/// A search request scoped to one tenant.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub tenant_identifier: String,
    pub query_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantRecord {
        TenantRecord {
            identifier: "downtown".to_string(),
            display_name: "Downtown".to_string(),
            upstream_location_id: "loc_123".to_string(),
            upstream_api_key: Secret::new("pit-secret"),
            referral_form_url: Some("https://forms.example/referral".to_string()),
            day_one_form_url: None,
            manual_entry_url: None,
            enabled: true,
        }
    }

    #[test]
    fn test_from_upstream_defaults_missing_fields() {
        let contact = Contact::from_upstream(UpstreamContact::default());
        assert_eq!(contact.id, "");
        assert_eq!(contact.first_name, "");
        assert_eq!(contact.email, "");
        assert_eq!(contact.display_name, "");
    }

    #[test]
    fn test_display_name_is_trimmed() {
        let contact = Contact::from_upstream(UpstreamContact {
            first_name: Some("Jo".to_string()),
            ..Default::default()
        });
        assert_eq!(contact.display_name, "Jo");

        let contact = Contact::from_upstream(UpstreamContact {
            last_name: Some("Smith".to_string()),
            ..Default::default()
        });
        assert_eq!(contact.display_name, "Smith");
    }

    #[test]
    fn test_upstream_nulls_deserialize_as_missing() {
        let raw: UpstreamContact = serde_json::from_str(
            r#"{"id":"c1","firstName":null,"lastName":"Smith","email":"s@x.com","name":"ignored"}"#,
        )
        .unwrap();
        let contact = Contact::from_upstream(raw);
        assert_eq!(contact.first_name, "");
        assert_eq!(contact.phone, "");
        assert_eq!(contact.display_name, "Smith");
    }

    #[test]
    fn test_non_string_fields_are_kept_as_text() {
        let body: UpstreamSearchResponse = serde_json::from_str(
            r#"{"contacts":[
                {"id":"c1","firstName":"Jo","phone":5551234},
                {"id":42,"lastName":["x"],"email":{"primary":"a@b"},"phone":true}
            ]}"#,
        )
        .unwrap();
        let contacts: Vec<Contact> = body
            .contacts
            .unwrap()
            .into_iter()
            .map(Contact::from_upstream)
            .collect();
        assert_eq!(contacts[0].phone, "5551234");
        assert_eq!(contacts[0].display_name, "Jo");
        assert_eq!(contacts[1].id, "42");
        assert_eq!(contacts[1].last_name, "");
        assert_eq!(contacts[1].email, "");
        assert_eq!(contacts[1].phone, "true");
    }

    #[test]
    fn test_contact_serializes_with_client_keys() {
        let contact = Contact::from_upstream(UpstreamContact {
            id: Some("c1".to_string()),
            first_name: Some("Jo".to_string()),
            last_name: Some("Smith".to_string()),
            email: Some("jo@x.com".to_string()),
            phone: None,
        });
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "c1",
                "firstName": "Jo",
                "lastName": "Smith",
                "email": "jo@x.com",
                "phone": "",
                "name": "Jo Smith"
            })
        );
    }

    #[test]
    fn test_public_config_fills_missing_urls() {
        let config = PublicConfig::from(&tenant());
        assert_eq!(config.club_name, "Downtown");
        assert_eq!(config.referral_form_url, "https://forms.example/referral");
        assert_eq!(config.day_one_form_url, "");
        assert_eq!(config.manual_entry_url, "");
    }

    #[test]
    fn test_public_config_never_carries_secrets() {
        let json = serde_json::to_string(&PublicConfig::from(&tenant())).unwrap();
        assert!(!json.contains("pit-secret"));
        assert!(!json.contains("loc_123"));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let printed = format!("{:?}", tenant());
        assert!(!printed.contains("pit-secret"));
        assert!(printed.contains("Secret(***)"));
    }

    #[test]
    fn test_tenant_accepts_legacy_keys() {
        let record: TenantRecord = serde_json::from_str(
            r#"{
                "slug": "Downtown",
                "clubName": "Downtown Club",
                "ghlLocationId": "loc_1",
                "ghlApiKey": "pit-1",
                "dayOneFormUrl": "https://forms.example/day-one",
                "enabled": true
            }"#,
        )
        .unwrap();
        assert_eq!(record.identifier, "Downtown");
        assert_eq!(record.display_name, "Downtown Club");
        assert_eq!(record.upstream_api_key.expose(), "pit-1");
        assert_eq!(
            record.day_one_form_url.as_deref(),
            Some("https://forms.example/day-one")
        );
    }

    #[test]
    fn test_tenant_enabled_defaults_false() {
        let record: TenantRecord =
            serde_json::from_str(r#"{"slug":"x","clubName":"X"}"#).unwrap();
        assert!(!record.enabled);
    }
}
