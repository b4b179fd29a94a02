//! # Member Lookup
//!
//! A multi-tenant lookup front-end that proxies contact search requests to a
//! third-party CRM, keyed by a per-location configuration.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────────┐
//! │  lookup.toml │──▶│    Tenant    │──▶│  HTTP router    │
//! │ + tenants    │   │   Registry   │   │  (axum)         │
//! └──────────────┘   └──────────────┘   └────────┬────────┘
//!                                                │ /api/{id}/search
//!                                                ▼
//!                    ┌──────────────┐   ┌─────────────────┐
//!                    │  Normalizer  │◀──│  Search proxy   │──▶ CRM API
//!                    └──────────────┘   └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and tenants file loading |
//! | [`models`] | Tenant, contact, and public config types |
//! | [`tenants`] | Case-insensitive registry of enabled tenants |
//! | [`upstream`] | CRM directory trait and HTTP client |
//! | [`search`] | Search proxy with the minimum-length rule |
//! | [`pages`] | Minimal HTML for the home and location pages |
//! | [`server`] | HTTP routes and error contract |

pub mod config;
pub mod models;
pub mod pages;
pub mod search;
pub mod server;
pub mod tenants;
pub mod upstream;
