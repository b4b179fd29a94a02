use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::TenantRecord;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// JSON tenants file, resolved relative to the config file.
    #[serde(default)]
    pub tenants_file: Option<PathBuf>,
    #[serde(default)]
    pub tenants: Vec<TenantRecord>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://services.leadconnectorhq.com".to_string()
}
fn default_api_version() -> String {
    "2021-07-28".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}

/// Shape of the legacy `clubs-config.json` tenants file.
#[derive(Debug, Deserialize)]
struct TenantsFile {
    #[serde(alias = "tenants")]
    clubs: Vec<TenantRecord>,
}

impl Config {
    /// Override the port of `server.bind`, keeping its host.
    pub fn with_port(mut self, port: u16) -> Self {
        let host = match self.server.bind.rsplit_once(':') {
            Some((host, _)) => host.to_string(),
            None => self.server.bind.clone(),
        };
        self.server.bind = format!("{}:{}", host, port);
        self
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if let Some(file) = config.tenants_file.clone() {
        let file = match path.parent() {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file,
        };
        let mut records = load_tenants_file(&file)?;
        config.tenants.append(&mut records);
        config.tenants_file = Some(file);
    }

    if config.server.bind.trim().is_empty() {
        bail!("server.bind must not be empty");
    }

    if config.upstream.timeout_secs == 0 {
        bail!("upstream.timeout_secs must be > 0");
    }

    if !(config.upstream.base_url.starts_with("http://")
        || config.upstream.base_url.starts_with("https://"))
    {
        bail!(
            "upstream.base_url must be an http(s) URL, got '{}'",
            config.upstream.base_url
        );
    }

    if let Ok(port) = std::env::var("PORT") {
        let port: u16 = port
            .parse()
            .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        config = config.with_port(port);
    }

    Ok(config)
}

fn load_tenants_file(path: &Path) -> Result<Vec<TenantRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tenants file: {}", path.display()))?;
    let file: TenantsFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse tenants file: {}", path.display()))?;
    Ok(file.clubs)
}
