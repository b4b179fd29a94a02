//! # Member Lookup CLI (`member-lookup`)
//!
//! ## Usage
//!
//! ```bash
//! member-lookup --config ./config/lookup.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `member-lookup serve` | Start the HTTP server |
//! | `member-lookup tenants` | List enabled locations |
//! | `member-lookup check` | Validate configuration and tenants |
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use member_lookup::config::{self, Config};
use member_lookup::server;
use member_lookup::tenants::TenantRegistry;

/// Member Lookup — a multi-tenant contact search front-end for a CRM.
#[derive(Parser)]
#[command(name = "member-lookup", version)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/lookup.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` (or `PORT`) and serves the lookup pages
    /// and the `/api/{location}/...` endpoints.
    Serve {
        /// Override the bind address, e.g. `127.0.0.1:8080`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// List enabled locations.
    ///
    /// Prints identifier and display name; credentials are never printed.
    Tenants,

    /// Validate the configuration without starting the server.
    Check,
}

fn load_registry(cfg: &Config) -> anyhow::Result<TenantRegistry> {
    TenantRegistry::from_records(cfg.tenants.clone()).context("Invalid tenant configuration")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            server::run_server(&cfg).await?;
        }
        Commands::Tenants => {
            let registry = load_registry(&cfg)?;
            for tenant in registry.enabled() {
                println!("{}\t{}", tenant.identifier, tenant.display_name);
            }
        }
        Commands::Check => {
            let registry = load_registry(&cfg)?;
            let disabled = cfg.tenants.len() - registry.len();
            println!("config ok: {}", cli.config.display());
            println!("  enabled tenants: {}", registry.len());
            println!("  disabled tenants: {}", disabled);
            println!("  upstream: {}", cfg.upstream.base_url);
            println!("  bind: {}", cfg.server.bind);
        }
    }

    Ok(())
}
