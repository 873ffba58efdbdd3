//! Process Configuration
//!
//! One process runs one service role. Everything is settable through the
//! environment so replicas can be configured the same way the deployment
//! scripts always did (`PORT`, `DB_FILE`, `PEER_URL`, ...); flags exist for
//! local runs.

use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Replicated catalog/order storefront services")]
pub struct Cli {
    /// Interface to bind the HTTP listener on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0", global = true)]
    pub host: IpAddr,

    #[arg(long, env = "LOG_LEVEL", default_value_t = tracing::Level::INFO, global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub role: Role,
}

#[derive(Debug, Subcommand)]
pub enum Role {
    /// Run a catalog replica.
    Catalog(CatalogConfig),
    /// Run an order replica.
    Order(OrderConfig),
    /// Run the gateway.
    Gateway(GatewayConfig),
}

#[derive(Debug, Clone, clap::Args)]
pub struct CatalogConfig {
    #[arg(long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// Local book store of this replica.
    #[arg(long, env = "DB_FILE", default_value = "catalog.json")]
    pub db_file: PathBuf,

    /// Copied into place when `db_file` does not exist yet.
    #[arg(long, env = "SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// Base URL of the peer catalog replica.
    #[arg(long, env = "PEER_URL")]
    pub peer_url: Option<String>,

    /// Base URL of the gateway that receives cache invalidations.
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct OrderConfig {
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    #[arg(long, env = "DB_FILE", default_value = "orders.json")]
    pub db_file: PathBuf,

    #[arg(long, env = "SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// Base URL of the peer order replica.
    #[arg(long, env = "PEER_URL")]
    pub peer_url: Option<String>,

    /// Comma-separated catalog replica base URLs.
    #[arg(long, env = "CATALOG_REPLICAS")]
    pub catalog_replicas: Option<String>,

    /// Used when no catalog replica list is configured.
    #[arg(long, env = "CATALOG_URL", default_value = "http://localhost:4000")]
    pub catalog_url: String,
}

#[derive(Debug, Clone, clap::Args)]
pub struct GatewayConfig {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "CATALOG_REPLICAS")]
    pub catalog_replicas: Option<String>,

    #[arg(long, env = "CATALOG_URL", default_value = "http://localhost:4000")]
    pub catalog_url: String,

    #[arg(long, env = "ORDER_REPLICAS")]
    pub order_replicas: Option<String>,

    #[arg(long, env = "ORDER_URL", default_value = "http://localhost:5000")]
    pub order_url: String,

    #[arg(
        long,
        env = "CACHE_ENABLED",
        default_value = "true",
        value_parser = BoolishValueParser::new(),
        action = clap::ArgAction::Set
    )]
    pub cache_enabled: bool,

    /// Maximum number of cached info entries.
    #[arg(long, env = "CACHE_MAX", default_value_t = 30)]
    pub cache_max: usize,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Catalog(_) => "catalog",
            Role::Order(_) => "order",
            Role::Gateway(_) => "gateway",
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            Role::Catalog(c) => c.port,
            Role::Order(c) => c.port,
            Role::Gateway(c) => c.port,
        }
    }
}

impl Cli {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.role.port())
    }
}
