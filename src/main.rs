use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use storefront::cache::InfoCache;
use storefront::catalog::service::CatalogReplica;
use storefront::catalog::types::Book;
use storefront::config::{CatalogConfig, Cli, GatewayConfig, OrderConfig, Role};
use storefront::dispatcher::ReplicaSet;
use storefront::gateway::service::Gateway;
use storefront::order::service::OrderReplica;
use storefront::order::types::Order;
use storefront::storage::file::JsonFileStore;
use storefront::transport::http::HttpTransport;
use storefront::{catalog, gateway, order};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    let bind_addr = cli.bind_addr();
    tracing::info!("Starting {} service on {}", cli.role.name(), bind_addr);
    let transport = Arc::new(HttpTransport::new());

    let app = match cli.role {
        Role::Catalog(cfg) => build_catalog(cfg, transport).await?,
        Role::Order(cfg) => build_order(cfg, transport).await?,
        Role::Gateway(cfg) => build_gateway(cfg, transport),
    };

    serve(bind_addr, app).await
}

async fn build_catalog(
    cfg: CatalogConfig,
    transport: Arc<HttpTransport>,
) -> anyhow::Result<axum::Router> {
    let store = JsonFileStore::<Book>::new(&cfg.db_file);
    if let Some(seed) = &cfg.seed_file {
        store.seed_from(seed).await?;
    }

    tracing::info!("Catalog store: {}", cfg.db_file.display());
    tracing::info!("Peer catalog: {:?}", cfg.peer_url);
    tracing::info!("Gateway for invalidation: {:?}", cfg.frontend_url);

    let replica = CatalogReplica::new(Arc::new(store), transport.clone(), transport)
        .with_peer(cfg.peer_url)
        .with_gateway(cfg.frontend_url);

    Ok(catalog::handlers::router(Arc::new(replica)))
}

async fn build_order(
    cfg: OrderConfig,
    transport: Arc<HttpTransport>,
) -> anyhow::Result<axum::Router> {
    let store = JsonFileStore::<Order>::new(&cfg.db_file);
    if let Some(seed) = &cfg.seed_file {
        store.seed_from(seed).await?;
    }

    let catalog_replicas =
        ReplicaSet::from_list_str(cfg.catalog_replicas.as_deref(), &cfg.catalog_url);

    tracing::info!("Order store: {}", cfg.db_file.display());
    tracing::info!("Catalog replicas: {:?}", catalog_replicas.addresses());
    tracing::info!("Peer order replica: {:?}", cfg.peer_url);

    let replica = OrderReplica::open(
        Arc::new(store),
        catalog_replicas,
        transport.clone(),
        transport,
    )
    .await?
    .with_peer(cfg.peer_url);

    Ok(order::handlers::router(Arc::new(replica)))
}

fn build_gateway(cfg: GatewayConfig, transport: Arc<HttpTransport>) -> axum::Router {
    let catalog_replicas =
        ReplicaSet::from_list_str(cfg.catalog_replicas.as_deref(), &cfg.catalog_url);
    let order_replicas = ReplicaSet::from_list_str(cfg.order_replicas.as_deref(), &cfg.order_url);

    tracing::info!("Catalog replicas: {:?}", catalog_replicas.addresses());
    tracing::info!("Order replicas: {:?}", order_replicas.addresses());
    tracing::info!(
        "Cache enabled: {} (max {} entries)",
        cfg.cache_enabled,
        cfg.cache_max
    );

    let gateway = Gateway::new(
        catalog_replicas,
        order_replicas,
        InfoCache::new(cfg.cache_enabled, cfg.cache_max),
        transport.clone(),
        transport,
    );

    gateway::handlers::router(Arc::new(gateway))
}

async fn serve(bind_addr: SocketAddr, app: axum::Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app).await?;

    Ok(())
}
