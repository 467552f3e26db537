use anyhow::Result;
use shop::config::ShopConfig;
use shop::server::{ServerBuilder, ShopHost, Stores};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ShopConfig::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        backend = ?config.storage.backend,
        address = %config.bind_address(),
        "Starting smart-shop"
    );

    let stores = Stores::from_config(&config.storage).await?;
    let host = ShopHost::new(stores, config.checkout.retry.clone());

    ServerBuilder::new()
        .with_host(host)
        .serve(&config.bind_address())
        .await
}
