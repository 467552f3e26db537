//! ServerBuilder for fluent API to build HTTP servers

use super::host::ShopHost;
use super::router::{build_shop_routes, with_http_layers};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the shop HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_host(ShopHost::in_memory())
///     .build()?;
/// ```
pub struct ServerBuilder {
    host: Option<Arc<ShopHost>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            host: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the host whose services are exposed (required)
    pub fn with_host(mut self, host: ShopHost) -> Self {
        self.host = Some(Arc::new(host));
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for endpoints outside the shop itself, such as webhooks
    /// or readiness checks owned by the deployment.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final router with tracing and CORS layers
    pub fn build(self) -> Result<Router> {
        let host = self
            .host
            .ok_or_else(|| anyhow::anyhow!("ShopHost is required. Call .with_host()"))?;

        let mut app = build_shop_routes(host);
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        Ok(with_http_layers(app))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C) for graceful shutdown.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
