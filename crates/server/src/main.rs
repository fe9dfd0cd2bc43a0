use alertdesk_server::config::ServerConfig;
use alertdesk_server::rest::{self, AppState};
use alertdesk_server::store::{AppRegistry, MetricStore};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let state = AppState {
        apps: AppRegistry::new(config.app_ids.iter().cloned()),
        metrics: MetricStore::new(),
    };
    let app = rest::router(state);

    let listener = tokio::net::TcpListener::bind(config.rest_addr).await?;
    tracing::info!(addr = %config.rest_addr, apps = config.app_ids.len(), "REST server starting");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("REST server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
