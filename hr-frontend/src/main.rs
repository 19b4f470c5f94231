use dotenvy::dotenv;
use hr_frontend::access::HR_CATALOG;
use hr_frontend::config::get_configuration;
use hr_frontend::services::{BackendClient, HttpRoleStore, HttpSessionSource};
use hr_frontend::startup::build_router;
use hr_frontend::AppState;
use service_core::middleware::metrics::install_prometheus_recorder;
use service_core::observability::logging::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "hr-frontend",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    let metrics_handle = install_prometheus_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))?;

    let backend = Arc::new(
        BackendClient::new(&configuration.backend)
            .map_err(|e| anyhow::anyhow!("Failed to build backend client: {}", e))?,
    );
    info!(backend_url = backend.base_url(), "Backend client configured");

    let state = AppState::new(
        Arc::new(HttpSessionSource::new(backend.clone())),
        Arc::new(HttpRoleStore::new(backend)),
        &HR_CATALOG,
    )
    .with_metrics(metrics_handle);

    let app = build_router(state);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting hr-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
