use pharmacy_audit::{api, AppConfig, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging with local timestamps
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // Configuration
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config)?);
    info!("Reference catalog: {}", state.reference.url());

    let app = api::router(state);

    info!("Pharmacy Audit Backend listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /health          - health check");
    info!("  POST /api/upload      - audit invoice, JSON report");
    info!("  POST /api/upload/csv  - audit invoice, CSV report");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
