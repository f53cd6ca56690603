pub mod handlers;

pub use handlers::*;

use crate::config::AppConfig;
use crate::error::ReferenceError;
use crate::reference::ReferenceClient;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Multipart framing allowance on top of the file size limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared request state
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub reference: ReferenceClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ReferenceError> {
        let reference = ReferenceClient::new(&config.reference)?;
        Ok(Self { config, reference })
    }
}

/// Build the HTTP router
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.upload.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health_check))
        .route("/api/upload", post(upload_invoice))
        .route("/api/upload/csv", post(upload_invoice_csv))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
