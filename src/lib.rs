pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod models;
pub mod reference;
pub mod service;

pub use api::AppState;
pub use config::AppConfig;
pub use error::{AuditError, IngestError, ReferenceError};
pub use reference::ReferenceClient;
pub use service::detect;
