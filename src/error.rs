use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Spreadsheet ingestion failures
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Invoice must have at least 4 rows (3 header rows + data), found {0}")]
    TooFewRows(usize),
}

/// Reference catalog fetch failures
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Reference catalog unreachable: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Reference catalog returned HTTP {0}")]
    Status(u16),

    #[error("Reference catalog payload invalid: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Upload pipeline failures, mapped onto HTTP responses
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Uploaded file exceeds {0} bytes")]
    FileTooLarge(usize),

    #[error("Malformed upload: {0}")]
    Upload(#[from] MultipartError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AuditError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuditError::MissingFile => (StatusCode::BAD_REQUEST, "No file uploaded"),
            AuditError::FileTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "File too large"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process file"),
        };

        if status.is_server_error() {
            tracing::error!("Error processing file: {}", self);
        } else {
            tracing::warn!("Upload rejected: {}", self);
        }

        let body = ErrorResponse {
            error: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
