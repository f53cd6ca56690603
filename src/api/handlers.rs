use crate::api::AppState;
use crate::error::AuditError;
use crate::export::report_to_csv;
use crate::ingest;
use crate::models::DiscrepancyReport;
use crate::service::detect;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Json, Multipart, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

/// Multipart field carrying the invoice file
pub const INVOICE_FIELD: &str = "invoice";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Uploaded invoice file
struct InvoiceUpload {
    file_name: String,
    bytes: Vec<u8>,
}

/// Health check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Pharmacy Audit Backend Running",
    })
}

/// Audit an uploaded invoice, JSON report
pub async fn upload_invoice(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DiscrepancyReport>, AuditError> {
    let report = audit_upload(&state, multipart).await?;
    Ok(Json(report))
}

/// Audit an uploaded invoice, CSV download
pub async fn upload_invoice_csv(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AuditError> {
    let report = audit_upload(&state, multipart).await?;
    let body = report_to_csv(&report)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"discrepancies.csv\"",
        ),
    ];
    Ok((StatusCode::OK, headers, body).into_response())
}

/// parse -> fetch reference -> detect
async fn audit_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<DiscrepancyReport, AuditError> {
    // 1. Read the invoice file
    let Ok(mut multipart) = multipart else {
        return Err(AuditError::MissingFile);
    };
    let upload = read_invoice(&mut multipart, state.config.upload.max_file_size).await?;
    tracing::info!(
        "Received invoice {} ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    // 2. Parse line items off the async runtime
    let items = tokio::task::spawn_blocking(move || {
        ingest::parse_invoice(&upload.file_name, &upload.bytes)
    })
    .await??;

    // 3. Fetch the reference catalog
    let records = state.reference.fetch_all().await?;

    // 4. Compare
    let report = detect(&items, &records);
    tracing::info!(
        "Audit complete: {} line items, {} issues, overcharge {:.2}",
        items.len(),
        report.summary.total_issues,
        report.summary.total_overcharge
    );
    Ok(report)
}

async fn read_invoice(
    multipart: &mut Multipart,
    max_file_size: usize,
) -> Result<InvoiceUpload, AuditError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, max_file_size))?
    {
        if field.name() != Some(INVOICE_FIELD) {
            continue;
        }

        // A plain text field is not a file upload
        let Some(file_name) = field.file_name().map(str::to_string) else {
            return Err(AuditError::MissingFile);
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| upload_error(e, max_file_size))?;

        if bytes.is_empty() {
            return Err(AuditError::MissingFile);
        }
        if bytes.len() > max_file_size {
            return Err(AuditError::FileTooLarge(max_file_size));
        }

        return Ok(InvoiceUpload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(AuditError::MissingFile)
}

fn upload_error(err: MultipartError, max_file_size: usize) -> AuditError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AuditError::FileTooLarge(max_file_size)
    } else {
        AuditError::Upload(err)
    }
}
