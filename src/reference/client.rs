use crate::config::ReferenceConfig;
use crate::error::ReferenceError;
use crate::models::ReferenceRecord;
use std::time::Duration;

/// HTTP client for the reference drug catalog
#[derive(Debug, Clone)]
pub struct ReferenceClient {
    http: reqwest::Client,
    url: String,
}

impl ReferenceClient {
    pub fn new(config: &ReferenceConfig) -> Result<Self, ReferenceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ReferenceError::Network)?;

        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the full catalog
    pub async fn fetch_all(&self) -> Result<Vec<ReferenceRecord>, ReferenceError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(ReferenceError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReferenceError::Status(status.as_u16()));
        }

        let records: Vec<ReferenceRecord> =
            response.json().await.map_err(ReferenceError::Decode)?;
        tracing::info!("Fetched {} reference drugs from {}", records.len(), self.url);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/drugs", addr)
    }

    fn client(url: String) -> ReferenceClient {
        ReferenceClient::new(&ReferenceConfig { url, timeout_secs: 5 }).unwrap()
    }

    #[tokio::test]
    async fn fetches_catalog() {
        let app = Router::new().route(
            "/drugs",
            get(|| async {
                Json(json!([
                    {"id": "1", "drugName": "Aspirin", "unitPrice": 0.5, "standardUnitPrice": 0.45,
                     "formulation": "Tablet", "strength": "100mg", "payer": "Medicare"},
                    {"id": 2, "drugName": "Ibuprofen", "unitPrice": 0.75, "standardUnitPrice": 0.7,
                     "formulation": "Capsule", "strength": "200mg", "payer": "Blue Cross",
                     "pricingNotes": "contract"}
                ]))
            }),
        );
        let records = client(serve(app).await).fetch_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].pricing_notes.as_deref(), Some("contract"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let app = Router::new().route("/drugs", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let err = client(serve(app).await).fetch_all().await.unwrap_err();
        assert!(matches!(err, ReferenceError::Status(503)));
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let app = Router::new().route("/drugs", get(|| async { Json(json!({"drugs": []})) }));
        let err = client(serve(app).await).fetch_all().await.unwrap_err();
        assert!(matches!(err, ReferenceError::Decode(_)));
    }
}
