use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::models::{ApiConfig, ErrorResponse, HealthResponse};
use crate::domain::CaptureRequest;

const CAPTURE_PATH: &str = "api/capture";
const HEALTH_PATH: &str = "api/health";

/// Shown when a failed capture carries no usable `error` field.
pub const GENERIC_FAILURE: &str = "Capture failed.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Server(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid capture endpoint: {0}")]
    InvalidEndpoint(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = Url::parse(&self.config.base_url).map_err(|e| {
            ApiError::InvalidEndpoint(format!("{}: {}", self.config.base_url, e))
        })?;
        // Keep any path prefix of the base URL.
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        base.join(path)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", path, e)))
    }

    /// POST the request and return the raw image/PDF body.
    ///
    /// A non-2xx answer is turned into `ApiError::Server` carrying the body's
    /// `error` field, or [`GENERIC_FAILURE`] when the body is not that JSON.
    pub async fn capture(&self, request: &CaptureRequest) -> Result<Bytes> {
        let url = self.endpoint(CAPTURE_PATH)?;
        tracing::debug!(
            %url,
            target_url = %request.url,
            format = ?request.format,
            "sending capture request"
        );

        let response = self.http.post(url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            tracing::warn!(%status, %message, "capture endpoint returned an error");
            return Err(ApiError::Server(message));
        }

        let body = response.bytes().await?;
        tracing::debug!(%status, bytes = body.len(), "capture body received");
        Ok(body)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.endpoint(HEALTH_PATH)?;

        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::Server(format!("Health check failed: {}", e)))?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutputFormat;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: server.url(),
        })
    }

    fn request(url: &str, format: OutputFormat) -> CaptureRequest {
        CaptureRequest::new(url, format).unwrap()
    }

    #[tokio::test]
    async fn capture_posts_json_and_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/capture")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"url": "example.com", "format": "pdf"})))
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(b"%PDF-1.4 fake")
            .create_async()
            .await;

        let body = client_for(&server)
            .capture(&request("example.com", OutputFormat::Pdf))
            .await
            .unwrap();

        assert_eq!(&body[..], b"%PDF-1.4 fake");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn capture_surfaces_server_error_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/capture")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "page timed out"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .capture(&request("example.com", OutputFormat::Png))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Server(ref m) if m == "page timed out"));
    }

    #[tokio::test]
    async fn capture_falls_back_on_unparseable_error_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/capture")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .capture(&request("example.com", OutputFormat::Png))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Server(ref m) if m == GENERIC_FAILURE));
    }

    #[tokio::test]
    async fn capture_falls_back_when_error_field_missing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/capture")
            .with_status(400)
            .with_body(r#"{"detail": "nope"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .capture(&request("example.com", OutputFormat::Png))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn health_reads_service_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "healthy", "service": "webpage-capture"}"#)
            .create_async()
            .await;
        // The server's catch-all answers unknown paths with its HTML page.
        let _spa = server
            .mock("GET", "/api/capture/health")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<!DOCTYPE html><html></html>")
            .create_async()
            .await;

        let health = client_for(&server).health().await.unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "webpage-capture");
    }

    #[tokio::test]
    async fn health_rejects_html_answer() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/health")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<!DOCTYPE html><html></html>")
            .create_async()
            .await;

        let err = client_for(&server).health().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = ApiClient::new(ApiConfig {
            base_url: "http://capture.local/proxy".to_string(),
        });
        assert_eq!(
            client.endpoint(CAPTURE_PATH).unwrap().as_str(),
            "http://capture.local/proxy/api/capture"
        );
    }

    #[test]
    fn endpoint_rejects_garbage_base() {
        let client = ApiClient::new(ApiConfig {
            base_url: "not a url".to_string(),
        });
        assert!(matches!(
            client.endpoint(CAPTURE_PATH),
            Err(ApiError::InvalidEndpoint(_))
        ));
    }
}
