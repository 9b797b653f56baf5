use std::path::PathBuf;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::download::DownloadTrigger;
use crate::{
    api::{ApiClient, ApiError, HealthResponse},
    domain::{AppError, CaptureRequest, OutputFormat},
    utils::capture_filename,
};

/// Turns one capture request into a saved file.
///
/// One attempt per submission: no retry, no cancellation.
#[derive(Clone)]
pub struct CaptureCoordinator<T> {
    api_client: ApiClient,
    trigger: T,
}

impl<T: DownloadTrigger> CaptureCoordinator<T> {
    pub fn new(api_client: ApiClient, trigger: T) -> Self {
        Self {
            api_client,
            trigger,
        }
    }

    /// Validate, capture and save in one go.
    ///
    /// A blank URL fails with [`AppError::Validation`] before anything is sent.
    pub async fn submit(&self, url: &str, format: OutputFormat) -> Result<PathBuf, AppError> {
        let request = CaptureRequest::new(url, format)?;
        let bytes = self.capture(&request).await?;
        self.deliver(request.format, bytes, Utc::now()).await
    }

    pub async fn capture(&self, request: &CaptureRequest) -> Result<Bytes, AppError> {
        tracing::info!(url = %request.url, format = request.format.extension(), "capture started");

        self.api_client.capture(request).await.map_err(|e| {
            tracing::warn!(url = %request.url, error = %e, "capture failed");
            map_api_error(e)
        })
    }

    pub async fn deliver(
        &self,
        format: OutputFormat,
        bytes: Bytes,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, AppError> {
        let filename = capture_filename(format, now);
        let size = bytes.len();

        match self.trigger.trigger(filename, bytes).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), bytes = size, "capture saved");
                Ok(path)
            }
            Err(e) => {
                tracing::warn!(error = %e, "saving capture failed");
                Err(e)
            }
        }
    }

    pub async fn check_health(&self) -> Result<HealthResponse, AppError> {
        self.api_client.health().await.map_err(map_api_error)
    }
}

fn map_api_error(err: ApiError) -> AppError {
    match err {
        ApiError::Server(message) => AppError::Request(message),
        ApiError::Request(e) => AppError::Request(e.to_string()),
        other => AppError::Unknown(other.to_string()),
    }
}
