use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Pdf,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Png, OutputFormat::Pdf];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => f.write_str("PNG image"),
            OutputFormat::Pdf => f.write_str("PDF document"),
        }
    }
}

/// What gets sent to the capture endpoint. Serializes to `{"url", "format"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureRequest {
    pub url: String,
    pub format: OutputFormat,
}

impl CaptureRequest {
    pub fn new(url: &str, format: OutputFormat) -> Result<Self, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::Validation);
        }

        Ok(Self {
            url: url.to_string(),
            format,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capturing,
    Saving,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    InProgress(Stage),
    Succeeded(PathBuf),
    Failed(String),
}

impl Status {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Status::InProgress(_))
    }
}
