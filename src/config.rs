use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiConfig;

/// Where finished captures go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Straight into `download_dir`, no questions asked.
    #[default]
    Directory,
    /// Native save dialog opened in `download_dir`.
    Dialog,
}

/// Settings loaded from `~/.config/webpage-capture/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the capture service (`/api/capture` is appended).
    pub endpoint: String,
    /// Target directory; defaults to `~/Downloads`.
    pub download_dir: Option<PathBuf>,
    pub save_mode: SaveMode,
    /// Seconds a success notice stays up before the form returns to idle.
    pub status_clear_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: ApiConfig::default().base_url,
            download_dir: None,
            save_mode: SaveMode::Directory,
            status_clear_secs: 3,
        }
    }
}

impl AppConfig {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.endpoint.clone(),
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join("Downloads"))
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    pub fn status_clear_delay(&self) -> Duration {
        Duration::from_secs(self.status_clear_secs)
    }
}

pub fn config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("webpage-capture")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load the config file if there is one; otherwise use defaults.
pub fn load() -> Result<AppConfig> {
    match config_path()? {
        Some(path) => load_from(&path),
        None => Ok(AppConfig::default()),
    }
}

pub fn load_from(path: &Path) -> Result<AppConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: AppConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    url::Url::parse(&cfg.endpoint)
        .with_context(|| format!("invalid endpoint {:?} in {}", cfg.endpoint, path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}
