//! Saving a finished capture to disk.
//!
//! The coordinator only knows the [`DownloadTrigger`] seam; which concrete
//! trigger runs is picked from the user's config.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::io::AsyncWriteExt;

use crate::config::{AppConfig, SaveMode};
use crate::domain::AppError;

pub trait DownloadTrigger: Send + Sync {
    /// Hand `bytes` to the user under `filename`, returning where it landed.
    ///
    /// The buffer is consumed and released once written.
    fn trigger(
        &self,
        filename: String,
        bytes: Bytes,
    ) -> BoxFuture<'static, Result<PathBuf, AppError>>;
}

/// Drops files straight into a downloads directory, like a browser does.
#[derive(Debug, Clone)]
pub struct DirectoryTrigger {
    dir: PathBuf,
}

impl DirectoryTrigger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadTrigger for DirectoryTrigger {
    fn trigger(
        &self,
        filename: String,
        bytes: Bytes,
    ) -> BoxFuture<'static, Result<PathBuf, AppError>> {
        let dir = self.dir.clone();
        async move {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| save_error(&dir, e))?;

            let (path, mut file) = create_unique(&dir, &filename, MAX_NAME_ATTEMPTS).await?;
            discard_on_error(&path, async {
                file.write_all(&bytes).await?;
                file.sync_all().await
            })
            .await?;

            Ok(path)
        }
        .boxed()
    }
}

/// Asks for a location with a native save dialog.
#[derive(Debug, Clone)]
pub struct DialogTrigger {
    start_dir: PathBuf,
}

impl DialogTrigger {
    pub fn new(start_dir: impl Into<PathBuf>) -> Self {
        Self {
            start_dir: start_dir.into(),
        }
    }
}

impl DownloadTrigger for DialogTrigger {
    fn trigger(
        &self,
        filename: String,
        bytes: Bytes,
    ) -> BoxFuture<'static, Result<PathBuf, AppError>> {
        let start_dir = self.start_dir.clone();
        async move {
            let path = rfd::AsyncFileDialog::new()
                .set_directory(&start_dir)
                .set_file_name(&filename)
                .save_file()
                .await
                .map(|handle| handle.path().to_path_buf())
                .ok_or(AppError::Cancelled)?;

            discard_on_error(&path, tokio::fs::write(&path, &bytes)).await?;

            Ok(path)
        }
        .boxed()
    }
}

/// Trigger selected by [`SaveMode`].
#[derive(Debug, Clone)]
pub enum AnyTrigger {
    Directory(DirectoryTrigger),
    Dialog(DialogTrigger),
}

impl AnyTrigger {
    pub fn from_config(config: &AppConfig) -> Self {
        let dir = config.download_dir();
        match config.save_mode {
            SaveMode::Directory => AnyTrigger::Directory(DirectoryTrigger::new(dir)),
            SaveMode::Dialog => AnyTrigger::Dialog(DialogTrigger::new(dir)),
        }
    }
}

impl DownloadTrigger for AnyTrigger {
    fn trigger(
        &self,
        filename: String,
        bytes: Bytes,
    ) -> BoxFuture<'static, Result<PathBuf, AppError>> {
        match self {
            AnyTrigger::Directory(trigger) => trigger.trigger(filename, bytes),
            AnyTrigger::Dialog(trigger) => trigger.trigger(filename, bytes),
        }
    }
}

/// `dir/filename`, then `name (1).ext` up to `name (999).ext`.
const MAX_NAME_ATTEMPTS: u32 = 1000;

fn save_error(path: &Path, err: std::io::Error) -> AppError {
    AppError::Unknown(format!("Failed to save {}: {}", path.display(), err))
}

/// Runs `write` against the already created `path`; a failed write removes
/// the partial file so nothing half-written is left behind.
async fn discard_on_error<F>(path: &Path, write: F) -> Result<(), AppError>
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = write.await {
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            tracing::warn!(
                path = %path.display(),
                error = %remove_err,
                "could not remove partial file"
            );
        }
        return Err(save_error(path, e));
    }
    Ok(())
}

/// Opens `dir/filename` for writing without clobbering an existing file;
/// on a clash tries `name (1).ext`, `name (2).ext`, ... for `attempts` names in total.
async fn create_unique(
    dir: &Path,
    filename: &str,
    attempts: u32,
) -> Result<(PathBuf, tokio::fs::File), AppError> {
    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };

    for n in 0..attempts {
        let candidate = match (n, ext) {
            (0, _) => filename.to_string(),
            (n, Some(ext)) => format!("{} ({}).{}", stem, n, ext),
            (n, None) => format!("{} ({})", stem, n),
        };
        let path = dir.join(candidate);

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(save_error(&path, e)),
        }
    }

    Err(AppError::Unknown(format!(
        "No free file name for {} in {}",
        filename,
        dir.display()
    )))
}
