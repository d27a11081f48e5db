//! On-disk storage of uploaded PDF reports.

use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use engine::PDF_MIMETYPE;

/// Largest accepted report, in bytes.
pub const MAX_REPORT_SIZE: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    /// Open the store, creating `dir` if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a new report and return its path. Never overwrites.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        use tokio::io::AsyncWriteExt;

        let path = self.dir.join(filename);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(path)
    }

    /// Read a stored report by name. The name must pass [`is_safe_filename`].
    pub async fn read(&self, filename: &str) -> io::Result<Vec<u8>> {
        if !is_safe_filename(filename) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid filename: {filename}"),
            ));
        }
        tokio::fs::read(self.dir.join(filename)).await
    }
}

/// Server generated name for a new report: `financial_report_<millis>-<uuid>.pdf`.
pub fn report_filename(now: DateTime<Utc>) -> String {
    format!(
        "financial_report_{}-{}.pdf",
        now.timestamp_millis(),
        Uuid::new_v4()
    )
}

/// A download name must stay inside the upload directory.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

/// Accept a file if either its declared type or its extension says PDF.
pub fn is_pdf(content_type: Option<&str>, filename: &str) -> bool {
    let declared = content_type.is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_MIMETYPE));
    let extension = Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    declared || extension
}

/// Remove a stored file. Failures are logged and swallowed.
pub async fn remove_best_effort(path: &str) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!("removed report file {path}"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("report file {path} already gone");
        }
        Err(err) => tracing::warn!("failed to remove report file {path}: {err}"),
    }
}
