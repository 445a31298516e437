//! Input resolution: turn a path, URL or byte buffer into a local PDF file.
//!
//! pdfium opens documents by path, so every input ends up as a file on disk.
//! Downloads and in-memory buffers go to `tempfile` guards owned by
//! [`ResolvedInput`]; dropping it deletes them, whether the request succeeded
//! or not.

use crate::error::GradescanError;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// A PDF ready for rendering, plus whatever keeps it alive.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the PDF lives in a temp directory.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
    /// Input was a byte buffer written to a temp file.
    Buffered(NamedTempFile),
}

impl ResolvedInput {
    /// Path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
            ResolvedInput::Buffered(file) => file.path(),
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve a local path or http(s) URL to a local PDF file.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, GradescanError> {
    if input.trim().is_empty() {
        return Err(GradescanError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Write an in-memory PDF to a temp file after checking its magic bytes.
pub fn resolve_bytes(bytes: &[u8]) -> Result<ResolvedInput, GradescanError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("gradescan-")
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| GradescanError::Internal(format!("tempfile: {e}")))?;

    if let Some(magic) = bad_magic(bytes) {
        return Err(GradescanError::NotAPdf {
            path: tmp.path().to_path_buf(),
            magic,
        });
    }

    tmp.write_all(bytes)
        .map_err(|e| GradescanError::Internal(format!("tempfile write: {e}")))?;
    debug!("Buffered {} bytes to {}", bytes.len(), tmp.path().display());
    Ok(ResolvedInput::Buffered(tmp))
}

/// The first four bytes when they are present and are not `%PDF`.
fn bad_magic(bytes: &[u8]) -> Option<[u8; 4]> {
    let head: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    (&head != PDF_MAGIC).then_some(head)
}

/// Resolve a local file path, validating existence and PDF magic bytes.
fn resolve_local(path_str: &str) -> Result<ResolvedInput, GradescanError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(GradescanError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut head = [0u8; 4];
            if f.read_exact(&mut head).is_ok() {
                if let Some(magic) = bad_magic(&head) {
                    return Err(GradescanError::NotAPdf { path, magic });
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(GradescanError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(GradescanError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL into a temporary directory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, GradescanError> {
    info!("Downloading PDF from: {}", url);

    let failed = |reason: String| GradescanError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(url).map_err(|_| GradescanError::InvalidInput {
        input: url.to_string(),
    })?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(parsed.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            GradescanError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;

    let temp_dir = TempDir::new().map_err(|e| GradescanError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(filename_from_url(&parsed));

    if let Some(magic) = bad_magic(&bytes) {
        return Err(GradescanError::NotAPdf {
            path: file_path,
            magic,
        });
    }

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| GradescanError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded {} bytes to: {}", bytes.len(), file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Last path segment when it looks like a file name, else `downloaded.pdf`.
fn filename_from_url(url: &reqwest::Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|last| !last.is_empty() && last.contains('.'))
        .map(str::to_string)
        .unwrap_or_else(|| "downloaded.pdf".to_string())
}
