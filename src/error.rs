//! Error types for the gradescan library.
//!
//! Every failure here is fatal for the invocation: the document could not be
//! read, rendered or recognised, or the result could not be written. There is
//! no page-level partial success: a gradebook with one unreadable page would
//! produce a wrong overall grade, so the whole request fails instead.
//!
//! Finding no grade rows is *not* an error. It is reported as
//! [`crate::output::GradeOutcome::NoGrades`] so callers can show
//! "no grades found" rather than a generic failure.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the gradescan library.
///
/// The input, PDF and OCR variants together form the extraction failures of
/// the text extractor; see [`GradescanError::is_extraction_error`].
#[derive(Debug, Error)]
pub enum GradescanError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The page selection matched no page of the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR engine could not be started (binary missing, not executable).
    #[error("OCR engine '{engine}' is not available: {detail}\nInstall tesseract-ocr or pass --tesseract <PATH>.")]
    OcrEngineUnavailable { engine: String, detail: String },

    /// The OCR engine ran but failed on a page.
    #[error("OCR failed on page {page}: {detail}")]
    OcrFailed { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The spreadsheet could not be built or saved.
    #[error("Failed to write spreadsheet '{path}': {detail}")]
    SpreadsheetWriteFailed { path: PathBuf, detail: String },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium for your platform, or set PDFIUM_LIB_PATH to the\n\
directory containing an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GradescanError {
    /// True for failures of the text-extraction stage (input, PDF or OCR).
    pub fn is_extraction_error(&self) -> bool {
        !matches!(
            self,
            GradescanError::SpreadsheetWriteFailed { .. }
                | GradescanError::OutputWriteFailed { .. }
                | GradescanError::InvalidConfig(_)
        )
    }
}
