//! Configuration for the gradebook pipeline.
//!
//! Every knob lives in [`GradescanConfig`], built through
//! [`GradescanConfigBuilder`]. Only the text extractor is configurable; the
//! title extractor, line parser and aggregator are fixed rules.

use crate::error::GradescanError;
use crate::pipeline::ocr::OcrEngine;
use crate::progress::{ExtractionProgressCallback, ProgressCallback};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for one gradebook extraction.
///
/// Built via [`GradescanConfig::builder()`] or using
/// [`GradescanConfig::default()`].
///
/// # Example
/// ```rust
/// use gradescan::GradescanConfig;
///
/// let config = GradescanConfig::builder()
///     .dpi(300)
///     .ocr_language("eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GradescanConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–600. Default: 300.
    ///
    /// Tesseract is tuned for roughly 300 DPI input; small table digits in
    /// scanned gradebooks blur into each other much below 200.
    pub dpi: u32,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 4000.
    ///
    /// Caps either edge independently of DPI so an oversized page never
    /// allocates an unbounded bitmap.
    pub max_rendered_pixels: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// Tesseract language code(s), e.g. `eng` or `eng+deu`. Default: `eng`.
    pub ocr_language: String,

    /// Tesseract page segmentation mode (`--psm`). Range: 0–13. Default: 3.
    pub ocr_psm: u8,

    /// Path or name of the tesseract executable. Default: `tesseract` on `PATH`.
    pub tesseract_path: PathBuf,

    /// Pre-constructed OCR engine. Takes precedence over the tesseract settings.
    pub ocr_engine: Option<Arc<dyn OcrEngine>>,

    /// Observer notified as each page is rendered and recognised.
    pub progress_callback: Option<ProgressCallback>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for GradescanConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            max_rendered_pixels: 4000,
            password: None,
            pages: PageSelection::default(),
            ocr_language: "eng".to_string(),
            ocr_psm: 3,
            tesseract_path: PathBuf::from("tesseract"),
            ocr_engine: None,
            progress_callback: None,
            download_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for GradescanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradescanConfig")
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pages", &self.pages)
            .field("ocr_language", &self.ocr_language)
            .field("ocr_psm", &self.ocr_psm)
            .field("tesseract_path", &self.tesseract_path)
            .field("ocr_engine", &self.ocr_engine.as_ref().map(|e| e.name().to_string()))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl GradescanConfig {
    /// Create a new builder for `GradescanConfig`.
    pub fn builder() -> GradescanConfigBuilder {
        GradescanConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GradescanConfig`].
#[derive(Debug)]
pub struct GradescanConfigBuilder {
    config: GradescanConfig,
}

impl GradescanConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn ocr_psm(mut self, psm: u8) -> Self {
        self.config.ocr_psm = psm;
        self
    }

    pub fn tesseract_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tesseract_path = path.into();
        self
    }

    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr_engine = Some(engine);
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn ExtractionProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GradescanConfig, GradescanError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(GradescanError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.max_rendered_pixels < 100 {
            return Err(GradescanError::InvalidConfig(format!(
                "Maximum rendered pixels must be at least 100, got {}",
                c.max_rendered_pixels
            )));
        }
        if c.ocr_language.trim().is_empty() {
            return Err(GradescanError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        if c.ocr_psm > 13 {
            return Err(GradescanError::InvalidConfig(format!(
                "Page segmentation mode must be 0–13, got {}",
                c.ocr_psm
            )));
        }
        Ok(self.config)
    }
}

/// Specifies which pages of the PDF to extract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Every page (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
