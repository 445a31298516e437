//! OCR: page image → text.
//!
//! The pipeline only needs "image in, text out", so OCR sits behind the
//! [`OcrEngine`] trait. [`TesseractCli`] is the default engine: it writes the
//! page as a lossless PNG to a temp file and runs the `tesseract` executable
//! on it, reading the recognised text from stdout. Shelling out keeps the
//! crate free of a C++ build dependency; any engine with a Rust binding can
//! be injected through [`crate::config::GradescanConfigBuilder::ocr_engine`].

use crate::config::GradescanConfig;
use crate::error::GradescanError;
use image::DynamicImage;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, warn};

/// Recognise the text of one rendered page.
///
/// Implementations are called from a blocking thread and may block.
pub trait OcrEngine: Send + Sync {
    /// Short engine name for logs and error messages.
    fn name(&self) -> &str;

    /// Return the raw recognised text of `image`.
    ///
    /// `page_num` is 1-indexed and only used for error reporting.
    fn recognize(&self, image: &DynamicImage, page_num: usize) -> Result<String, GradescanError>;
}

/// Tesseract invoked as an external process.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    pub binary: PathBuf,
    pub language: String,
    pub psm: u8,
}

impl TesseractCli {
    pub fn new(binary: impl Into<PathBuf>, language: impl Into<String>, psm: u8) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
            psm,
        }
    }

    /// Engine described by the tesseract fields of `config`.
    pub fn from_config(config: &GradescanConfig) -> Self {
        Self::new(&config.tesseract_path, &config.ocr_language, config.ocr_psm)
    }

    /// Whether the binary can be started at all.
    pub fn is_available(&self) -> bool {
        let ok = Command::new(&self.binary)
            .arg("--version")
            .output()
            .is_ok();
        if !ok {
            debug!("{} not found - install tesseract-ocr", self.binary.display());
        }
        ok
    }

    fn unavailable(&self, detail: impl ToString) -> GradescanError {
        GradescanError::OcrEngineUnavailable {
            engine: self.binary.display().to_string(),
            detail: detail.to_string(),
        }
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract", "eng", 3)
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage, page_num: usize) -> Result<String, GradescanError> {
        let failed = |detail: String| GradescanError::OcrFailed {
            page: page_num,
            detail,
        };

        let png = tempfile::Builder::new()
            .prefix("gradescan-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| failed(format!("temp image: {e}")))?;
        image
            .save_with_format(png.path(), image::ImageFormat::Png)
            .map_err(|e| failed(format!("PNG encoding: {e}")))?;

        let output = Command::new(&self.binary)
            .arg(png.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(self.psm.to_string())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound
                    || e.kind() == std::io::ErrorKind::PermissionDenied
                {
                    self.unavailable(e)
                } else {
                    failed(format!("could not run {}: {e}", self.binary.display()))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("{}: {}", output.status, stderr.trim())));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            warn!("Page {}: OCR produced no text", page_num);
        }
        debug!("Page {}: OCR produced {} bytes", page_num, text.len());
        Ok(text)
    }
}

/// The engine to use: the injected one, else tesseract from the config.
pub fn resolve_engine(config: &GradescanConfig) -> Arc<dyn OcrEngine> {
    match config.ocr_engine {
        Some(ref engine) => Arc::clone(engine),
        None => Arc::new(TesseractCli::from_config(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    struct FixedEngine;

    impl OcrEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn recognize(&self, _image: &DynamicImage, _page_num: usize) -> Result<String, GradescanError> {
            Ok("Quiz 1 9/10".into())
        }
    }

    fn blank_page() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255])))
    }

    #[test]
    fn from_config_copies_tesseract_settings() {
        let config = GradescanConfig::builder()
            .tesseract_path("/opt/tess/bin/tesseract")
            .ocr_language("eng+spa")
            .ocr_psm(6)
            .build()
            .unwrap();
        let engine = TesseractCli::from_config(&config);
        assert_eq!(engine.binary, PathBuf::from("/opt/tess/bin/tesseract"));
        assert_eq!(engine.language, "eng+spa");
        assert_eq!(engine.psm, 6);
    }

    #[test]
    fn injected_engine_takes_precedence() {
        let config = GradescanConfig::builder()
            .ocr_engine(Arc::new(FixedEngine))
            .build()
            .unwrap();
        let engine = resolve_engine(&config);
        assert_eq!(engine.name(), "fixed");
        assert_eq!(engine.recognize(&blank_page(), 1).unwrap(), "Quiz 1 9/10");
    }

    #[test]
    fn default_engine_is_tesseract() {
        let engine = resolve_engine(&GradescanConfig::default());
        assert_eq!(engine.name(), "tesseract");
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let engine = TesseractCli::new("/nonexistent/bin/tesseract-gradescan", "eng", 3);
        assert!(!engine.is_available());
        let err = engine.recognize(&blank_page(), 2).unwrap_err();
        assert!(
            matches!(err, GradescanError::OcrEngineUnavailable { .. }),
            "got: {err:?}"
        );
    }
}
