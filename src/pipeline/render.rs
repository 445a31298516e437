//! PDF rasterisation via pdfium.
//!
//! Pages are rendered one at a time on demand so that at most one page
//! bitmap is alive while OCR runs. Everything here blocks; callers run it
//! inside `spawn_blocking`.
//!
//! Scale is `dpi / 72` (PDF user space is 72 units per inch), then capped to
//! `max_rendered_pixels` on both edges so an oversized page cannot allocate
//! an unbounded bitmap.

use crate::config::GradescanConfig;
use crate::error::GradescanError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable pointing at a pdfium library file or its directory.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to pdfium: `PDFIUM_LIB_PATH` first, then the system library.
pub fn bind_pdfium() -> Result<Pdfium, GradescanError> {
    let bindings = match std::env::var(PDFIUM_LIB_PATH_ENV) {
        Ok(lib_path) if !lib_path.is_empty() => {
            let path = Path::new(&lib_path);
            debug!("Binding pdfium from {}", path.display());
            if path.is_dir() {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&lib_path))
            } else {
                Pdfium::bind_to_library(path)
            }
        }
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| GradescanError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Open a PDF, mapping pdfium failures onto password / corruption errors.
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, GradescanError> {
    let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                GradescanError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                GradescanError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            GradescanError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;

    info!("PDF loaded: {} pages", document.pages().len());
    Ok(document)
}

/// Render settings derived from the configured DPI and pixel cap.
pub fn render_config(config: &GradescanConfig) -> PdfRenderConfig {
    let max = config.max_rendered_pixels as i32;
    PdfRenderConfig::new()
        .scale_page_by_factor(config.dpi as f32 / 72.0)
        .set_maximum_width(max)
        .set_maximum_height(max)
}

/// Rasterise one page (0-indexed) of an open document.
pub fn render_page(
    document: &PdfDocument<'_>,
    index: usize,
    render_config: &PdfRenderConfig,
) -> Result<DynamicImage, GradescanError> {
    let rasterisation_failed = |e: PdfiumError| GradescanError::RasterisationFailed {
        page: index + 1,
        detail: format!("{:?}", e),
    };

    let page_index = PdfPageIndex::try_from(index).map_err(|_| {
        GradescanError::RasterisationFailed {
            page: index + 1,
            detail: "page index exceeds pdfium's limit".into(),
        }
    })?;

    let page = document.pages().get(page_index).map_err(rasterisation_failed)?;
    let bitmap = page
        .render_with_config(render_config)
        .map_err(rasterisation_failed)?;

    let image = bitmap.as_image();
    debug!(
        "Rendered page {} → {}x{} px",
        index + 1,
        image.width(),
        image.height()
    );
    Ok(image)
}
