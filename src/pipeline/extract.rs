//! Text extractor: rendered pages → one concatenated OCR text blob.
//!
//! Each selected page is rendered, recognised and cleaned in page order, and
//! its text is appended followed by a single `\n`. Page boundaries are not
//! marked. The first failing page aborts the whole extraction.

use crate::config::GradescanConfig;
use crate::error::GradescanError;
use crate::output::{ExtractedText, ExtractionStats};
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::{postprocess, render};
use crate::progress::ExtractionProgressCallback;
use image::DynamicImage;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Open, render and OCR the selected pages of `pdf_path`. Blocking.
pub fn extract_text_blocking(
    pdf_path: &Path,
    config: &GradescanConfig,
    engine: &dyn OcrEngine,
) -> Result<ExtractedText, GradescanError> {
    let pdfium = render::bind_pdfium()?;
    let document = render::open_document(&pdfium, pdf_path, config.password.as_deref())?;

    let total_pages = document.pages().len() as usize;
    let indices = config.pages.to_indices(total_pages);
    if indices.is_empty() {
        return Err(GradescanError::PageOutOfRange {
            page: first_requested_page(config),
            total: total_pages,
        });
    }

    let render_config = render::render_config(config);
    let pages = indices.iter().map(|&idx| {
        render::render_page(&document, idx, &render_config).map(|image| (idx, image))
    });

    let progress = config.progress_callback.as_deref();
    let mut extracted = ocr_pages(pages, indices.len(), engine, progress)?;
    extracted.stats.document_pages = total_pages;
    Ok(extracted)
}

/// OCR a sequence of rendered pages and concatenate their cleaned text.
///
/// `pages` yields `(page_index_0based, image)`; time spent pulling from it is
/// accounted as render time. `selected` is the number of pages it will yield.
pub fn ocr_pages<I>(
    pages: I,
    selected: usize,
    engine: &dyn OcrEngine,
    progress: Option<&dyn ExtractionProgressCallback>,
) -> Result<ExtractedText, GradescanError>
where
    I: IntoIterator<Item = Result<(usize, DynamicImage), GradescanError>>,
{
    let total_start = Instant::now();
    let mut text = String::new();
    let mut stats = ExtractionStats {
        selected_pages: selected,
        ..ExtractionStats::default()
    };

    if let Some(cb) = progress {
        cb.on_extraction_start(selected);
    }

    let mut pages = pages.into_iter();
    loop {
        let render_start = Instant::now();
        let Some(next) = pages.next() else { break };
        stats.render_duration_ms += render_start.elapsed().as_millis() as u64;

        let (idx, image) = next?;
        let page_num = idx + 1;
        if let Some(cb) = progress {
            cb.on_page_start(page_num, selected);
        }

        let ocr_start = Instant::now();
        let raw = engine.recognize(&image, page_num)?;
        stats.ocr_duration_ms += ocr_start.elapsed().as_millis() as u64;
        drop(image);

        let page_text = postprocess::clean_ocr_text(&raw);
        if let Some(cb) = progress {
            cb.on_page_complete(page_num, selected, page_text.len());
        }

        text.push_str(&page_text);
        text.push('\n');
        stats.processed_pages += 1;
    }

    stats.characters = text.chars().count();
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "OCR complete: {} pages, {} chars, {}ms",
        stats.processed_pages, stats.characters, stats.total_duration_ms
    );
    if let Some(cb) = progress {
        cb.on_extraction_complete(stats.processed_pages, stats.characters);
    }

    Ok(ExtractedText { text, stats })
}

fn first_requested_page(config: &GradescanConfig) -> usize {
    use crate::config::PageSelection;
    match &config.pages {
        PageSelection::All => 0,
        PageSelection::Single(p) => *p,
        PageSelection::Range(start, _) => *start,
        PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
    }
}
