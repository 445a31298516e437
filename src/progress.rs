//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::GradescanConfigBuilder::progress_callback`] to observe
//! the text extractor as it renders and recognises each page. OCR dominates
//! the run time of a request, so this is where a host shows progress.
//!
//! # Example
//!
//! ```rust
//! use gradescan::{ExtractionProgressCallback, GradescanConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CharCounter {
//!     chars: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CharCounter {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
//!         self.chars.fetch_add(text_len, Ordering::SeqCst);
//!         eprintln!("OCR page {}/{}", page_num, total_pages);
//!     }
//! }
//!
//! let config = GradescanConfig::builder()
//!     .progress_callback(Arc::new(CharCounter { chars: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the text extractor as it processes each page.
///
/// Pages are processed sequentially on a blocking thread, so events for one
/// document arrive in page order. The trait is still `Send + Sync` because
/// that thread is not the caller's. All methods default to no-ops.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once the page selection is known, before any page is rendered.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called once a page has been rasterised, before OCR starts.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number
    /// * `total_pages`: number of selected pages
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page has been recognised.
    ///
    /// `text_len` is the byte length of the cleaned OCR text for the page.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called once after the last page, only when every page succeeded.
    fn on_extraction_complete(&self, total_pages: usize, total_chars: usize) {
        let _ = (total_pages, total_chars);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GradescanConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GradescanError;
    use crate::pipeline::extract::ocr_pages;
    use crate::pipeline::ocr::OcrEngine;
    use image::{DynamicImage, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        starts: AtomicUsize,
        chars: AtomicUsize,
        finished_chars: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_extraction_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_start(&self, _page_num: usize, _total_pages: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, text_len: usize) {
            self.chars.fetch_add(text_len, Ordering::SeqCst);
        }

        fn on_extraction_complete(&self, _total_pages: usize, total_chars: usize) {
            self.finished_chars.store(total_chars, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(2);
        cb.on_page_start(1, 2);
        cb.on_page_complete(1, 2, 40);
        cb.on_extraction_complete(2, 80);
    }

    struct EchoEngine;

    impl OcrEngine for EchoEngine {
        fn name(&self) -> &str {
            "echo"
        }

        fn recognize(&self, _image: &DynamicImage, page_num: usize) -> Result<String, GradescanError> {
            Ok(format!("Lab {page_num} 5/5"))
        }
    }

    fn blank_page(idx: usize) -> Result<(usize, DynamicImage), GradescanError> {
        Ok((idx, DynamicImage::ImageRgba8(RgbaImage::new(2, 2))))
    }

    #[test]
    fn extractor_delivers_every_event() {
        let tracker = TrackingCallback::default();

        let out = ocr_pages(vec![blank_page(0), blank_page(1)], 2, &EchoEngine, Some(&tracker))
            .unwrap();

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        // "Lab 1 5/5" and "Lab 2 5/5"
        assert_eq!(tracker.chars.load(Ordering::SeqCst), 18);
        assert_eq!(
            tracker.finished_chars.load(Ordering::SeqCst),
            out.text.chars().count()
        );
    }

    #[test]
    fn failed_extraction_never_reports_completion() {
        let tracker = TrackingCallback::default();
        let pages = vec![
            blank_page(0),
            Err(GradescanError::RasterisationFailed {
                page: 2,
                detail: "broken content stream".into(),
            }),
        ];

        assert!(ocr_pages(pages, 2, &EchoEngine, Some(&tracker)).is_err());
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.finished_chars.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_extraction_start(1);
        cb.on_page_complete(1, 1, 12);
    }
}
