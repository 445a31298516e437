//! Pipeline stages for turning a gradebook PDF into a graded report.
//!
//! Each submodule implements one step. Only the first three touch the
//! outside world; everything after the extractor is a pure function of text.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ ocr ──▶ postprocess ──▶ title / parse ──▶ aggregate
//! (URL/path) (pdfium) (tesseract) (cleanup)     (regex)           (weighted %)
//! ```
//!
//! 1. [`input`]  canonicalise the user-supplied path, URL or bytes to a local file
//! 2. [`render`] rasterise selected pages; blocking, run via `spawn_blocking`
//! 3. [`ocr`]    recognise page images through an [`ocr::OcrEngine`]
//! 4. [`postprocess`] normalise OCR output before it is concatenated
//! 5. [`extract`] drive 2–4 page by page into one text blob
//! 6. [`lines`]  split text on every line boundary for the next two stages
//! 7. [`title`]  find the course code line
//! 8. [`parse`]  classify lines and build the grade records
//! 9. [`aggregate`] per-section summaries and the overall percentage

pub mod aggregate;
pub mod extract;
pub mod input;
pub mod lines;
pub mod ocr;
pub mod parse;
pub mod postprocess;
pub mod render;
pub mod title;
