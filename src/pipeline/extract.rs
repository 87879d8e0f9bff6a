//! Per-page PDF text extraction via lopdf.
//!
//! ## Why spawn_blocking?
//!
//! lopdf parses the whole cross-reference table and decompresses content
//! streams on load — CPU-bound work that would stall a Tokio worker thread.
//! `tokio::task::spawn_blocking` moves it onto the blocking pool, the same
//! discipline applied to every CPU-heavy stage in this pipeline.
//!
//! ## Degradation contract
//!
//! A page whose text cannot be extracted becomes the **empty string**, never
//! an error: scanned or image-only pages are common and must not abort the
//! run. The empty page keeps its slot so page positions stay meaningful for
//! chunk packing and citation numbers. Only a document that cannot be loaded
//! at all is fatal.

use crate::error::ReportError;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, info, warn};

/// Extract per-page plain text from a PDF, in page order.
///
/// Returns one string per page, trimmed. Pages that fail extraction come
/// back empty rather than failing the run.
pub async fn extract_pages(pdf_path: &Path) -> Result<Vec<String>, ReportError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || extract_pages_blocking(&path))
        .await
        .map_err(|e| ReportError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of page extraction.
fn extract_pages_blocking(pdf_path: &Path) -> Result<Vec<String>, ReportError> {
    let doc = Document::load(pdf_path).map_err(|e| ReportError::PdfParse {
        path: pdf_path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();
    info!("PDF loaded: {} pages", page_numbers.len());

    let pages = page_numbers
        .iter()
        .map(|&number| match doc.extract_text(&[number]) {
            Ok(text) => {
                let text = text.trim().to_string();
                debug!("Extracted page {}: {} chars", number, text.len());
                text
            }
            Err(e) => {
                warn!("Page {}: extraction failed ({}), using empty text", number, e);
                String::new()
            }
        })
        .collect();

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unloadable_pdf_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        // Valid magic, garbage body: passes input validation, fails lopdf.
        f.write_all(b"%PDF-1.4\nthis is not a real pdf body").unwrap();

        let err = extract_pages_blocking(&path).unwrap_err();
        assert!(matches!(err, ReportError::PdfParse { .. }));
    }
}
