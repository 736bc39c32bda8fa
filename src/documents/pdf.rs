//! PDF text extraction using lopdf

use crate::types::{AppError, AppResult};
use lopdf::Document;
use tracing::{debug, warn};

/// Extract the text of every page, in page order, with no separator.
///
/// Per-page text is whatever lopdf yields, which ends each text object
/// with a newline.
///
/// A page whose text cannot be decoded contributes an empty string; only an
/// unparseable container is an error.
pub fn extract_text(pdf_bytes: &[u8]) -> AppResult<String> {
    let doc = Document::load_mem(pdf_bytes)
        .map_err(|e| AppError::Extraction(format!("failed to parse PDF: {}", e)))?;

    let pages = doc.get_pages();
    debug!(page_count = pages.len(), "Extracting PDF text");

    let mut text = String::new();
    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => warn!(page = *page_num, error = %e, "No text extracted from page"),
        }
    }

    Ok(text)
}
