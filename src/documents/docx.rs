//! DOCX text extraction using docx-rust

use crate::types::{AppError, AppResult};
use docx_rust::document::BodyContent;
use docx_rust::DocxFile;
use std::io::Cursor;
use tracing::debug;

/// Extract top-level body paragraphs in order, each followed by a newline.
pub fn extract_text(docx_bytes: &[u8]) -> AppResult<String> {
    let file = DocxFile::from_reader(Cursor::new(docx_bytes))
        .map_err(|e| AppError::Extraction(format!("failed to open DOCX: {:?}", e)))?;
    let docx = file
        .parse()
        .map_err(|e| AppError::Extraction(format!("failed to parse DOCX: {:?}", e)))?;

    let mut text = String::new();
    let mut paragraphs = 0usize;
    for content in &docx.document.body.content {
        if let BodyContent::Paragraph(paragraph) = content {
            for run_text in paragraph.iter_text() {
                text.push_str(run_text);
            }
            text.push('\n');
            paragraphs += 1;
        }
    }

    debug!(paragraphs, "Extracted DOCX text");
    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use docx_rust::document::Paragraph;
    use docx_rust::Docx;

    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::default();
        for text in paragraphs {
            docx.document.push(Paragraph::default().push_text(*text));
        }

        let path = std::env::temp_dir().join(format!("doc-qa-{}.docx", uuid::Uuid::new_v4()));
        docx.write_file(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        bytes
    }

    #[test]
    fn test_paragraphs_end_with_newline() {
        let bytes = build_docx(&["Introduction", "Second paragraph"]);
        let text = extract_text(&bytes).unwrap();
        assert_eq!(text, "Introduction\nSecond paragraph\n");
    }

    #[test]
    fn test_invalid_docx_fails() {
        let result = extract_text(b"definitely not a zip archive");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }
}
