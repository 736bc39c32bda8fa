//! Document loading and text extraction.
//!
//! A [`Document`] is an in-memory byte buffer plus a format tag. It only lives
//! for one extraction call; the extracted `String` is what the rest of the
//! pipeline works with.

pub mod chunker;
pub mod docx;
pub mod pdf;

pub use chunker::{chunk_text, DEFAULT_MAX_CHUNK_SIZE};

use crate::types::{AppError, AppResult};
use bytes::Bytes;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Supported container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
        }
    }

    /// Map a MIME type to a format.
    pub fn from_mime(mime: &mime::Mime) -> Option<Self> {
        if *mime == mime::APPLICATION_PDF {
            Some(DocumentFormat::Pdf)
        } else if mime.essence_str() == DOCX_MIME {
            Some(DocumentFormat::Docx)
        } else if *mime == mime::TEXT_PLAIN || *mime == mime::TEXT_PLAIN_UTF_8 {
            Some(DocumentFormat::Txt)
        } else {
            None
        }
    }

    /// Guess the format from a file name's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        mime_guess::from_path(path)
            .iter()
            .find_map(|mime| Self::from_mime(&mime))
    }
}

impl FromStr for DocumentFormat {
    type Err = AppError;

    /// Accepts short tags (`pdf`, `docx`, `txt`) or the matching MIME types.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim().to_lowercase();
        match tag.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" | "text" | "plain" => Ok(DocumentFormat::Txt),
            other => other
                .parse::<mime::Mime>()
                .ok()
                .and_then(|m| Self::from_mime(&m))
                .ok_or_else(|| AppError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An uploaded document awaiting extraction
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    /// Format tag as declared by the caller; may name an unsupported format.
    pub format_tag: String,
    pub content: Bytes,
}

impl Document {
    pub fn new(filename: impl Into<String>, format_tag: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            format_tag: format_tag.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk, deriving the format tag from its extension.
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let content = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let format_tag = match DocumentFormat::from_path(path) {
            Some(format) => format.as_str().to_string(),
            None => path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        Ok(Self::new(filename, format_tag, content))
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        self.format_tag.parse().ok()
    }

    pub fn extract_text(&self) -> AppResult<String> {
        let text = extract(&self.content, &self.format_tag)?;
        info!(
            filename = %self.filename,
            format = %self.format_tag,
            chars = text.chars().count(),
            "Extracted document text"
        );
        Ok(text)
    }
}

/// Extract the text of `content` according to `format_tag`.
///
/// Unknown tags produce an empty string instead of an error.
pub fn extract(content: &[u8], format_tag: &str) -> AppResult<String> {
    match format_tag.parse::<DocumentFormat>() {
        Ok(DocumentFormat::Pdf) => pdf::extract_text(content),
        Ok(DocumentFormat::Docx) => docx::extract_text(content),
        Ok(DocumentFormat::Txt) => decode_text(content),
        Err(e) => {
            warn!(error = %e, "Unsupported format, treating document as empty");
            Ok(String::new())
        }
    }
}

fn decode_text(content: &[u8]) -> AppResult<String> {
    String::from_utf8(content.to_vec()).map_err(|e| AppError::Decode(e.to_string()))
}
