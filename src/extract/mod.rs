//! Text extraction from validated uploads.
//!
//! Two strategies, selected by extension: the PDF text layer via pdf-extract
//! (pure Rust), and Tesseract OCR for raster images. OCR output is noisy, so
//! image text is whitespace-normalized before any downstream metric sees it.

mod clean;
mod image;
mod pdf;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::config::OcrConfig;

pub use clean::clean_ocr_text;
pub use image::{extract_from_image, tesseract_available};
pub use pdf::extract_from_pdf;

/// Extractions shorter than this (after trimming) are treated as "no usable
/// text" by the pipeline.
pub const MIN_TEXT_CHARS: usize = 10;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Failed to extract text: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which extraction strategy produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Image,
}

/// Normalized text pulled out of an upload.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub format: SourceFormat,
}

impl ExtractedText {
    /// True when extraction succeeded but yielded too little to analyze.
    /// A pure-image PDF with no text layer lands here, not in an error.
    pub fn is_insufficient(&self) -> bool {
        self.text.trim().chars().count() < MIN_TEXT_CHARS
    }
}

/// Extracts plain text from PDF and image files.
pub struct TextExtractor {
    ocr: OcrConfig,
}

impl TextExtractor {
    pub fn new(ocr: OcrConfig) -> Self {
        Self { ocr }
    }

    /// Extract text from a file, dispatching on its extension.
    pub fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => Ok(ExtractedText {
                text: extract_from_pdf(path)?,
                format: SourceFormat::Pdf,
            }),
            "png" | "jpg" | "jpeg" => Ok(ExtractedText {
                text: extract_from_image(path, &self.ocr)?,
                format: SourceFormat::Image,
            }),
            other => Err(ExtractionError::UnsupportedFileType(other.to_string())),
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}
