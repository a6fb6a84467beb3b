//! PDF text-layer extraction.

use std::path::Path;

use tracing::{debug, warn};

use super::ExtractionError;

/// Extract text from every page of a PDF, in page order.
///
/// Non-empty page texts are joined with a blank line. Returns an empty string
/// (not an error) when the document opens but has no text layer on any page,
/// e.g. a scanned-image PDF; the caller treats that as insufficient text.
/// Layout preservation is not attempted; whatever reading order the page
/// model yields is accepted.
pub fn extract_from_pdf(path: &Path) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_by_pages(path).map_err(|e| {
        ExtractionError::ExtractionFailed(format!("Failed to extract text from PDF: {}", e))
    })?;

    debug!("processing PDF with {} pages", pages.len());

    let full_text = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    if full_text.is_empty() {
        warn!("no text extracted from PDF {}", path.display());
        return Ok(String::new());
    }

    debug!("extracted {} characters from PDF", full_text.len());
    Ok(full_text)
}
