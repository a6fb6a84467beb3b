//! Image OCR via the Tesseract CLI.

use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use super::clean::clean_ocr_text;
use super::ExtractionError;
use crate::config::OcrConfig;

/// Extract text from a raster image using OCR.
///
/// The image is normalized to 3-channel RGB and re-encoded as PNG in a
/// scratch directory before OCR; Tesseract runs with a restricted character
/// whitelist and a page-segmentation mode tuned for a single uniform block of
/// text. Returns an empty string when OCR finds no text.
pub fn extract_from_image(path: &Path, config: &OcrConfig) -> Result<String, ExtractionError> {
    let img = image::open(path)
        .map_err(|e| ExtractionError::ExtractionFailed(format!("Failed to open image: {}", e)))?;

    debug!(
        "processing image: {}x{} pixels",
        img.width(),
        img.height()
    );

    let rgb = img.to_rgb8();
    let scratch = tempfile::tempdir()?;
    let normalized = scratch.path().join("ocr_input.png");
    rgb.save(&normalized).map_err(|e| {
        ExtractionError::ExtractionFailed(format!("Failed to write normalized image: {}", e))
    })?;

    let raw = run_tesseract(&normalized, config)?;
    let cleaned = clean_ocr_text(&raw);

    if cleaned.is_empty() {
        warn!("no text detected in image {}", path.display());
    } else {
        debug!("extracted {} characters from image", cleaned.len());
    }

    Ok(cleaned)
}

/// Run Tesseract OCR on an image file.
fn run_tesseract(image_path: &Path, config: &OcrConfig) -> Result<String, ExtractionError> {
    let whitelist = format!("tessedit_char_whitelist={}", config.char_whitelist);
    let output = Command::new(&config.tesseract_path)
        .arg(image_path)
        .arg("stdout")
        .args(["-l", &config.language])
        .args(["--oem", "3", "--psm", &config.psm])
        .args(["-c", &whitelist])
        .output();

    match output {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::ExtractionFailed(format!(
                    "tesseract failed: {}",
                    stderr
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ExtractionError::ToolNotFound(
            "tesseract (install tesseract-ocr)".to_string(),
        )),
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Check whether the configured tesseract binary is usable.
pub fn tesseract_available(config: &OcrConfig) -> bool {
    Command::new(&config.tesseract_path)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
