//! Upload validation: extension allow-list plus magic-byte sniffing.
//!
//! The declared extension is attacker-controllable, and the downstream
//! parsers (PDF reader, OCR engine) can misbehave on malformed input, so the
//! first kilobyte of content is checked against the signature the extension
//! claims before anything else touches the file.

use std::io::{Read, Seek, SeekFrom};

use thiserror::Error;

use crate::config::ALLOWED_EXTENSIONS;

/// Bytes sniffed from the head of the upload.
const HEADER_LEN: usize = 1024;

const PDF_MAGIC: &[u8] = b"%PDF";
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SOI: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Errors reported at the upload boundary. Messages are user-facing.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No file provided")]
    NoFile,

    #[error("Invalid file type. Allowed types: {allowed}")]
    DisallowedExtension { allowed: String },

    #[error("File too large. Maximum size: {max_mb}MB")]
    TooLarge { max_mb: u64 },

    #[error("File appears to be empty")]
    Empty,

    #[error("File does not appear to be a valid {expected}{detected}")]
    SignatureMismatch {
        expected: &'static str,
        detected: String,
    },

    #[error("File validation failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Validates uploads against the allowed formats before storage.
#[derive(Debug, Clone)]
pub struct Validator {
    max_file_size: u64,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            max_file_size: crate::config::DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Validator {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Check whether a filename carries an allowed extension.
    pub fn is_allowed(&self, filename: &str) -> bool {
        extension_of(filename)
            .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Validate an upload: filename, extension, size, and content signature.
    ///
    /// Reads the first kilobyte for sniffing and restores the reader's
    /// position afterwards, so callers can hand the same stream straight to
    /// storage. `size` is best-effort; pass None when not knowable upfront.
    pub fn validate<R: Read + Seek>(
        &self,
        filename: &str,
        reader: &mut R,
        size: Option<u64>,
    ) -> Result<(), ValidationError> {
        if filename.is_empty() {
            return Err(ValidationError::NoFile);
        }

        let ext = match extension_of(filename) {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => ext,
            _ => {
                return Err(ValidationError::DisallowedExtension {
                    allowed: ALLOWED_EXTENSIONS.join(", "),
                })
            }
        };

        if let Some(size) = size {
            if size > self.max_file_size {
                return Err(ValidationError::TooLarge {
                    max_mb: self.max_file_size / (1024 * 1024),
                });
            }
        }

        let header = read_header(reader)?;
        if header.is_empty() {
            return Err(ValidationError::Empty);
        }

        sniff_signature(&ext, &header)
    }

    /// Convenience wrapper for in-memory uploads.
    pub fn validate_bytes(&self, filename: &str, bytes: &[u8]) -> Result<(), ValidationError> {
        let mut cursor = std::io::Cursor::new(bytes);
        self.validate(filename, &mut cursor, Some(bytes.len() as u64))
    }
}

/// Lowercased extension after the final dot, if any.
pub(crate) fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Read up to `HEADER_LEN` bytes and seek back to where the reader started.
fn read_header<R: Read + Seek>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let start = reader.stream_position()?;
    let mut header = vec![0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < header.len() {
        let n = reader.read(&mut header[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    header.truncate(filled);
    reader.seek(SeekFrom::Start(start))?;
    Ok(header)
}

/// Check the sniffed header against the signature the extension claims.
fn sniff_signature(ext: &str, header: &[u8]) -> Result<(), ValidationError> {
    let ok = match ext {
        "pdf" => header.starts_with(PDF_MAGIC),
        "jpg" | "jpeg" => {
            header.starts_with(JPEG_SOI)
                || header[..header.len().min(20)]
                    .windows(4)
                    .any(|w| w == b"JFIF")
        }
        "png" => header.starts_with(PNG_MAGIC),
        _ => true,
    };

    if ok {
        return Ok(());
    }

    let expected = match ext {
        "pdf" => "PDF",
        "jpg" | "jpeg" => "JPEG",
        _ => "PNG",
    };
    // Tell the user what the content actually looks like, when recognizable.
    let detected = infer::get(header)
        .map(|t| format!(" (content looks like {})", t.mime_type()))
        .unwrap_or_default();

    Err(ValidationError::SignatureMismatch { expected, detected })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::default()
    }

    #[test]
    fn test_is_allowed() {
        let v = validator();
        assert!(v.is_allowed("report.pdf"));
        assert!(v.is_allowed("photo.jpeg"));
        assert!(v.is_allowed("PHOTO.PNG"));
        assert!(!v.is_allowed("archive.zip"));
        assert!(!v.is_allowed("noextension"));
        assert!(!v.is_allowed(""));
    }

    #[test]
    fn test_empty_filename() {
        let err = validator().validate_bytes("", b"%PDF-1.4").unwrap_err();
        assert_eq!(err.to_string(), "No file provided");
    }

    #[test]
    fn test_disallowed_extension_message() {
        let err = validator().validate_bytes("doc.txt", b"hello").unwrap_err();
        assert!(err.to_string().contains("pdf, png, jpg, jpeg"));
    }

    #[test]
    fn test_empty_content() {
        let err = validator().validate_bytes("doc.pdf", b"").unwrap_err();
        assert_eq!(err.to_string(), "File appears to be empty");
    }

    #[test]
    fn test_renamed_file_fails_pdf_sniff() {
        let err = validator().validate_bytes("x.pdf", b"notapdf").unwrap_err();
        assert!(err.to_string().contains("valid PDF"));
    }

    #[test]
    fn test_valid_signatures() {
        let v = validator();
        assert!(v.validate_bytes("a.pdf", b"%PDF-1.7 rest").is_ok());

        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert!(v.validate_bytes("a.png", &png).is_ok());

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00];
        assert!(v.validate_bytes("a.jpg", &jpeg).is_ok());
    }

    #[test]
    fn test_jfif_marker_accepted() {
        // No SOI prefix, but JFIF appears within the first 20 bytes.
        let mut data = vec![0x00, 0x01];
        data.extend_from_slice(b"JFIF");
        data.extend_from_slice(&[0u8; 32]);
        assert!(validator().validate_bytes("a.jpeg", &data).is_ok());
    }

    #[test]
    fn test_png_bytes_named_jpg_fail() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        let err = validator().validate_bytes("a.jpg", &png).unwrap_err();
        assert!(err.to_string().contains("valid JPEG"));
    }

    #[test]
    fn test_size_limit() {
        let v = Validator::new(4);
        let err = v.validate_bytes("a.pdf", b"%PDF-1.4").unwrap_err();
        assert!(err.to_string().contains("File too large"));
    }

    #[test]
    fn test_reader_position_restored() {
        let mut cursor = std::io::Cursor::new(b"%PDF-1.4 content".to_vec());
        validator()
            .validate("a.pdf", &mut cursor, None)
            .expect("valid pdf");
        assert_eq!(cursor.position(), 0);
    }
}
