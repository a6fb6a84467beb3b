//! Configuration for the upload-and-analyze pipeline.
//!
//! Everything is constructed once at startup from defaults plus environment
//! overrides (a `.env` file is honored via dotenvy in main). The resulting
//! handles are read-only for the life of the process.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Maximum upload size in bytes (16 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// File extensions accepted at the upload boundary.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Upload storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory where validated uploads are written before processing.
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_file_size: default_max_file_size(),
        }
    }
}

/// OCR settings for image uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language (e.g., "eng").
    #[serde(default = "default_ocr_language")]
    pub language: String,
    /// Path to the tesseract binary (default relies on PATH).
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    /// Page segmentation mode. 6 = single uniform block of text.
    #[serde(default = "default_psm")]
    pub psm: String,
    /// Character whitelist passed to tesseract. OCR noise outside this set
    /// skews the downstream readability formulas.
    #[serde(default = "default_char_whitelist")]
    pub char_whitelist: String,
}

fn default_ocr_language() -> String {
    "eng".to_string()
}
fn default_tesseract_path() -> String {
    "tesseract".to_string()
}
fn default_psm() -> String {
    "6".to_string()
}
fn default_char_whitelist() -> String {
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz \
     .,!?@#$%^&*()_+-=[]{}|;:,.<>?"
        .to_string()
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_ocr_language(),
            tesseract_path: default_tesseract_path(),
            psm: default_psm(),
            char_whitelist: default_char_whitelist(),
        }
    }
}

/// Remote sentiment classifier settings.
///
/// The classifier is an external inference service; when no endpoint is
/// configured (or neither model is reachable at startup) the scorer falls
/// back to keyword heuristics for the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Inference endpoint, e.g. `http://localhost:8600`. None disables the
    /// model-backed path entirely.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Model tried first at startup.
    #[serde(default = "default_primary_model")]
    pub primary_model: String,
    /// Model tried when the primary fails to initialize.
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
}

fn default_primary_model() -> String {
    "cardiffnlp/twitter-roberta-base-sentiment-latest".to_string()
}
fn default_fallback_model() -> String {
    "distilbert-base-uncased-finetuned-sst-2-english".to_string()
}
fn default_classifier_timeout() -> u64 {
    30
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            primary_model: default_primary_model(),
            fallback_model: default_fallback_model(),
            timeout_secs: default_classifier_timeout(),
        }
    }
}

/// OpenAI settings for tier-1 engagement suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key. None disables the remote tier.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL.
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,
    /// Chat model used for suggestions.
    #[serde(default = "default_openai_model")]
    pub model: String,
    /// Maximum completion tokens.
    #[serde(default = "default_openai_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds. A timeout is treated like any other
    /// tier-1 failure and falls through to the static suggestions.
    #[serde(default = "default_openai_timeout")]
    pub timeout_secs: u64,
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_openai_model() -> String {
    "gpt-5".to_string()
}
fn default_openai_max_tokens() -> u32 {
    1000
}
fn default_openai_timeout() -> u64 {
    60
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_openai_endpoint(),
            model: default_openai_model(),
            max_tokens: default_openai_max_tokens(),
            timeout_secs: default_openai_timeout(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

impl AppConfig {
    /// Build a configuration from defaults plus environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("POSTLENS_UPLOAD_DIR") {
            config.upload.dir = PathBuf::from(dir);
        }
        if let Ok(size) = std::env::var("POSTLENS_MAX_FILE_SIZE") {
            if let Ok(bytes) = size.parse() {
                config.upload.max_file_size = bytes;
            }
        }
        if let Ok(endpoint) = std::env::var("POSTLENS_CLASSIFIER_ENDPOINT") {
            if !endpoint.is_empty() {
                config.classifier.endpoint = Some(endpoint);
            }
        }
        if let Ok(path) = std::env::var("POSTLENS_TESSERACT_PATH") {
            config.ocr.tesseract_path = path;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                config.openai.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.openai.model = model;
        }

        config
    }

    /// Override the upload directory.
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload.dir = dir.into();
        self
    }
}
