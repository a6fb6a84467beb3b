//! End-to-end upload processing: validate, store, extract, analyze, clean up.
//!
//! The stored file is transient. Every exit path, success or failure after
//! the save, removes it before returning.

use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::{AnalysisResult, ContentAnalyzer};
use crate::config::AppConfig;
use crate::extract::{ExtractedText, ExtractionError, TextExtractor};
use crate::storage::UploadStore;
use crate::validation::{ValidationError, Validator};

/// Errors surfaced to the caller of the pipeline. Messages are user-facing.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(
        "Could not extract sufficient text from the file. \
         Please ensure the file contains readable text."
    )]
    InsufficientText,

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Outcome of one successful pipeline run.
#[derive(Debug)]
pub struct UploadAnalysis {
    pub extracted: ExtractedText,
    pub analysis: AnalysisResult,
}

/// Composes the upload stages behind a single entry point.
pub struct Pipeline {
    validator: Validator,
    store: UploadStore,
    extractor: TextExtractor,
    analyzer: ContentAnalyzer,
}

impl Pipeline {
    /// Initialize all stages from configuration. Probes the analysis
    /// backends once; the pipeline is read-only afterwards.
    pub async fn init(config: AppConfig) -> Result<Self, PipelineError> {
        let store = UploadStore::new(&config.upload.dir, config.upload.max_file_size)?;
        let analyzer = ContentAnalyzer::init(&config).await;

        Ok(Self {
            validator: Validator::new(config.upload.max_file_size),
            store,
            extractor: TextExtractor::new(config.ocr.clone()),
            analyzer,
        })
    }

    /// Build from explicit stages; the seam for tests.
    pub fn with_parts(
        validator: Validator,
        store: UploadStore,
        extractor: TextExtractor,
        analyzer: ContentAnalyzer,
    ) -> Self {
        Self {
            validator,
            store,
            extractor,
            analyzer,
        }
    }

    /// Run the full pipeline on upload bytes. The file is persisted only for
    /// the duration of this call.
    pub async fn process_upload(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<UploadAnalysis, PipelineError> {
        self.validator.validate_bytes(filename, bytes)?;

        let stored = self.store.save(bytes, filename)?;
        debug!("processing upload: {}", stored.path.display());

        let result = self.run_stored(&stored.path).await;
        self.store.cleanup(&stored.path);
        result
    }

    /// Analyze raw text directly, skipping validation and extraction.
    pub async fn analyze_text(&self, text: &str) -> AnalysisResult {
        self.analyzer.analyze(text).await
    }

    async fn run_stored(&self, path: &std::path::Path) -> Result<UploadAnalysis, PipelineError> {
        let extracted = self.extractor.extract(path)?;

        if extracted.is_insufficient() {
            return Err(PipelineError::InsufficientText);
        }

        info!(
            "extracted {} characters from {:?} upload",
            extracted.text.chars().count(),
            extracted.format
        );

        let analysis = self.analyzer.analyze(&extracted.text).await;
        Ok(UploadAnalysis { extracted, analysis })
    }
}
