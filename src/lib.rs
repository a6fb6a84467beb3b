//! postlens - upload-and-analyze pipeline for social content.
//!
//! A user submits a PDF or image; the pipeline validates the file against its
//! declared type, extracts text (PDF text layer, or OCR for raster images),
//! and produces sentiment, readability, and engagement metrics as a single
//! structured result. Model-backed subsystems (remote sentiment classifier,
//! OpenAI suggestions) are optional and degrade to heuristics when absent.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod storage;
pub mod validation;

pub use analysis::{AnalysisResult, ContentAnalyzer};
pub use config::AppConfig;
pub use pipeline::{Pipeline, PipelineError, UploadAnalysis};
