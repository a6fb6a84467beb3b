//! Content analysis: sentiment, readability, and engagement suggestions
//! composed into a single result.
//!
//! Each sub-analysis is self-guarding and degrades to a sentinel value on
//! failure, so one failing stage never aborts the others. The orchestrator's
//! own error record is a last-resort shape for catastrophic failures and
//! always preserves the text length.

mod classifier;
mod readability;
mod sentiment;
mod suggestions;
mod topics;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::llm::OpenAiClient;

pub use classifier::{ClassifierClient, ClassifierError, LabelScore};
pub use readability::{calculate_readability, ReadabilityResult};
pub use sentiment::{basic_sentiment, SentimentLabel, SentimentResult, SentimentScorer};
pub use suggestions::{SuggestionEngine, SuggestionResult, SuggestionSource};
pub use topics::{detect_topics, Topic, TOPICS};

/// Aggregate result of analyzing one text. Serializes either as the full
/// record or, for an orchestration-level failure, as an error record that
/// keeps the text length and timestamp.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Complete {
        text_length: usize,
        word_count: usize,
        sentiment: SentimentResult,
        readability: ReadabilityResult,
        engagement_suggestions: SuggestionResult,
        analysis_timestamp: String,
    },
    Failed {
        error: String,
        text_length: usize,
        analysis_timestamp: String,
    },
}

impl AnalysisResult {
    /// Build the orchestration-failure record.
    pub fn failure(error: impl Into<String>, text_length: usize) -> Self {
        Self::Failed {
            error: format!("Analysis failed: {}", error.into()),
            text_length,
            analysis_timestamp: now_timestamp(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Composes the analysis subsystems. Constructed once at startup; the
/// backend handles inside are read-only afterwards.
pub struct ContentAnalyzer {
    sentiment: SentimentScorer,
    suggestions: SuggestionEngine,
}

impl ContentAnalyzer {
    /// Initialize from configuration: probe the sentiment classifier and
    /// construct the OpenAI client when credentials exist.
    pub async fn init(config: &AppConfig) -> Self {
        let sentiment = SentimentScorer::init(&config.classifier).await;
        let suggestions = SuggestionEngine::new(OpenAiClient::from_config(&config.openai));
        Self {
            sentiment,
            suggestions,
        }
    }

    /// Build from explicit parts; the seam for test doubles.
    pub fn with_parts(sentiment: SentimentScorer, suggestions: SuggestionEngine) -> Self {
        Self {
            sentiment,
            suggestions,
        }
    }

    /// Analyze a text. Sub-analyses run independently and are each
    /// self-guarding; the result always carries a timestamp.
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        let text_length = text.chars().count();
        let word_count = text.split_whitespace().count();

        let sentiment = self.sentiment.analyze(text).await;
        let readability = calculate_readability(text);
        let engagement_suggestions = self.suggestions.generate(text).await;

        info!("content analysis completed ({} words)", word_count);

        AnalysisResult::Complete {
            text_length,
            word_count,
            sentiment,
            readability,
            engagement_suggestions,
            analysis_timestamp: now_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heuristic_analyzer() -> ContentAnalyzer {
        ContentAnalyzer::with_parts(SentimentScorer::heuristic_only(), SuggestionEngine::new(None))
    }

    #[tokio::test]
    async fn test_analyze_complete_record() {
        let analyzer = heuristic_analyzer();
        let result = analyzer
            .analyze("What a great day to learn about technology! We love building software.")
            .await;

        match result {
            AnalysisResult::Complete {
                text_length,
                word_count,
                sentiment,
                readability,
                engagement_suggestions,
                analysis_timestamp,
            } => {
                assert_eq!(word_count, 12);
                assert!(text_length > 0);
                assert_eq!(sentiment.label, SentimentLabel::Positive);
                assert!(readability.error.is_none());
                assert_eq!(
                    engagement_suggestions.source,
                    SuggestionSource::ContentAnalysis
                );
                assert!(analysis_timestamp.contains('T'));
            }
            AnalysisResult::Failed { .. } => panic!("expected complete record"),
        }
    }

    #[tokio::test]
    async fn test_sub_analyses_degrade_independently() {
        // Text below the readability minimum still yields sentiment and
        // suggestions; the readability field carries its sentinel.
        let analyzer = heuristic_analyzer();
        let result = analyzer.analyze("great!").await;

        match result {
            AnalysisResult::Complete {
                sentiment,
                readability,
                engagement_suggestions,
                ..
            } => {
                assert_eq!(sentiment.label, SentimentLabel::Positive);
                assert_eq!(readability.interpretation, "Insufficient text");
                assert_eq!(
                    engagement_suggestions.source,
                    SuggestionSource::ContentAnalysis
                );
            }
            AnalysisResult::Failed { .. } => panic!("expected complete record"),
        }
    }

    #[test]
    fn test_failure_record_preserves_length() {
        let result = AnalysisResult::failure("backend exploded", 42);
        match result {
            AnalysisResult::Failed {
                error, text_length, ..
            } => {
                assert!(error.starts_with("Analysis failed:"));
                assert_eq!(text_length, 42);
            }
            AnalysisResult::Complete { .. } => panic!("expected failure record"),
        }
    }

    #[test]
    fn test_serialization_shapes() {
        let failed = AnalysisResult::failure("x", 3);
        let json = serde_json::to_value(&failed).unwrap();
        assert!(json.get("error").is_some());
        assert!(json.get("sentiment").is_none());
        assert_eq!(json["text_length"], 3);
    }
}
