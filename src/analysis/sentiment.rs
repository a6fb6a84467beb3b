//! Sentiment scoring: model-backed with a keyword-heuristic fallback.
//!
//! Which implementation runs is decided once at startup based on classifier
//! availability, not per call. Failures never escape the scorer; a hard
//! failure produces the UNKNOWN record.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, warn};

use super::classifier::ClassifierClient;
use crate::config::ClassifierConfig;

/// Characters of input the classifier model accepts.
const MODEL_MAX_CHARS: usize = 512;

/// Positive keywords for the heuristic path. Matching is substring
/// containment on the lowercased text, not tokenized.
const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "fantastic", "wonderful", "awesome",
    "love", "like", "enjoy", "happy", "pleased", "satisfied", "perfect",
    "brilliant", "outstanding", "superb", "impressive", "remarkable",
    "best", "better", "success", "successful", "win", "victory",
    "beautiful", "nice", "lovely", "delightful", "charming", "pleasant",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "worst", "hate", "dislike",
    "angry", "sad", "disappointed", "frustrated", "annoyed", "upset",
    "fail", "failure", "problem", "issue", "wrong", "error", "mistake",
    "difficult", "hard", "challenging", "struggle", "pain", "hurt",
    "ugly", "disgusting", "boring", "dull", "poor", "weak",
];

/// Classified emotional valence. UNKNOWN only occurs on hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of sentiment analysis.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub confidence: f64,
    pub scores: BTreeMap<String, f64>,
    pub interpretation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SentimentResult {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            label: SentimentLabel::Unknown,
            confidence: 0.0,
            scores: BTreeMap::new(),
            interpretation: String::new(),
            method: None,
            error: Some(error.into()),
        }
    }
}

/// Sentiment scorer with a startup-selected backend.
pub struct SentimentScorer {
    classifier: Option<ClassifierClient>,
}

impl SentimentScorer {
    /// Select the backend once: remote classifier when one is reachable,
    /// keyword heuristic otherwise.
    pub async fn init(config: &ClassifierConfig) -> Self {
        Self {
            classifier: ClassifierClient::connect(config).await,
        }
    }

    /// A scorer that always uses the keyword heuristic.
    pub fn heuristic_only() -> Self {
        Self { classifier: None }
    }

    /// True when the model-backed path is active.
    pub fn uses_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Analyze sentiment. Never fails; a hard classifier failure yields the
    /// UNKNOWN record rather than propagating.
    pub async fn analyze(&self, text: &str) -> SentimentResult {
        match &self.classifier {
            Some(client) => match self.model_sentiment(client, text).await {
                Ok(result) => result,
                Err(e) => {
                    error!("sentiment analysis error: {}", e);
                    SentimentResult::failure(format!("Sentiment analysis failed: {}", e))
                }
            },
            None => basic_sentiment(text),
        }
    }

    async fn model_sentiment(
        &self,
        client: &ClassifierClient,
        text: &str,
    ) -> Result<SentimentResult, super::classifier::ClassifierError> {
        let input = truncate_chars(text, MODEL_MAX_CHARS);
        if input.len() < text.len() {
            warn!(
                "text truncated to {} characters for sentiment analysis",
                MODEL_MAX_CHARS
            );
        }

        let pairs = client.classify(input).await?;

        if pairs.is_empty() {
            return Ok(SentimentResult {
                label: SentimentLabel::Neutral,
                confidence: 0.5,
                scores: BTreeMap::new(),
                interpretation: "Unable to determine sentiment".to_string(),
                method: None,
                error: None,
            });
        }

        let mut scores = BTreeMap::new();
        let mut dominant = ("NEUTRAL".to_string(), 0.0);
        for pair in pairs {
            if pair.score > dominant.1 {
                dominant = (pair.label.clone(), pair.score);
            }
            scores.insert(pair.label, pair.score);
        }

        let label = normalize_label(&dominant.0);
        let confidence = dominant.1;

        Ok(SentimentResult {
            label,
            confidence,
            scores,
            interpretation: interpret_sentiment(label, confidence),
            method: None,
            error: None,
        })
    }
}

/// Map classifier label names onto the canonical set; indices follow the
/// LABEL_{0,1,2} convention of sentiment models.
fn normalize_label(raw: &str) -> SentimentLabel {
    match raw {
        "LABEL_0" | "NEGATIVE" | "negative" => SentimentLabel::Negative,
        "LABEL_1" | "NEUTRAL" | "neutral" => SentimentLabel::Neutral,
        "LABEL_2" | "POSITIVE" | "positive" => SentimentLabel::Positive,
        _ => SentimentLabel::Neutral,
    }
}

/// Keyword-heuristic sentiment used when no classifier is available.
pub fn basic_sentiment(text: &str) -> SentimentResult {
    let text_lower = text.to_lowercase();
    let positive_count = POSITIVE_WORDS
        .iter()
        .filter(|w| text_lower.contains(**w))
        .count();
    let negative_count = NEGATIVE_WORDS
        .iter()
        .filter(|w| text_lower.contains(**w))
        .count();
    let total_words = text.split_whitespace().count();

    let (label, mut confidence) = if positive_count > negative_count {
        (
            SentimentLabel::Positive,
            (0.6 + (positive_count - negative_count) as f64 * 0.1).min(0.9),
        )
    } else if negative_count > positive_count {
        (
            SentimentLabel::Negative,
            (0.6 + (negative_count - positive_count) as f64 * 0.1).min(0.9),
        )
    } else {
        (SentimentLabel::Neutral, 0.7)
    };

    // Length adjustment: short text is unreliable, long text corroborates.
    if total_words < 10 {
        confidence *= 0.8;
    } else if total_words > 100 {
        confidence = (confidence * 1.1).min(0.95);
    }

    // Remaining probability mass split evenly over the non-dominant labels.
    let remainder = (1.0 - confidence) / 2.0;
    let mut scores = BTreeMap::new();
    for candidate in [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ] {
        let score = if candidate == label { confidence } else { remainder };
        scores.insert(candidate.as_str().to_string(), score);
    }

    SentimentResult {
        label,
        confidence,
        scores,
        interpretation: interpret_sentiment(label, confidence),
        method: Some("basic_analysis".to_string()),
        error: None,
    }
}

/// Human-readable interpretation for a sentiment verdict.
fn interpret_sentiment(label: SentimentLabel, confidence: f64) -> String {
    let confidence_level = if confidence > 0.8 {
        "high"
    } else if confidence > 0.6 {
        "medium"
    } else {
        "low"
    };

    match label {
        SentimentLabel::Positive => format!(
            "The content expresses positive sentiment with {} confidence.",
            confidence_level
        ),
        SentimentLabel::Negative => format!(
            "The content expresses negative sentiment with {} confidence.",
            confidence_level
        ),
        SentimentLabel::Neutral => format!(
            "The content is neutral in sentiment with {} confidence.",
            confidence_level
        ),
        SentimentLabel::Unknown => format!(
            "Sentiment analysis shows UNKNOWN with {} confidence.",
            confidence_level
        ),
    }
}

/// Truncate to at most `max` characters, cutting on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_keywords() {
        let result = basic_sentiment("This is great, wonderful, amazing!");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.confidence >= 0.6 && result.confidence <= 0.9);
        let total: f64 = result.scores.values().sum();
        assert!((total - 1.0).abs() < 1e-9, "scores sum to {}", total);
        assert_eq!(result.method.as_deref(), Some("basic_analysis"));
    }

    #[test]
    fn test_negative_keywords() {
        let result = basic_sentiment(
            "A terrible, awful experience. The worst problem we have had and it keeps failing.",
        );
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.confidence > 0.6);
    }

    #[test]
    fn test_neutral_default() {
        let result = basic_sentiment("The meeting is scheduled for noon on Tuesday this week.");
        assert_eq!(result.label, SentimentLabel::Neutral);
        // 10 words, no length penalty applies.
        assert!((result.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_short_text_penalty() {
        // 3 positive hits in under 10 words: min(0.9, 0.6+0.3) * 0.8.
        let result = basic_sentiment("This is great, wonderful, amazing!");
        assert!((result.confidence - 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_long_text_boost_is_capped() {
        let mut text = String::from("great wonderful amazing excellent superb ");
        for _ in 0..120 {
            text.push_str("word ");
        }
        let result = basic_sentiment(&text);
        assert!(result.confidence <= 0.95);
    }

    #[test]
    fn test_label_normalization() {
        assert_eq!(normalize_label("LABEL_0"), SentimentLabel::Negative);
        assert_eq!(normalize_label("LABEL_1"), SentimentLabel::Neutral);
        assert_eq!(normalize_label("LABEL_2"), SentimentLabel::Positive);
        assert_eq!(normalize_label("POSITIVE"), SentimentLabel::Positive);
        assert_eq!(normalize_label("something_else"), SentimentLabel::Neutral);
    }

    #[test]
    fn test_interpretation_levels() {
        assert!(interpret_sentiment(SentimentLabel::Positive, 0.9).contains("high"));
        assert!(interpret_sentiment(SentimentLabel::Negative, 0.7).contains("medium"));
        assert!(interpret_sentiment(SentimentLabel::Neutral, 0.5).contains("low"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "héllo wörld".repeat(100);
        let truncated = truncate_chars(&text, 512);
        assert_eq!(truncated.chars().count(), 512);
        assert!(text.starts_with(truncated));
    }

    #[tokio::test]
    async fn test_heuristic_only_scorer() {
        let scorer = SentimentScorer::heuristic_only();
        assert!(!scorer.uses_classifier());
        let result = scorer.analyze("What a lovely and delightful day!").await;
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failure_record_shape() {
        let result = SentimentResult::failure("boom");
        assert_eq!(result.label, SentimentLabel::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.scores.is_empty());
        assert_eq!(result.error.as_deref(), Some("boom"));
    }
}
