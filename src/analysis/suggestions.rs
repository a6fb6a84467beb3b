//! Engagement suggestions: a three-tier fallback chain.
//!
//! Tier 1 asks the remote completion model for structured suggestions; any
//! failure there is logged and replaced by the static tier-3 set, never
//! surfaced to the user. Without a remote client, the rule-based analyzer
//! (tier 2) runs directly; its own failure collapses to a minimal fallback
//! record. The `source` tag records which tier actually produced the result,
//! and callers must not conflate the tiers.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::topics::{detect_topics, GENERIC_HASHTAGS};
use crate::llm::{LlmError, OpenAiClient};

/// Characters of content included in the remote prompt.
const PROMPT_MAX_CHARS: usize = 1000;

const PERSONAL_PRONOUNS: &[&str] = &["you", "your", "we", "our", "us"];
const ENTHUSIASM_WORDS: &[&str] = &["exciting", "amazing", "great", "fantastic", "wonderful"];
const ENGAGEMENT_PROMPTS: &[&str] =
    &["what do you think", "share", "comment", "tell us", "let me know"];
const LINK_PHRASES: &[&str] = &["click", "link", "visit", "read more", "learn more"];
const SHARE_PHRASES: &[&str] = &["tag", "share", "repost"];
const EMOJI_SET: &[char] = &['😀', '😊', '👍', '💪', '🔥', '✨'];

/// Which tier produced a suggestion record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    OpenaiGpt5,
    ContentAnalysis,
    SmartSuggestions,
    FallbackAnalysis,
}

impl SuggestionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenaiGpt5 => "openai_gpt5",
            Self::ContentAnalysis => "content_analysis",
            Self::SmartSuggestions => "smart_suggestions",
            Self::FallbackAnalysis => "fallback_analysis",
        }
    }
}

/// Engagement improvement suggestions for a piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub hashtag_suggestions: Vec<String>,
    pub content_improvements: Vec<String>,
    pub tone_suggestions: Vec<String>,
    pub cta_recommendations: Vec<String>,
    pub visual_enhancements: Vec<String>,
    pub source: SuggestionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_strengths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_improvements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Shape of the remote model's JSON response (no provenance fields).
#[derive(Debug, Deserialize)]
struct RemoteSuggestions {
    #[serde(default)]
    hashtag_suggestions: Vec<String>,
    #[serde(default)]
    content_improvements: Vec<String>,
    #[serde(default)]
    tone_suggestions: Vec<String>,
    #[serde(default)]
    cta_recommendations: Vec<String>,
    #[serde(default)]
    visual_enhancements: Vec<String>,
    #[serde(default)]
    overall_score: Option<f64>,
    #[serde(default)]
    key_strengths: Option<Vec<String>>,
    #[serde(default)]
    priority_improvements: Option<Vec<String>>,
}

const SYSTEM_PROMPT: &str = "You are a social media expert specializing in content \
optimization and engagement improvement. Provide detailed, actionable advice.";

/// Suggestion engine over the three tiers.
pub struct SuggestionEngine {
    openai: Option<OpenAiClient>,
}

impl SuggestionEngine {
    pub fn new(openai: Option<OpenAiClient>) -> Self {
        Self { openai }
    }

    /// True when the remote tier is configured.
    pub fn uses_remote(&self) -> bool {
        self.openai.is_some()
    }

    /// Generate suggestions for a text. Never fails and never retries; tier
    /// selection and degradation happen here.
    pub async fn generate(&self, text: &str) -> SuggestionResult {
        match &self.openai {
            Some(client) => match remote_suggestions(client, text).await {
                Ok(result) => {
                    info!("engagement suggestions generated by {}", client.model());
                    result
                }
                Err(e) => {
                    // Log the detail, hide it from the user.
                    error!("engagement suggestions error: {}", e);
                    static_suggestions()
                }
            },
            None => match rule_based_suggestions(text) {
                Ok(result) => result,
                Err(e) => {
                    error!("content analysis error: {}", e);
                    minimal_fallback()
                }
            },
        }
    }
}

/// Tier 1: structured suggestions from the remote completion model.
async fn remote_suggestions(
    client: &OpenAiClient,
    text: &str,
) -> Result<SuggestionResult, LlmError> {
    let prompt = build_prompt(text);
    let raw = client.complete_json(SYSTEM_PROMPT, &prompt).await?;
    let remote: RemoteSuggestions =
        serde_json::from_str(&raw).map_err(|e| LlmError::Parse(e.to_string()))?;

    Ok(SuggestionResult {
        hashtag_suggestions: remote.hashtag_suggestions,
        content_improvements: remote.content_improvements,
        tone_suggestions: remote.tone_suggestions,
        cta_recommendations: remote.cta_recommendations,
        visual_enhancements: remote.visual_enhancements,
        source: SuggestionSource::OpenaiGpt5,
        overall_score: remote.overall_score,
        key_strengths: remote.key_strengths,
        priority_improvements: remote.priority_improvements,
        detected_topics: None,
        note: None,
    })
}

fn build_prompt(text: &str) -> String {
    let content = truncate_chars(text, PROMPT_MAX_CHARS);
    format!(
        r##"Analyze the following social media content and provide specific, actionable suggestions to improve engagement and readability. Focus on:
1. Hashtag recommendations
2. Content structure improvements
3. Tone and language enhancements
4. Call-to-action suggestions
5. Visual appeal recommendations

Content to analyze:
"{content}"

Please provide your response in JSON format with the following structure:
{{
    "hashtag_suggestions": ["#example1", "#example2"],
    "content_improvements": ["improvement 1", "improvement 2"],
    "tone_suggestions": ["suggestion 1", "suggestion 2"],
    "cta_recommendations": ["cta 1", "cta 2"],
    "visual_enhancements": ["enhancement 1", "enhancement 2"],
    "overall_score": 7.5,
    "key_strengths": ["strength 1", "strength 2"],
    "priority_improvements": ["top priority 1", "top priority 2"]
}}"##
    )
}

/// Tier 2: rule-based content-aware analysis.
///
/// The Err arm exists so empty input degrades to the minimal fallback record
/// instead of producing nonsense metrics. Whitespace-only text is still
/// analyzed (word count zero, generic hashtags), matching how the content
/// heuristics treat any other sparse input.
fn rule_based_suggestions(text: &str) -> Result<SuggestionResult, String> {
    if text.is_empty() {
        return Err("no content to analyze".to_string());
    }

    let text_lower = text.to_lowercase();
    let word_count = text.split_whitespace().count();
    let sentence_count = text
        .split('.')
        .filter(|s| !s.trim().is_empty())
        .count();
    let avg_sentence_length = word_count as f64 / sentence_count.max(1) as f64;

    // Hashtags from detected topics: first two per topic, deduped, capped.
    let topics = detect_topics(&text_lower);
    let detected_topics: Vec<String> = topics.iter().map(|t| t.name.to_string()).collect();
    let mut hashtag_suggestions: Vec<String> = Vec::new();
    for topic in &topics {
        for tag in topic.hashtags.iter().take(2) {
            if !hashtag_suggestions.iter().any(|t| t == tag) {
                hashtag_suggestions.push(tag.to_string());
            }
        }
    }
    hashtag_suggestions.truncate(5);
    if hashtag_suggestions.is_empty() {
        hashtag_suggestions = GENERIC_HASHTAGS.iter().map(|t| t.to_string()).collect();
    }

    // Content structure.
    let mut content_improvements = Vec::new();
    if avg_sentence_length > 25.0 {
        content_improvements.push("Break down long sentences for better readability".to_string());
    }
    if word_count < 50 {
        content_improvements.push("Expand content with more details and examples".to_string());
    } else if word_count > 500 {
        content_improvements
            .push("Consider breaking content into multiple posts or add subheadings".to_string());
    }
    if !text.contains(['.', '!', '?']) {
        content_improvements.push("Add punctuation to improve text flow".to_string());
    }
    if !text.contains('\n') {
        content_improvements.push("Use paragraph breaks to improve visual structure".to_string());
    }

    // Tone.
    let mut tone_suggestions = Vec::new();
    if !PERSONAL_PRONOUNS.iter().any(|w| text_lower.contains(w)) {
        tone_suggestions
            .push("Use more personal pronouns to connect with your audience".to_string());
    }
    if !text.contains('!') {
        tone_suggestions
            .push("Add enthusiasm with strategic use of exclamation marks".to_string());
    }
    if !ENTHUSIASM_WORDS.iter().any(|w| text_lower.contains(w)) {
        tone_suggestions.push("Include more engaging adjectives to create excitement".to_string());
    }

    // Calls to action.
    let mut cta_recommendations = Vec::new();
    if !ENGAGEMENT_PROMPTS.iter().any(|p| text_lower.contains(p)) {
        cta_recommendations.push("Ask a specific question to encourage comments".to_string());
    }
    if !LINK_PHRASES.iter().any(|p| text_lower.contains(p)) {
        cta_recommendations.push("Include a clear call-to-action for next steps".to_string());
    }
    if !SHARE_PHRASES.iter().any(|p| text_lower.contains(p)) {
        cta_recommendations
            .push("Encourage sharing by asking readers to tag friends".to_string());
    }

    // Visual structure.
    let mut visual_enhancements = Vec::new();
    let bullet_count = text.matches('•').count();
    let dash_count = text.matches('-').count();
    if bullet_count == 0 && dash_count < 2 {
        visual_enhancements
            .push("Use bullet points or lists to organize information".to_string());
    }
    let uppercase_count = text.chars().filter(|c| c.is_uppercase()).count();
    if (uppercase_count as f64) / (text.chars().count() as f64) < 0.02 {
        visual_enhancements.push("Use strategic capitalization for emphasis".to_string());
    }
    if !EMOJI_SET.iter().any(|e| text.contains(*e)) {
        visual_enhancements
            .push("Consider adding 1-2 relevant emojis to increase engagement".to_string());
    }

    // Every category carries at least one message.
    if content_improvements.is_empty() {
        content_improvements.push(
            "Your content structure looks good - consider adding more specific examples"
                .to_string(),
        );
    }
    if tone_suggestions.is_empty() {
        tone_suggestions
            .push("Your tone is appropriate - maintain this engaging style".to_string());
    }
    if cta_recommendations.is_empty() {
        cta_recommendations
            .push("Great content - consider adding a discussion starter".to_string());
    }
    if visual_enhancements.is_empty() {
        visual_enhancements.push("Your formatting looks clean - well done!".to_string());
    }

    content_improvements.truncate(3);
    tone_suggestions.truncate(3);
    cta_recommendations.truncate(3);
    visual_enhancements.truncate(3);

    Ok(SuggestionResult {
        hashtag_suggestions,
        content_improvements,
        tone_suggestions,
        cta_recommendations,
        visual_enhancements,
        source: SuggestionSource::ContentAnalysis,
        overall_score: None,
        key_strengths: None,
        priority_improvements: None,
        detected_topics: Some(detected_topics),
        note: Some(format!(
            "Personalized suggestions based on your {}-word content",
            word_count
        )),
    })
}

/// Tier 3: canned suggestions, used when the remote tier was attempted and
/// failed.
fn static_suggestions() -> SuggestionResult {
    SuggestionResult {
        hashtag_suggestions: ["#content", "#socialmedia", "#engagement", "#marketing", "#tips"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        content_improvements: vec![
            "Use shorter sentences for better readability".to_string(),
            "Add more descriptive and engaging words".to_string(),
            "Structure content with clear paragraphs".to_string(),
            "Include specific examples and data points".to_string(),
        ],
        tone_suggestions: vec![
            "Use more conversational language".to_string(),
            "Add personal touches to connect with audience".to_string(),
            "Be authentic and genuine in your voice".to_string(),
        ],
        cta_recommendations: vec![
            "Ask a question to encourage comments".to_string(),
            "Include \"Share if you agree\" or similar phrases".to_string(),
            "Add clear next steps for readers".to_string(),
        ],
        visual_enhancements: vec![
            "Add relevant emojis sparingly".to_string(),
            "Use line breaks for better visual structure".to_string(),
            "Include bullet points for easy scanning".to_string(),
        ],
        source: SuggestionSource::SmartSuggestions,
        overall_score: None,
        key_strengths: None,
        priority_improvements: None,
        detected_topics: None,
        note: Some("AI-powered suggestions based on content analysis".to_string()),
    }
}

/// Minimal record when the rule-based analyzer itself fails.
fn minimal_fallback() -> SuggestionResult {
    SuggestionResult {
        hashtag_suggestions: ["#content", "#socialmedia", "#engagement"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        content_improvements: vec!["Consider expanding your content with more details".to_string()],
        tone_suggestions: vec!["Maintain an engaging, conversational tone".to_string()],
        cta_recommendations: vec!["Add a question to encourage reader interaction".to_string()],
        visual_enhancements: vec!["Use formatting to improve readability".to_string()],
        source: SuggestionSource::FallbackAnalysis,
        overall_score: None,
        key_strengths: None,
        priority_improvements: None,
        detected_topics: None,
        note: Some("Basic suggestions due to analysis error".to_string()),
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
