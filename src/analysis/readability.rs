//! Readability metrics from standard published formulas.
//!
//! All formulas run over the same word/sentence/syllable statistics. The
//! syllable counter is a heuristic (vowel groups with a silent-e rule); exact
//! tie-breaking is not part of the contract.

use serde::{Deserialize, Serialize};

/// Readability metrics plus a human-readable interpretation.
///
/// Two sentinel states share the all-zero shape and differ only in the
/// `interpretation` message: "Insufficient text" (input too short, formulas
/// never invoked) and "Analysis failed" (computation failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadabilityResult {
    pub flesch_kincaid_grade: f64,
    pub flesch_reading_ease: f64,
    pub coleman_liau_index: f64,
    pub automated_readability_index: f64,
    pub gunning_fog: f64,
    pub avg_sentence_length: f64,
    pub avg_syllables_per_word: f64,
    pub word_count: usize,
    pub sentence_count: usize,
    pub interpretation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReadabilityResult {
    fn sentinel(error: impl Into<String>, interpretation: &str) -> Self {
        Self {
            flesch_kincaid_grade: 0.0,
            flesch_reading_ease: 0.0,
            coleman_liau_index: 0.0,
            automated_readability_index: 0.0,
            gunning_fog: 0.0,
            avg_sentence_length: 0.0,
            avg_syllables_per_word: 0.0,
            word_count: 0,
            sentence_count: 0,
            interpretation: interpretation.to_string(),
            error: Some(error.into()),
        }
    }
}

/// Compute readability metrics for a text, never failing.
///
/// Texts shorter than 10 characters (trimmed) return the "Insufficient text"
/// sentinel without invoking any formula.
pub fn calculate_readability(text: &str) -> ReadabilityResult {
    if text.trim().chars().count() < 10 {
        return ReadabilityResult::sentinel(
            "Text too short for readability analysis",
            "Insufficient text",
        );
    }

    match compute_metrics(text) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("readability analysis error: {}", e);
            ReadabilityResult::sentinel(
                format!("Readability analysis failed: {}", e),
                "Analysis failed",
            )
        }
    }
}

fn compute_metrics(text: &str) -> Result<ReadabilityResult, &'static str> {
    let words = lexical_words(text);
    let word_count = words.len();
    if word_count == 0 {
        return Err("no lexical words found");
    }

    let sentence_count = count_sentences(text).max(1);
    let syllable_total: usize = words.iter().map(|w| count_syllables(w)).sum();
    let letter_total: usize = words
        .iter()
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).count())
        .sum();
    let complex_words = words.iter().filter(|w| count_syllables(w) >= 3).count();

    let wc = word_count as f64;
    let sc = sentence_count as f64;
    let words_per_sentence = wc / sc;
    let syllables_per_word = syllable_total as f64 / wc;
    let letters_per_word = letter_total as f64 / wc;

    let flesch_reading_ease =
        206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    let flesch_kincaid_grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;
    // Coleman-Liau works on letters and sentences per 100 words.
    let coleman_liau_index =
        0.0588 * (letters_per_word * 100.0) - 0.296 * (sc / wc * 100.0) - 15.8;
    let automated_readability_index =
        4.71 * letters_per_word + 0.5 * words_per_sentence - 21.43;
    let gunning_fog = 0.4 * (words_per_sentence + 100.0 * complex_words as f64 / wc);

    Ok(ReadabilityResult {
        flesch_kincaid_grade,
        flesch_reading_ease,
        coleman_liau_index,
        automated_readability_index,
        gunning_fog,
        avg_sentence_length: words_per_sentence,
        avg_syllables_per_word: syllables_per_word,
        word_count,
        sentence_count,
        interpretation: interpret_readability(flesch_reading_ease, flesch_kincaid_grade),
        error: None,
    })
}

/// Words for lexical counting: whitespace-separated tokens with surrounding
/// punctuation stripped, keeping only tokens that retain alphanumerics.
fn lexical_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| {
            token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_string()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Count sentences: segments delimited by runs of `.`, `!`, or `?` that
/// contain at least one alphanumeric character.
fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|segment| segment.chars().any(|c| c.is_alphanumeric()))
        .count()
}

/// Heuristic English syllable count: vowel groups (including y), minus a
/// trailing silent 'e', minimum one.
fn count_syllables(word: &str) -> usize {
    let lower = word.to_lowercase();
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut groups = 0;
    let mut in_group = false;
    for c in lower.chars() {
        if is_vowel(c) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }

    if groups > 1 && lower.ends_with('e') && !lower.ends_with("le") {
        groups -= 1;
    }

    groups.max(1)
}

/// Bucket the reading-ease score into seven bands and attach the grade level.
fn interpret_readability(flesch_ease: f64, grade_level: f64) -> String {
    let ease_desc = if flesch_ease >= 90.0 {
        "Very Easy (5th grade level)"
    } else if flesch_ease >= 80.0 {
        "Easy (6th grade level)"
    } else if flesch_ease >= 70.0 {
        "Fairly Easy (7th grade level)"
    } else if flesch_ease >= 60.0 {
        "Standard (8th-9th grade level)"
    } else if flesch_ease >= 50.0 {
        "Fairly Difficult (10th-12th grade level)"
    } else if flesch_ease >= 30.0 {
        "Difficult (college level)"
    } else {
        "Very Difficult (graduate level)"
    };

    format!("{}. Grade level: {:.1}", ease_desc, grade_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_text_sentinel() {
        for short in ["", "hi", "   hi    "] {
            let result = calculate_readability(short);
            assert_eq!(result.interpretation, "Insufficient text");
            assert_eq!(result.flesch_reading_ease, 0.0);
            assert_eq!(result.word_count, 0);
            assert_eq!(result.sentence_count, 0);
            assert!(result.error.is_some());
        }
    }

    #[test]
    fn test_simple_sentence_counts() {
        let result =
            calculate_readability("Hello world, this is a test post about technology and innovation.");
        assert_eq!(result.word_count, 11);
        assert_eq!(result.sentence_count, 1);
        assert!(result.error.is_none());
        assert!(result.avg_sentence_length > 10.0);
    }

    #[test]
    fn test_easy_text_scores_high() {
        let result = calculate_readability("The cat sat. The dog ran. We all had fun.");
        assert!(result.flesch_reading_ease > 80.0, "ease was {}", result.flesch_reading_ease);
        assert_eq!(result.sentence_count, 3);
    }

    #[test]
    fn test_dense_text_scores_lower() {
        let easy = calculate_readability("The cat sat. The dog ran. We all had fun.");
        let dense = calculate_readability(
            "Institutional heterogeneity fundamentally complicates longitudinal \
             socioeconomic comparability across administrative jurisdictions.",
        );
        assert!(dense.flesch_reading_ease < easy.flesch_reading_ease);
        assert!(dense.gunning_fog > easy.gunning_fog);
    }

    #[test]
    fn test_interpretation_contains_grade() {
        let result = calculate_readability("The cat sat on the mat. It was warm there.");
        assert!(result.interpretation.contains("Grade level:"));
    }

    #[test]
    fn test_sentence_count_ignores_decimal_noise() {
        // Trailing punctuation runs without letters don't add sentences.
        assert_eq!(count_sentences("One sentence... with ellipsis."), 2);
        assert_eq!(count_sentences("Just one!"), 1);
        assert_eq!(count_sentences(""), 0);
    }

    #[test]
    fn test_syllable_heuristic() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("hello"), 2);
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("readability"), 5);
        // Minimum of one, even with no vowels.
        assert_eq!(count_syllables("hmm"), 1);
    }
}
