//! Topic detection for content-aware hashtag suggestions.

/// A topic category with its trigger keywords and suggested hashtags.
#[derive(Debug)]
pub struct Topic {
    pub name: &'static str,
    pub triggers: &'static [&'static str],
    pub hashtags: &'static [&'static str],
}

/// The fixed topic table. A topic counts as detected when any trigger keyword
/// appears as a substring of the lowercased text.
pub const TOPICS: &[Topic] = &[
    Topic {
        name: "business",
        triggers: &["business", "company", "startup", "entrepreneur", "market", "strategy"],
        hashtags: &["#business", "#entrepreneurship", "#startup", "#success"],
    },
    Topic {
        name: "technology",
        triggers: &["technology", "tech", "digital", "software", "app", "innovation"],
        hashtags: &["#tech", "#innovation", "#digital", "#future"],
    },
    Topic {
        name: "education",
        triggers: &["learn", "education", "study", "knowledge", "skill", "training"],
        hashtags: &["#learning", "#education", "#knowledge", "#growth"],
    },
    Topic {
        name: "health",
        triggers: &["health", "fitness", "wellness", "exercise", "nutrition", "diet"],
        hashtags: &["#health", "#wellness", "#fitness", "#lifestyle"],
    },
    Topic {
        name: "marketing",
        triggers: &["marketing", "brand", "promotion", "advertising", "social", "content"],
        hashtags: &["#marketing", "#socialmedia", "#branding", "#content"],
    },
    Topic {
        name: "finance",
        triggers: &["money", "finance", "investment", "budget", "profit", "income"],
        hashtags: &["#finance", "#money", "#investment", "#wealth"],
    },
    Topic {
        name: "travel",
        triggers: &["travel", "trip", "vacation", "adventure", "journey", "destination"],
        hashtags: &["#travel", "#adventure", "#explore", "#wanderlust"],
    },
    Topic {
        name: "food",
        triggers: &["food", "recipe", "cooking", "meal", "ingredient", "restaurant"],
        hashtags: &["#food", "#recipe", "#cooking", "#foodie"],
    },
    Topic {
        name: "personal",
        triggers: &["motivation", "inspiration", "goal", "success", "mindset", "personal"],
        hashtags: &["#motivation", "#inspiration", "#mindset", "#goals"],
    },
];

/// Hashtags used when no topic is detected.
pub const GENERIC_HASHTAGS: &[&str] = &["#content", "#socialmedia", "#engagement", "#tips"];

/// Detect which topics the (lowercased) text touches, in table order.
pub fn detect_topics(text_lower: &str) -> Vec<&'static Topic> {
    TOPICS
        .iter()
        .filter(|topic| topic.triggers.iter().any(|kw| text_lower.contains(kw)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_technology() {
        let detected = detect_topics("a post about technology and innovation");
        assert!(detected.iter().any(|t| t.name == "technology"));
    }

    #[test]
    fn test_detects_multiple_topics_in_order() {
        let detected = detect_topics("our startup built a fitness app");
        let names: Vec<_> = detected.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["business", "technology", "health"]);
    }

    #[test]
    fn test_no_topic() {
        assert!(detect_topics("the quick brown fox").is_empty());
    }

    #[test]
    fn test_substring_containment_not_tokenized() {
        // "apple" contains the trigger "app".
        let detected = detect_topics("i ate an apple");
        assert!(detected.iter().any(|t| t.name == "technology"));
    }

    #[test]
    fn test_every_topic_has_at_least_two_hashtags() {
        for topic in TOPICS {
            assert!(topic.hashtags.len() >= 2, "topic {} too few", topic.name);
        }
    }
}
