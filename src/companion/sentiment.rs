use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Coarse emotional categories used throughout classification, dialogue
/// selection, and progression. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Happy,
    Sad,
    Stressed,
    Calm,
    Excited,
    Neutral,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 6] = [
        MoodLabel::Happy,
        MoodLabel::Sad,
        MoodLabel::Stressed,
        MoodLabel::Calm,
        MoodLabel::Excited,
        MoodLabel::Neutral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MoodLabel::Happy => "happy",
            MoodLabel::Sad => "sad",
            MoodLabel::Stressed => "stressed",
            MoodLabel::Calm => "calm",
            MoodLabel::Excited => "excited",
            MoodLabel::Neutral => "neutral",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "happy" => Ok(MoodLabel::Happy),
            "sad" => Ok(MoodLabel::Sad),
            "stressed" => Ok(MoodLabel::Stressed),
            "calm" => Ok(MoodLabel::Calm),
            "excited" => Ok(MoodLabel::Excited),
            "neutral" => Ok(MoodLabel::Neutral),
            other => Err(CoreError::InvalidInput(format!(
                "'{other}' is not a mood label"
            ))),
        }
    }
}

impl std::fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representative keywords per mood. Matching is substring containment on the
/// lowercased text, not word-boundary tokenization, so "sadly" matches "sad".
/// That false-positive behavior is a known limitation of the heuristic and is
/// kept as-is; changing it would shift classification outcomes.
const MOOD_KEYWORDS: [(MoodLabel, &[&str]); 6] = [
    (
        MoodLabel::Happy,
        &[
            "happy", "joy", "great", "wonderful", "excited", "love", "amazing", "good", "smile",
            "grateful",
        ],
    ),
    (
        MoodLabel::Sad,
        &[
            "sad", "down", "upset", "cry", "hurt", "lonely", "miss", "lost", "empty",
        ],
    ),
    (
        MoodLabel::Stressed,
        &[
            "stress",
            "anxiety",
            "worried",
            "overwhelm",
            "pressure",
            "busy",
            "exhausted",
            "tired",
            "difficult",
        ],
    ),
    (
        MoodLabel::Calm,
        &[
            "calm", "peace", "relax", "quiet", "serene", "still", "gentle", "soft", "ease",
        ],
    ),
    (
        MoodLabel::Excited,
        &[
            "excited",
            "eager",
            "thrilled",
            "can't wait",
            "looking forward",
            "pumped",
            "energized",
        ],
    ),
    (
        MoodLabel::Neutral,
        &["okay", "fine", "alright", "normal", "usual", "same"],
    ),
];

const CONFIDENCE_PER_HIT: f32 = 0.2;

/// Outcome of a single classification call. Not persisted beyond the current
/// reflection.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentResult {
    pub mood: MoodLabel,
    pub confidence: f32,
    pub matched_keywords: Vec<&'static str>,
}

/// Derive a coarse mood from free-text reflection content by counting keyword
/// hits. Each keyword contributes at most one hit regardless of how often it
/// repeats in the text. Dominant mood is the strictly-highest count, ties
/// broken by [`MoodLabel::ALL`] order; zero hits default to neutral.
pub fn classify(text: &str) -> SentimentResult {
    let lowered = text.to_lowercase();

    let mut counts = [0u32; MoodLabel::ALL.len()];
    let mut matched_keywords = Vec::new();

    for (idx, (_, keywords)) in MOOD_KEYWORDS.iter().enumerate() {
        for keyword in keywords.iter() {
            if lowered.contains(keyword) {
                counts[idx] += 1;
                matched_keywords.push(*keyword);
            }
        }
    }

    let mut mood = MoodLabel::Neutral;
    let mut max_count = 0u32;
    for (idx, count) in counts.iter().enumerate() {
        if *count > max_count {
            max_count = *count;
            mood = MOOD_KEYWORDS[idx].0;
        }
    }

    SentimentResult {
        mood,
        confidence: (max_count as f32 * CONFIDENCE_PER_HIT).min(1.0),
        matched_keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_keywords_and_picks_dominant_mood() {
        let result = classify("I feel happy and grateful");
        assert_eq!(result.mood, MoodLabel::Happy);
        assert!(result.matched_keywords.contains(&"happy"));
        assert!(result.matched_keywords.contains(&"grateful"));
        assert!((result.confidence - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_text_is_neutral_with_zero_confidence() {
        let result = classify("");
        assert_eq!(result.mood, MoodLabel::Neutral);
        assert_eq!(result.confidence, 0.0);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn no_hits_is_neutral() {
        let result = classify("xyz abc");
        assert_eq!(result.mood, MoodLabel::Neutral);
        assert_eq!(result.confidence, 0.0);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let a = classify("happy happy happy");
        let b = classify("happy");
        assert_eq!(a.mood, MoodLabel::Happy);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.matched_keywords, vec!["happy"]);
    }

    #[test]
    fn tie_breaks_by_declaration_order() {
        // One happy hit ("joy") and one sad hit ("lonely"); happy precedes
        // sad in declaration order.
        let result = classify("joy and lonely in equal measure");
        assert_eq!(result.mood, MoodLabel::Happy);
    }

    #[test]
    fn substring_matching_is_not_word_bounded() {
        // "sadly" contains "sad"; the heuristic accepts that on purpose.
        let result = classify("sadly the meeting ran long");
        assert_eq!(result.mood, MoodLabel::Sad);
        assert!(result.matched_keywords.contains(&"sad"));
    }

    #[test]
    fn multi_word_keywords_match() {
        let result = classify("I can't wait for tomorrow");
        assert_eq!(result.mood, MoodLabel::Excited);
        assert!(result.matched_keywords.contains(&"can't wait"));
    }

    #[test]
    fn matched_keywords_preserve_mood_then_keyword_order() {
        let result = classify("a smile, but tired and worried");
        assert_eq!(result.matched_keywords, vec!["smile", "worried", "tired"]);
        assert_eq!(result.mood, MoodLabel::Stressed);
    }

    #[test]
    fn confidence_caps_at_one() {
        // Six happy keywords in one text: 6 * 0.2 would be 1.2.
        let result = classify("happy joy great wonderful love amazing");
        assert_eq!(result.mood, MoodLabel::Happy);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn mood_label_round_trips_through_parse() {
        for mood in MoodLabel::ALL {
            assert_eq!(MoodLabel::parse(mood.as_str()).unwrap(), mood);
        }
        assert!(MoodLabel::parse("melancholy").is_err());
    }
}
