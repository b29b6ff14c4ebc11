use serde::{Deserialize, Serialize};

use crate::companion::sentiment::{classify, MoodLabel, SentimentResult};

/// Reflections shorter than this never earn progress; the UI gates the
/// button, but the engine re-validates.
pub const MIN_REFLECTION_CHARS: usize = 10;
pub const XP_PER_WORD: u32 = 2;
/// Cap on XP earned by a single reflection.
pub const MAX_REFLECTION_XP: u32 = 100;
pub const XP_PER_LEVEL: u32 = 100;

/// Progress for one session's assigned companion. An owned value: the
/// transition functions return a new state and the caller performs the swap,
/// so no locking is ever needed inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub persona_id: String,
    pub level: u32,
    pub xp: u32,
    pub streak_days: u32,
    pub current_mood: MoodLabel,
}

/// Informational event consumed by the UI to show the celebratory modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    pub new_level: u32,
}

/// What a single accepted reflection produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReflectionOutcome {
    pub earned_xp: u32,
    pub sentiment: SentimentResult,
    pub level_up: Option<LevelUp>,
}

impl ProgressionState {
    pub fn new(persona_id: impl Into<String>) -> Self {
        Self {
            persona_id: persona_id.into(),
            level: 1,
            xp: 0,
            streak_days: 0,
            current_mood: MoodLabel::Happy,
        }
    }

    /// Level is always a pure function of cumulative XP; it is recomputed
    /// after every mutation rather than tracked independently.
    fn level_for_xp(xp: u32) -> u32 {
        xp / XP_PER_LEVEL + 1
    }

    /// Apply one completed reflection: classify the text, update the mood,
    /// award XP by word count, and recompute the level. Returns the unchanged
    /// state and no outcome when the text is below the minimum length.
    pub fn apply_reflection(&self, text: &str) -> (Self, Option<ReflectionOutcome>) {
        if text.chars().count() < MIN_REFLECTION_CHARS {
            return (self.clone(), None);
        }

        let sentiment = classify(text);
        let word_count = text.split_whitespace().count() as u32;
        let earned_xp = (word_count * XP_PER_WORD).min(MAX_REFLECTION_XP);

        let mut next = self.clone();
        next.current_mood = sentiment.mood;
        next.xp = self.xp + earned_xp;
        next.level = Self::level_for_xp(next.xp);
        debug_assert_eq!(next.level, next.xp / XP_PER_LEVEL + 1);

        let level_up = (next.level > self.level).then_some(LevelUp {
            new_level: next.level,
        });

        let outcome = ReflectionOutcome {
            earned_xp,
            sentiment,
            level_up,
        };
        (next, Some(outcome))
    }

    /// One more completed daily reflection cycle. Uncapped; deciding what
    /// counts as "once per day" belongs to the caller.
    pub fn increment_streak(&self) -> Self {
        let mut next = self.clone();
        next.streak_days = self.streak_days + 1;
        next
    }
}
