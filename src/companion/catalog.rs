use std::collections::BTreeSet;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::companion::quiz::{QuizOption, QuizQuestion};
use crate::companion::sentiment::MoodLabel;
use crate::error::CoreError;

/// A named companion with fixed flavor attributes, assigned to a session
/// based on quiz results.
#[derive(Debug, Clone, Serialize)]
pub struct Persona {
    pub id: &'static str,
    pub display_name: &'static str,
    pub emoji: &'static str,
    pub personality_label: &'static str,
    pub description: &'static str,
    pub traits: &'static [&'static str],
    pub gentle_prompt: Option<&'static str>,
    /// Candidate dialogue lines per mood, indexed by [`MoodLabel::ALL`] order.
    #[serde(skip_serializing)]
    mood_dialogue: [&'static [&'static str]; 6],
}

impl Persona {
    pub fn dialogue_for(&self, mood: MoodLabel) -> &'static [&'static str] {
        self.mood_dialogue[mood as usize]
    }
}

/// Immutable registry of companions plus the quiz question bank. Built once
/// at startup; read-only afterwards.
pub struct PersonaCatalog {
    personas: Vec<Persona>,
    questions: &'static [QuizQuestion],
}

impl PersonaCatalog {
    /// Construct the built-in catalog and validate its internal consistency.
    /// A failure here is a configuration error and is fatal at load time.
    pub fn builtin() -> Result<Self> {
        let catalog = Self {
            personas: builtin_personas(),
            questions: QUESTIONS,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Result<&Persona, CoreError> {
        self.personas
            .iter()
            .find(|persona| persona.id == id)
            .ok_or_else(|| CoreError::PersonaNotFound(id.to_string()))
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    /// Persona ids in catalog iteration order. This order is the quiz
    /// tie-break order and must stay stable.
    pub fn persona_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.personas.iter().map(|persona| persona.id)
    }

    pub fn questions(&self) -> &'static [QuizQuestion] {
        self.questions
    }

    fn validate(&self) -> Result<()> {
        if self.personas.is_empty() {
            bail!("persona catalog is empty");
        }
        if self.questions.is_empty() {
            bail!("quiz question bank is empty");
        }

        for persona in &self.personas {
            for mood in MoodLabel::ALL {
                if persona.dialogue_for(mood).is_empty() {
                    bail!(
                        "persona '{}' has no dialogue for mood '{}'",
                        persona.id,
                        mood
                    );
                }
            }
        }

        let catalog_ids: BTreeSet<&str> = self.personas.iter().map(|p| p.id).collect();
        let mut option_ids = BTreeSet::new();
        for question in self.questions {
            if question.options.is_empty() {
                bail!("quiz question '{}' has no options", question.id);
            }
            for option in question.options {
                option_ids.insert(option.persona_id);
            }
        }

        // The tally universe and the option table must describe the same set
        // of companions, otherwise scoring silently drops votes.
        if catalog_ids != option_ids {
            bail!(
                "catalog personas {:?} do not match quiz option personas {:?}",
                catalog_ids,
                option_ids
            );
        }

        Ok(())
    }
}

const QUESTIONS: &[QuizQuestion] = &[
    QuizQuestion {
        id: "mood",
        prompt: "How are you feeling right now?",
        options: &[
            QuizOption {
                label: "Stressed or overwhelmed",
                value: "stressed",
                persona_id: "sage",
            },
            QuizOption {
                label: "Calm but want to go deeper",
                value: "calm",
                persona_id: "luna",
            },
            QuizOption {
                label: "Energetic and ready for action",
                value: "energetic",
                persona_id: "buddy",
            },
            QuizOption {
                label: "Creative and curious",
                value: "creative",
                persona_id: "spark",
            },
        ],
    },
    QuizQuestion {
        id: "need",
        prompt: "What do you need most right now?",
        options: &[
            QuizOption {
                label: "Peace and quiet reflection",
                value: "peace",
                persona_id: "luna",
            },
            QuizOption {
                label: "A boost of joy and motivation",
                value: "joy",
                persona_id: "buddy",
            },
            QuizOption {
                label: "Clarity and wisdom",
                value: "clarity",
                persona_id: "sage",
            },
            QuizOption {
                label: "Playfulness and new ideas",
                value: "play",
                persona_id: "spark",
            },
        ],
    },
    QuizQuestion {
        id: "style",
        prompt: "How do you like to reflect?",
        options: &[
            QuizOption {
                label: "Quick daily check-ins",
                value: "quick",
                persona_id: "buddy",
            },
            QuizOption {
                label: "Deep, thoughtful journaling",
                value: "deep",
                persona_id: "luna",
            },
            QuizOption {
                label: "Guided prompts and questions",
                value: "guided",
                persona_id: "sage",
            },
            QuizOption {
                label: "Creative and free-form",
                value: "creative",
                persona_id: "spark",
            },
        ],
    },
];

fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona {
            id: "luna",
            display_name: "Luna",
            emoji: "\u{1F431}",
            personality_label: "Calm & Reflective",
            description: "Luna loves quiet moments and deep thoughts. She's your companion for gentle, mindful reflection.",
            traits: &["calm", "reflective", "mindful"],
            gentle_prompt: Some("Settle in for a moment. What's quietly asking for your attention today?"),
            mood_dialogue: [
                &[
                    "I love these peaceful, happy moments with you.",
                    "Your warmth makes today feel soft and bright.",
                    "What a lovely day to simply be.",
                ],
                &[
                    "I'm here, right beside you...",
                    "It's okay to feel sad. Let's sit with it quietly.",
                    "We can take this slowly, together.",
                ],
                &[
                    "Take a slow, deep breath with me...",
                    "One gentle step at a time.",
                    "Let's find a still point in all of this.",
                ],
                &[
                    "This peace feels just right.",
                    "Let's stay in this quiet moment a while.",
                    "So serene... I could purr.",
                ],
                &[
                    "Oh! Even I'm feeling sparkly today!",
                    "Your energy is contagious, in the nicest way.",
                    "Let's carry this feeling somewhere good.",
                ],
                &[
                    "How are you today, really?",
                    "Ready whenever you are.",
                    "Let's reflect together.",
                ],
            ],
        },
        Persona {
            id: "buddy",
            display_name: "Buddy",
            emoji: "\u{1F436}",
            personality_label: "Energetic & Cheerful",
            description: "Buddy brings joy and excitement to your day. He keeps you motivated and celebrates every win.",
            traits: &["energetic", "cheerful", "loyal"],
            gentle_prompt: Some("Quick check-in! What's one small win from today, big or tiny?"),
            mood_dialogue: [
                &[
                    "I love spending time with you!",
                    "Your positivity makes me so happy!",
                    "What a wonderful day!",
                ],
                &[
                    "I'm here for you, always.",
                    "Even the best days have clouds. I'll stay close.",
                    "Want to take a slow walk through it together?",
                ],
                &[
                    "Take a deep breath... you've got this!",
                    "One step at a time, we'll get there!",
                    "I believe in you. Truly!",
                ],
                &[
                    "Ahh, this calm feels nice.",
                    "Let's enjoy this moment together.",
                    "Even I can sit still for this.",
                ],
                &[
                    "This is amazing!",
                    "I'm so excited I could chase my tail!",
                    "Let's go, let's go, let's go!",
                ],
                &[
                    "How are you today?",
                    "Ready when you are!",
                    "Want to check in for a minute?",
                ],
            ],
        },
        Persona {
            id: "sage",
            display_name: "Sage",
            emoji: "\u{1F989}",
            personality_label: "Wise & Insightful",
            description: "Sage offers wisdom and thoughtful perspectives. He helps you see clearly when things feel heavy.",
            traits: &["wise", "insightful", "steady"],
            gentle_prompt: Some("Consider today from a little distance. What stands out when you look back?"),
            mood_dialogue: [
                &[
                    "Joy noticed is joy doubled.",
                    "Your happiness is well earned. Savor it.",
                    "A good day deserves a good look back.",
                ],
                &[
                    "Sorrow passes, though slowly. I'll wait with you.",
                    "Naming a heavy feeling is the first step through it.",
                    "It's wise to let sadness speak before answering it.",
                ],
                &[
                    "Pressure bends; it need not break.",
                    "Breathe first. Decide second.",
                    "Even tangled branches sort themselves one twig at a time.",
                ],
                &[
                    "Stillness is where clarity lives.",
                    "A calm mind sees the whole forest.",
                    "Let's keep this steady feeling close.",
                ],
                &[
                    "Enthusiasm is a fine compass. Where does it point?",
                    "Channel that spark with intention.",
                    "Excitement and wisdom make good companions.",
                ],
                &[
                    "What shall we examine today?",
                    "An ordinary day still holds lessons.",
                    "I'm listening whenever you're ready.",
                ],
            ],
        },
        Persona {
            id: "spark",
            display_name: "Spark",
            emoji: "\u{1F430}",
            personality_label: "Creative & Playful",
            description: "Spark inspires creativity and fun exploration. She turns reflection into play.",
            traits: &["creative", "playful", "curious"],
            gentle_prompt: Some("If today were a color or a doodle, what would it look like? Describe it!"),
            mood_dialogue: [
                &[
                    "Yay! Your happy is my favorite color!",
                    "Let's paint this feeling everywhere!",
                    "What a sparkly, wonderful day!",
                ],
                &[
                    "Soft blues today... I'll sit with you in them.",
                    "Even sad days make interesting pictures.",
                    "We can doodle our way through this, slowly.",
                ],
                &[
                    "Let's shake the jitters out, one hop at a time!",
                    "Deep breath in... imagine blowing away the clouds.",
                    "Big piles get smaller one playful scoop at a time.",
                ],
                &[
                    "Mmm, this quiet is cozy.",
                    "Let's float in this calm for a bit.",
                    "So peaceful... like a nap in a sunbeam.",
                ],
                &[
                    "This is SO exciting!",
                    "Ideas are popping like popcorn!",
                    "Let's gooo! Where to first?",
                ],
                &[
                    "What should we make of today?",
                    "Ready for a little wondering?",
                    "Let's poke around your thoughts together.",
                ],
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_passes_validation() {
        let catalog = PersonaCatalog::builtin().unwrap();
        assert_eq!(
            catalog.persona_ids().collect::<Vec<_>>(),
            vec!["luna", "buddy", "sage", "spark"]
        );
        assert_eq!(catalog.questions().len(), 3);
    }

    #[test]
    fn lookup_is_idempotent() {
        let catalog = PersonaCatalog::builtin().unwrap();
        let first = catalog.get("sage").unwrap().display_name;
        let second = catalog.get("sage").unwrap().display_name;
        assert_eq!(first, second);
        let ids_a: Vec<_> = catalog.persona_ids().collect();
        let ids_b: Vec<_> = catalog.persona_ids().collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn unknown_persona_is_not_found() {
        let catalog = PersonaCatalog::builtin().unwrap();
        let err = catalog.get("bear").unwrap_err();
        assert_eq!(err, CoreError::PersonaNotFound("bear".to_string()));
    }

    #[test]
    fn every_persona_covers_every_mood() {
        let catalog = PersonaCatalog::builtin().unwrap();
        for persona in catalog.personas() {
            for mood in MoodLabel::ALL {
                assert!(
                    !persona.dialogue_for(mood).is_empty(),
                    "{} missing {} dialogue",
                    persona.id,
                    mood
                );
            }
        }
    }

    #[test]
    fn quiz_options_reference_only_catalog_personas() {
        let catalog = PersonaCatalog::builtin().unwrap();
        for question in catalog.questions() {
            for option in question.options {
                assert!(catalog.get(option.persona_id).is_ok());
            }
        }
    }
}
