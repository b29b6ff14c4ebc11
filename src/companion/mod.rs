pub mod catalog;
pub mod dialogue;
pub mod progression;
pub mod quiz;
pub mod sentiment;

pub use catalog::{Persona, PersonaCatalog};
pub use progression::{LevelUp, ProgressionState, ReflectionOutcome};
pub use quiz::{assign_persona, QuizOption, QuizQuestion};
pub use sentiment::{classify, MoodLabel, SentimentResult};
