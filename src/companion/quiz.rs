use serde::Serialize;

use crate::companion::catalog::PersonaCatalog;
use crate::error::CoreError;

/// One selectable answer for a quiz question. `value` is the stable key the
/// client echoes back; `persona_id` is the companion the answer votes for.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizOption {
    pub label: &'static str,
    pub value: &'static str,
    pub persona_id: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizQuestion {
    pub id: &'static str,
    pub prompt: &'static str,
    pub options: &'static [QuizOption],
}

/// Convert a completed answer sequence into exactly one persona id.
///
/// Every catalog persona starts with a tally of zero; each answer increments
/// the tally of the persona its chosen option votes for. The winner is the
/// highest tally, with ties resolved by catalog iteration order. An all-zero
/// tally falls back to the first persona in catalog order.
///
/// Answers must be one per question, in question order, each matching an
/// offered option value; anything else is a caller bug surfaced as
/// [`CoreError::InvalidAnswer`].
pub fn assign_persona<S: AsRef<str>>(
    answers: &[S],
    questions: &[QuizQuestion],
    catalog: &PersonaCatalog,
) -> Result<&'static str, CoreError> {
    if answers.len() != questions.len() {
        return Err(CoreError::InvalidAnswer(format!(
            "expected {} answers, got {}",
            questions.len(),
            answers.len()
        )));
    }

    let ids: Vec<&'static str> = catalog.persona_ids().collect();
    let mut tally = vec![0u32; ids.len()];

    for (question, answer) in questions.iter().zip(answers) {
        let answer = answer.as_ref();
        let option = question
            .options
            .iter()
            .find(|option| option.value == answer)
            .ok_or_else(|| {
                CoreError::InvalidAnswer(format!(
                    "'{answer}' is not an option for question '{}'",
                    question.id
                ))
            })?;

        // The startup consistency check guarantees every option persona id
        // is present in the catalog.
        if let Some(idx) = ids.iter().position(|id| *id == option.persona_id) {
            tally[idx] += 1;
        }
    }

    let mut winner = 0usize;
    for (idx, count) in tally.iter().enumerate() {
        if *count > tally[winner] {
            winner = idx;
        }
    }

    Ok(ids[winner])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companion::catalog::PersonaCatalog;

    const TIE_BANK: [QuizQuestion; 2] = [
        QuizQuestion {
            id: "q1",
            prompt: "First question",
            options: &[
                QuizOption {
                    label: "A",
                    value: "a",
                    persona_id: "luna",
                },
                QuizOption {
                    label: "B",
                    value: "b",
                    persona_id: "buddy",
                },
            ],
        },
        QuizQuestion {
            id: "q2",
            prompt: "Second question",
            options: &[
                QuizOption {
                    label: "A",
                    value: "a",
                    persona_id: "luna",
                },
                QuizOption {
                    label: "B",
                    value: "b",
                    persona_id: "buddy",
                },
            ],
        },
    ];

    #[test]
    fn majority_vote_wins() {
        let catalog = PersonaCatalog::builtin().unwrap();
        let winner = assign_persona(&["a", "a"], &TIE_BANK, &catalog).unwrap();
        assert_eq!(winner, "luna");
        let winner = assign_persona(&["b", "b"], &TIE_BANK, &catalog).unwrap();
        assert_eq!(winner, "buddy");
    }

    #[test]
    fn tie_resolves_to_first_in_catalog_order() {
        let catalog = PersonaCatalog::builtin().unwrap();
        // 1-1 tie between luna and buddy; luna precedes buddy in the catalog.
        let winner = assign_persona(&["a", "b"], &TIE_BANK, &catalog).unwrap();
        assert_eq!(winner, "luna");
        let winner = assign_persona(&["b", "a"], &TIE_BANK, &catalog).unwrap();
        assert_eq!(winner, "luna");
    }

    #[test]
    fn empty_quiz_defaults_to_first_persona() {
        let catalog = PersonaCatalog::builtin().unwrap();
        let winner = assign_persona::<&str>(&[], &[], &catalog).unwrap();
        assert_eq!(winner, "luna");
    }

    #[test]
    fn deterministic_over_repeated_calls() {
        let catalog = PersonaCatalog::builtin().unwrap();
        let answers = ["b", "a"];
        let first = assign_persona(&answers, &TIE_BANK, &catalog).unwrap();
        for _ in 0..10 {
            assert_eq!(assign_persona(&answers, &TIE_BANK, &catalog).unwrap(), first);
        }
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let catalog = PersonaCatalog::builtin().unwrap();
        let err = assign_persona(&["a"], &TIE_BANK, &catalog).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAnswer(_)));
    }

    #[test]
    fn unknown_answer_value_is_rejected() {
        let catalog = PersonaCatalog::builtin().unwrap();
        let err = assign_persona(&["a", "zzz"], &TIE_BANK, &catalog).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAnswer(_)));
    }

    #[test]
    fn builtin_bank_scores_to_expected_companion() {
        let catalog = PersonaCatalog::builtin().unwrap();
        let questions = catalog.questions();
        // Stressed mood, clarity, guided prompts: three votes for sage.
        let winner = assign_persona(&["stressed", "clarity", "guided"], questions, &catalog)
            .unwrap();
        assert_eq!(winner, "sage");
    }
}
