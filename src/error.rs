use thiserror::Error;

/// Caller-contract violations in the core. None of these are expected in
/// normal operation; they indicate an integration bug and should surface
/// immediately rather than be silently recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown persona id '{0}'")]
    PersonaNotFound(String),

    #[error("invalid quiz answer: {0}")]
    InvalidAnswer(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
