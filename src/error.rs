/// Errors surfaced to the quiz front-ends
///
/// None of these are fatal: each maps to a message the user sees
/// (see [`QuizError::user_message`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// No usable vocabulary, or too few distinct meanings for four choices
    InsufficientData(String),
    /// The category filter left no questions
    NoQuestionsForCategory(String),
    /// Session method called in the wrong state
    InvalidTransition(String),
    /// Selected choice does not exist on the current question
    ChoiceOutOfRange { choice: usize, len: usize },
    /// Malformed configuration value
    Config(String),
    /// Reading or writing a question deck failed
    Deck(String),
}

impl QuizError {
    /// Japanese text shown to the player
    pub fn user_message(&self) -> String {
        match self {
            QuizError::InsufficientData(_) => {
                "出題に必要なデータが不足しています。しばらくしてから再度お試しください。".to_string()
            }
            QuizError::NoQuestionsForCategory(_) => {
                "この条件では出題できません。カテゴリーや出題数を見直してください。".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::InsufficientData(msg) => write!(f, "Insufficient data: {}", msg),
            QuizError::NoQuestionsForCategory(category) => {
                write!(f, "No questions for category '{}'", category)
            }
            QuizError::InvalidTransition(msg) => write!(f, "Invalid session transition: {}", msg),
            QuizError::ChoiceOutOfRange { choice, len } => {
                write!(f, "Choice {} out of range (question has {} choices)", choice, len)
            }
            QuizError::Config(msg) => write!(f, "Configuration error: {}", msg),
            QuizError::Deck(msg) => write!(f, "Deck error: {}", msg),
        }
    }
}

impl std::error::Error for QuizError {}

/// Result type for quiz operations
pub type QuizResult<T> = Result<T, QuizError>;
