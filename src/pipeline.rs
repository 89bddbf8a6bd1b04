//! End-to-end flow: sources → aggregate → normalize → questions
//!
//! # Example
//!
//! ```ignore
//! use n1_quiz::{Aggregator, QuizConfig, load_all, prepare_quiz};
//! use n1_quiz::sources::{HttpFetcher, default_sources};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = QuizConfig::from_env()?;
//!     let http = HttpFetcher::new(config.fetch_timeout)?;
//!     let vocab = load_all(&default_sources(&http), &Aggregator::new(config.source_deadline)).await;
//!     let questions = prepare_quiz(&vocab, &config, &mut rand::thread_rng())?;
//!     println!("{} questions", questions.len());
//!     Ok(())
//! }
//! ```

use crate::aggregate::Aggregator;
use crate::config::QuizConfig;
use crate::error::{QuizError, QuizResult};
use crate::model::{Question, VocabRecord};
use crate::normalize::normalize;
use crate::questions::{QuestionBuilder, distinct_meaning_count};
use crate::sources::VocabSource;
use rand::Rng;

/// Fetch every source and return the merged, deduplicated vocabulary
pub async fn load_all(sources: &[Box<dyn VocabSource>], aggregator: &Aggregator) -> Vec<VocabRecord> {
    let merged = aggregator.run_all(sources).await;
    let vocab = normalize(merged, None);
    tracing::info!(words = vocab.len(), "vocabulary loaded");
    vocab
}

/// Status line shown after loading
pub fn load_status(vocab: &[VocabRecord]) -> String {
    format!("取得：{}語（重複除去後）", vocab.len())
}

/// Build the question list for one quiz
///
/// Applies the (already clamped) limit, builds one question per remaining
/// word, then keeps the questions matching the category.
pub fn prepare_quiz<R: Rng + ?Sized>(
    vocab: &[VocabRecord],
    config: &QuizConfig,
    rng: &mut R,
) -> QuizResult<Vec<Question>> {
    prepare_quiz_with(&QuestionBuilder::new(), vocab, config, rng)
}

pub fn prepare_quiz_with<R: Rng + ?Sized>(
    builder: &QuestionBuilder,
    vocab: &[VocabRecord],
    config: &QuizConfig,
    rng: &mut R,
) -> QuizResult<Vec<Question>> {
    let records = normalize(vocab.to_vec(), Some(config.limit));
    if records.is_empty() {
        return Err(QuizError::InsufficientData(
            "no vocabulary available from any source".to_string(),
        ));
    }

    let distinct = distinct_meaning_count(&records);
    if distinct < Question::CHOICE_COUNT {
        return Err(QuizError::InsufficientData(format!(
            "need at least {} distinct meanings, found {}",
            Question::CHOICE_COUNT,
            distinct
        )));
    }

    let questions: Vec<Question> = builder
        .build(&records, rng)
        .into_iter()
        .filter(|q| config.category.matches(&q.part_of_speech))
        .collect();

    if questions.is_empty() {
        return Err(QuizError::NoQuestionsForCategory(config.category.to_string()));
    }

    tracing::debug!(
        questions = questions.len(),
        category = %config.category,
        "quiz prepared"
    );
    Ok(questions)
}
