//! JLPT N1 vocabulary quiz
//!
//! Fetches N1 word lists from several public providers, merges and
//! deduplicates them, and turns each word into a four-choice question
//! asking for its English meaning.
//!
//! # Overview
//!
//! 1. **Sources** - one adapter per provider, mapping its format onto [`VocabRecord`]
//! 2. **Aggregator** - runs every adapter concurrently, ignoring failures
//! 3. **Normalizer** - trims, guesses missing parts of speech, deduplicates, truncates
//! 4. **Question builder** - picks three distractors per word and shuffles the choices
//! 5. **Session** - drives one quiz run, including review of wrong answers
//!
//! # Example
//!
//! ```ignore
//! use n1_quiz::{Aggregator, QuizConfig, QuizSession, load_all, prepare_quiz};
//! use n1_quiz::sources::{HttpFetcher, default_sources};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = QuizConfig::from_env()?;
//!     let http = HttpFetcher::new(config.fetch_timeout)?;
//!     let vocab = load_all(&default_sources(&http), &Aggregator::new(config.source_deadline)).await;
//!
//!     let mut rng = rand::thread_rng();
//!     let mut session = QuizSession::new(prepare_quiz(&vocab, &config, &mut rng)?);
//!     session.start(&mut rng)?;
//!     println!("{}", session.current().unwrap().prompt);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod questions;
pub mod session;
pub mod sources;

pub use aggregate::{AggregateReport, Aggregator, SourceCount};
pub use config::{Category, QuizConfig, clamp_limit, parse_limit};
pub use error::{QuizError, QuizResult};
pub use model::{Question, VocabRecord};
pub use normalize::{guess_pos, normalize};
pub use pipeline::{load_all, load_status, prepare_quiz};
pub use questions::QuestionBuilder;
pub use session::{QuizSession, SessionState, Summary, Verdict, load_deck, save_deck};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Seeded generator when `seed` is given, entropy-seeded otherwise
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
