//! Four-choice question generation
//!
//! Each vocabulary record becomes one question whose wrong answers
//! (distractors) are meanings drawn from the rest of the vocabulary.
//!
//! Randomness is injected, so a seeded generator gives reproducible decks:
//!
//! ```ignore
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let questions = QuestionBuilder::new().build(&records, &mut rng);
//! ```

use crate::model::{Question, VocabRecord};
use rand::Rng;
use rand::seq::SliceRandom;

/// Number of wrong answers offered next to the correct meaning
pub const DISTRACTOR_COUNT: usize = Question::CHOICE_COUNT - 1;

/// Random draws allowed per question before falling back to a pool scan
pub const DEFAULT_MAX_ATTEMPTS: usize = 60;

/// Placeholder replaced by the word in the prompt template
const WORD_PLACEHOLDER: &str = "{word}";

#[derive(Debug, Clone)]
pub struct QuestionBuilder {
    max_attempts: usize,
    prompt_template: String,
}

impl Default for QuestionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionBuilder {
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            prompt_template: "語の英訳はどれ？「{word}」".to_string(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Override the prompt; `{word}` is replaced by the vocabulary word
    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    pub fn prompt_for(&self, word: &str) -> String {
        self.prompt_template.replace(WORD_PLACEHOLDER, word)
    }

    /// Build one question per record, in input order, with ids `1..=n`
    ///
    /// Distractors come from the meanings of all `records`. When the pool
    /// has fewer than four distinct meanings a question carries fewer than
    /// four choices; callers that need complete questions check
    /// [`distinct_meaning_count`] first.
    pub fn build<R: Rng + ?Sized>(&self, records: &[VocabRecord], rng: &mut R) -> Vec<Question> {
        let pool: Vec<&str> = records.iter().map(|r| r.meaning.as_str()).collect();

        records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let distractors = self.pick_distractors(&pool, &record.meaning, rng);

                let mut choices: Vec<String> = Vec::with_capacity(Question::CHOICE_COUNT);
                choices.push(record.meaning.clone());
                choices.extend(distractors.into_iter().map(str::to_string));
                choices.shuffle(rng);

                let answer_index = choices
                    .iter()
                    .position(|c| c == &record.meaning)
                    .unwrap_or_default();

                Question {
                    id: idx + 1,
                    prompt: self.prompt_for(&record.word),
                    choices,
                    answer_index,
                    source_word: record.word.clone(),
                    part_of_speech: record.part_of_speech.clone(),
                    explanation: None,
                }
            })
            .collect()
    }

    /// Draw up to [`DISTRACTOR_COUNT`] meanings distinct from `correct` and each other
    ///
    /// Uniform random draws first, capped at `max_attempts`; any slots still
    /// empty are filled by walking the pool from a random offset, so a pool
    /// with enough distinct meanings always fills every slot.
    fn pick_distractors<'a, R: Rng + ?Sized>(
        &self,
        pool: &[&'a str],
        correct: &str,
        rng: &mut R,
    ) -> Vec<&'a str> {
        let mut picked: Vec<&'a str> = Vec::with_capacity(DISTRACTOR_COUNT);
        if pool.is_empty() {
            return picked;
        }

        let accept = |candidate: &str, picked: &[&str]| {
            !candidate.is_empty() && candidate != correct && !picked.contains(&candidate)
        };

        let mut attempts = 0;
        while picked.len() < DISTRACTOR_COUNT && attempts < self.max_attempts {
            let candidate = pool[rng.gen_range(0..pool.len())];
            if accept(candidate, &picked) {
                picked.push(candidate);
            }
            attempts += 1;
        }

        if picked.len() < DISTRACTOR_COUNT {
            let start = rng.gen_range(0..pool.len());
            for offset in 0..pool.len() {
                if picked.len() == DISTRACTOR_COUNT {
                    break;
                }
                let candidate = pool[(start + offset) % pool.len()];
                if accept(candidate, &picked) {
                    picked.push(candidate);
                }
            }
        }

        picked
    }
}

/// Number of distinct non-empty meanings in `records`
pub fn distinct_meaning_count(records: &[VocabRecord]) -> usize {
    let mut meanings: Vec<&str> = records
        .iter()
        .map(|r| r.meaning.as_str())
        .filter(|m| !m.is_empty())
        .collect();
    meanings.sort_unstable();
    meanings.dedup();
    meanings.len()
}
