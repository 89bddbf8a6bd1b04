//! Trimming, part-of-speech guessing, deduplication and truncation
//!
//! Everything here is deterministic: the same input order always yields the
//! same output.

use crate::model::{POS_ADJECTIVE, POS_ADVERB, POS_NOUN, POS_VERB, VocabRecord};
use std::collections::HashSet;

/// One entry of the part-of-speech heuristic: any suffix match yields `tag`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosRule {
    pub suffixes: &'static [&'static str],
    pub tag: &'static str,
}

impl PosRule {
    pub fn matches(&self, word: &str) -> bool {
        self.suffixes.iter().any(|suffix| word.ends_with(suffix))
    }
}

/// Ordered rules; the first match wins, [`POS_NOUN`] applies when none match
pub const POS_RULES: &[PosRule] = &[
    PosRule {
        suffixes: &["する"],
        tag: POS_VERB,
    },
    PosRule {
        suffixes: &["い"],
        tag: POS_ADJECTIVE,
    },
    PosRule {
        suffixes: &["く", "に"],
        tag: POS_ADVERB,
    },
];

/// Guess a part of speech from the surface form of `word`
pub fn guess_pos(word: &str) -> &'static str {
    POS_RULES
        .iter()
        .find(|rule| rule.matches(word))
        .map(|rule| rule.tag)
        .unwrap_or(POS_NOUN)
}

/// Clean up merged records
///
/// 1. trim `word`, `meaning` and `part_of_speech`, guessing the latter when empty
/// 2. drop records whose word or meaning is empty
/// 3. keep only the first record for each word
/// 4. truncate to `limit` records, if given
pub fn normalize(records: Vec<VocabRecord>, limit: Option<usize>) -> Vec<VocabRecord> {
    let mut seen: HashSet<String> = HashSet::new();

    let mut out: Vec<VocabRecord> = records
        .into_iter()
        .map(clean_record)
        .filter(|r| !r.word.is_empty() && !r.meaning.is_empty())
        .filter(|r| seen.insert(r.word.clone()))
        .collect();

    if let Some(limit) = limit {
        out.truncate(limit);
    }

    out
}

fn clean_record(record: VocabRecord) -> VocabRecord {
    let word = record.word.trim().to_string();
    let meaning = record.meaning.trim().to_string();
    let pos = record.part_of_speech.trim();
    let part_of_speech = if pos.is_empty() {
        guess_pos(&word).to_string()
    } else {
        pos.to_string()
    };

    VocabRecord {
        word,
        meaning,
        part_of_speech,
    }
}
