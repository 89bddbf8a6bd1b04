//! Core data types shared by the fetch, normalize and question stages.

use serde::{Deserialize, Serialize};

/// Part-of-speech tag used when a word ends in する.
pub const POS_VERB: &str = "動詞";
/// Part-of-speech tag used when a word ends in い.
pub const POS_ADJECTIVE: &str = "形容詞";
/// Part-of-speech tag used when a word ends in く or に.
pub const POS_ADVERB: &str = "副詞";
/// Fallback part-of-speech tag.
pub const POS_NOUN: &str = "名詞";

/// All part-of-speech tags the heuristic can produce, in display order.
pub const KNOWN_POS_TAGS: &[&str] = &[POS_NOUN, POS_VERB, POS_ADJECTIVE, POS_ADVERB];

/// A single vocabulary entry after a source adapter mapped it
///
/// Adapters may leave `part_of_speech` empty; the normalizer fills it in.
/// Identity is the `word` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabRecord {
    pub word: String,
    pub meaning: String,
    #[serde(rename = "pos", default)]
    pub part_of_speech: String,
}

impl VocabRecord {
    pub fn new(
        word: impl Into<String>,
        meaning: impl Into<String>,
        part_of_speech: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            part_of_speech: part_of_speech.into(),
        }
    }
}

/// A multiple-choice question built from one [`VocabRecord`]
///
/// The serialized form uses the keys of the prebuilt JSON decks
/// (`id`, `prompt`, `choices`, `answerIndex`, `word`, `pos`, `explanation`),
/// so decks written by `n1-quiz export` and hand-made decks are interchangeable.
///
/// # Invariant
///
/// `choices[answer_index]` is the meaning of `source_word`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 1-based position in the vocabulary the question was built from
    pub id: usize,
    pub prompt: String,
    pub choices: Vec<String>,
    #[serde(rename = "answerIndex")]
    pub answer_index: usize,
    #[serde(rename = "word")]
    pub source_word: String,
    #[serde(rename = "pos", default)]
    pub part_of_speech: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Number of choices a complete question offers
    pub const CHOICE_COUNT: usize = 4;

    /// The correct meaning, if `answer_index` is in range
    pub fn correct_choice(&self) -> Option<&str> {
        self.choices.get(self.answer_index).map(String::as_str)
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer_index
    }

    /// True when the question offers exactly four choices
    pub fn is_complete(&self) -> bool {
        self.choices.len() == Self::CHOICE_COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            id: 1,
            prompt: "語の英訳はどれ？「綿密」".to_string(),
            choices: vec![
                "rough".to_string(),
                "meticulous".to_string(),
                "sudden".to_string(),
                "vague".to_string(),
            ],
            answer_index: 1,
            source_word: "綿密".to_string(),
            part_of_speech: POS_NOUN.to_string(),
            explanation: None,
        }
    }

    #[test]
    fn test_correct_choice() {
        let q = sample_question();
        assert_eq!(q.correct_choice(), Some("meticulous"));
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
        assert!(q.is_complete());
    }

    #[test]
    fn test_correct_choice_out_of_range() {
        let mut q = sample_question();
        q.answer_index = 7;
        assert_eq!(q.correct_choice(), None);
    }

    #[test]
    fn test_question_serializes_with_deck_keys() {
        let json = serde_json::to_value(sample_question()).unwrap();
        assert_eq!(json["answerIndex"], 1);
        assert_eq!(json["word"], "綿密");
        assert_eq!(json["pos"], "名詞");
        assert!(json.get("explanation").is_none());
    }

    #[test]
    fn test_question_reads_deck_with_explanation() {
        let raw = r#"{
            "id": 3,
            "prompt": "語の英訳はどれ？「斡旋」",
            "choices": ["mediation", "refusal", "delay", "profit"],
            "answerIndex": 0,
            "word": "斡旋",
            "pos": "名詞",
            "explanation": "斡旋 = mediation"
        }"#;
        let q: Question = serde_json::from_str(raw).unwrap();
        assert_eq!(q.id, 3);
        assert_eq!(q.correct_choice(), Some("mediation"));
        assert_eq!(q.explanation.as_deref(), Some("斡旋 = mediation"));
    }

    #[test]
    fn test_vocab_record_pos_defaults_to_empty() {
        let r: VocabRecord = serde_json::from_str(r#"{"word":"所以","meaning":"reason"}"#).unwrap();
        assert_eq!(r.part_of_speech, "");
    }
}
