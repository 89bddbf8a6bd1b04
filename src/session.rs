//! Quiz session state and question decks
//!
//! A [`QuizSession`] owns the questions of one run and moves through
//! `Idle → InProgress → Finished`. Front-ends drive it with
//! [`QuizSession::answer`] or [`QuizSession::time_out`] and render
//! [`QuizSession::current`]; timing itself stays in the front-end.

use crate::error::{QuizError, QuizResult};
use crate::model::Question;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InProgress { index: usize },
    Finished,
}

/// Outcome of one answered (or timed-out) question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub question_id: usize,
    /// 0-based position in the asked order
    pub position: usize,
    pub correct: bool,
    pub answer_index: usize,
    /// `None` when the time ran out
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub score: usize,
    pub total: usize,
}

impl Summary {
    pub fn accuracy_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.score as f64 * 100.0 / self.total as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    state: SessionState,
    verdicts: Vec<Verdict>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            state: SessionState::Idle,
            verdicts: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Shuffle the question order and begin; question ids are unchanged
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> QuizResult<()> {
        if self.state != SessionState::Idle {
            return Err(QuizError::InvalidTransition(
                "start called on a session that already started".to_string(),
            ));
        }
        if self.questions.is_empty() {
            return Err(QuizError::InsufficientData(
                "session has no questions".to_string(),
            ));
        }

        self.questions.shuffle(rng);
        self.state = SessionState::InProgress { index: 0 };
        Ok(())
    }

    pub fn current(&self) -> Option<&Question> {
        match self.state {
            SessionState::InProgress { index } => self.questions.get(index),
            _ => None,
        }
    }

    /// 1-based position of the current question and the total count
    pub fn progress(&self) -> (usize, usize) {
        let total = self.questions.len();
        match self.state {
            SessionState::Idle => (0, total),
            SessionState::InProgress { index } => (index + 1, total),
            SessionState::Finished => (total, total),
        }
    }

    /// Record the player's choice for the current question and advance
    pub fn answer(&mut self, choice: usize) -> QuizResult<Verdict> {
        let (position, question) = self.current_or_err()?;
        if choice >= question.choices.len() {
            return Err(QuizError::ChoiceOutOfRange {
                choice,
                len: question.choices.len(),
            });
        }

        let verdict = Verdict {
            question_id: question.id,
            position,
            correct: question.is_correct(choice),
            answer_index: question.answer_index,
            selected: Some(choice),
        };
        Ok(self.record(verdict))
    }

    /// The time ran out on the current question: counts as wrong, then advance
    pub fn time_out(&mut self) -> QuizResult<Verdict> {
        let (position, question) = self.current_or_err()?;
        let verdict = Verdict {
            question_id: question.id,
            position,
            correct: false,
            answer_index: question.answer_index,
            selected: None,
        };
        Ok(self.record(verdict))
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn score(&self) -> usize {
        self.verdicts.iter().filter(|v| v.correct).count()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            score: self.score(),
            total: self.questions.len(),
        }
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    /// Questions answered wrongly or timed out, in the order they were asked
    pub fn wrong_questions(&self) -> Vec<Question> {
        self.verdicts
            .iter()
            .filter(|v| !v.correct)
            .filter_map(|v| self.questions.get(v.position))
            .cloned()
            .collect()
    }

    /// A fresh idle session over the wrongly answered questions
    ///
    /// `None` until the session finished, or when every answer was right.
    pub fn review(&self) -> Option<QuizSession> {
        if !self.is_finished() {
            return None;
        }
        let wrong = self.wrong_questions();
        (!wrong.is_empty()).then(|| QuizSession::new(wrong))
    }

    fn current_or_err(&self) -> QuizResult<(usize, &Question)> {
        match self.state {
            SessionState::Idle => Err(QuizError::InvalidTransition(
                "session has not started".to_string(),
            )),
            SessionState::Finished => Err(QuizError::InvalidTransition(
                "session already finished".to_string(),
            )),
            SessionState::InProgress { index } => self
                .questions
                .get(index)
                .map(|q| (index, q))
                .ok_or_else(|| {
                    QuizError::InvalidTransition(format!("no question at position {}", index))
                }),
        }
    }

    fn record(&mut self, verdict: Verdict) -> Verdict {
        self.verdicts.push(verdict.clone());
        if let SessionState::InProgress { index } = self.state {
            let next = index + 1;
            self.state = if next >= self.questions.len() {
                SessionState::Finished
            } else {
                SessionState::InProgress { index: next }
            };
        }
        verdict
    }
}

/// Read a JSON array of questions
pub fn load_deck(path: &Path) -> QuizResult<Vec<Question>> {
    let content = fs::read_to_string(path)
        .map_err(|e| QuizError::Deck(format!("Failed to read '{}': {}", path.display(), e)))?;

    let questions: Vec<Question> = serde_json::from_str(&content)
        .map_err(|e| QuizError::Deck(format!("Failed to parse '{}': {}", path.display(), e)))?;

    if let Some(bad) = questions.iter().find(|q| q.correct_choice().is_none()) {
        return Err(QuizError::Deck(format!(
            "question {} in '{}' has answerIndex {} but only {} choices",
            bad.id,
            path.display(),
            bad.answer_index,
            bad.choices.len()
        )));
    }

    Ok(questions)
}

/// Write questions as a pretty-printed JSON array
pub fn save_deck(path: &Path, questions: &[Question]) -> QuizResult<()> {
    let json = serde_json::to_string_pretty(questions)
        .map_err(|e| QuizError::Deck(format!("Failed to serialize deck: {}", e)))?;
    fs::write(path, json)
        .map_err(|e| QuizError::Deck(format!("Failed to write '{}': {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VocabRecord;
    use crate::questions::QuestionBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn questions() -> Vec<Question> {
        let records: Vec<VocabRecord> = [
            ("綿密", "meticulous"),
            ("斡旋", "mediation"),
            ("曖昧", "vague"),
            ("顕著", "remarkable"),
            ("趣旨", "gist"),
        ]
        .into_iter()
        .map(|(w, m)| VocabRecord::new(w, m, "名詞"))
        .collect();
        QuestionBuilder::new().build(&records, &mut StdRng::seed_from_u64(4))
    }

    fn started() -> QuizSession {
        let mut session = QuizSession::new(questions());
        session.start(&mut StdRng::seed_from_u64(9)).unwrap();
        session
    }

    fn wrong_choice(q: &Question) -> usize {
        (q.answer_index + 1) % q.choices.len()
    }

    #[test]
    fn test_idle_until_started() {
        let mut session = QuizSession::new(questions());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.current().is_none());
        assert_eq!(session.progress(), (0, 5));
        assert!(matches!(session.answer(0), Err(QuizError::InvalidTransition(_))));
    }

    #[test]
    fn test_start_shuffles_order_but_keeps_ids() {
        let session = started();
        let mut ids: Vec<usize> = session.questions().iter().map(|q| q.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(session.state(), SessionState::InProgress { index: 0 });
        assert_eq!(session.progress(), (1, 5));
    }

    #[test]
    fn test_start_twice_is_invalid() {
        let mut session = started();
        assert!(matches!(
            session.start(&mut StdRng::seed_from_u64(0)),
            Err(QuizError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_empty_session_cannot_start() {
        let mut session = QuizSession::new(Vec::new());
        assert!(matches!(
            session.start(&mut StdRng::seed_from_u64(0)),
            Err(QuizError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_full_run_scoring_and_review() {
        let mut session = started();

        // correct, wrong, timeout, correct, wrong
        let mut expected_wrong = Vec::new();
        for step in 0..5 {
            let q = session.current().unwrap().clone();
            let verdict = match step {
                0 | 3 => session.answer(q.answer_index).unwrap(),
                2 => {
                    expected_wrong.push(q.id);
                    session.time_out().unwrap()
                }
                _ => {
                    expected_wrong.push(q.id);
                    session.answer(wrong_choice(&q)).unwrap()
                }
            };
            assert_eq!(verdict.question_id, q.id);
            assert_eq!(verdict.answer_index, q.answer_index);
        }

        assert!(session.is_finished());
        assert!(session.current().is_none());
        assert_eq!(session.summary(), Summary { score: 2, total: 5 });
        assert_eq!(session.summary().accuracy_percent(), 40.0);
        assert_eq!(session.verdicts()[2].selected, None);

        let wrong_ids: Vec<usize> = session.wrong_questions().iter().map(|q| q.id).collect();
        assert_eq!(wrong_ids, expected_wrong);

        let review = session.review().unwrap();
        assert_eq!(review.state(), SessionState::Idle);
        assert_eq!(review.questions().len(), 3);
    }

    #[test]
    fn test_answer_after_finish_is_invalid() {
        let mut session = started();
        while !session.is_finished() {
            session.time_out().unwrap();
        }
        assert!(matches!(session.time_out(), Err(QuizError::InvalidTransition(_))));
        assert_eq!(session.summary().score, 0);
    }

    #[test]
    fn test_choice_out_of_range_does_not_advance() {
        let mut session = started();
        let result = session.answer(4);
        assert_eq!(result, Err(QuizError::ChoiceOutOfRange { choice: 4, len: 4 }));
        assert_eq!(session.progress(), (1, 5));
    }

    #[test]
    fn test_no_review_when_all_correct() {
        let mut session = started();
        while let Some(q) = session.current().cloned() {
            session.answer(q.answer_index).unwrap();
        }
        assert_eq!(session.summary().score, 5);
        assert!(session.review().is_none());
    }

    #[test]
    fn test_review_with_duplicate_ids_replays_the_missed_word() {
        let mut deck = questions();
        for q in deck.iter_mut() {
            q.id = 1;
        }
        let mut session = QuizSession::new(deck);
        session.start(&mut StdRng::seed_from_u64(3)).unwrap();

        let mut missed = Vec::new();
        while let Some(q) = session.current().cloned() {
            if session.progress().0 == 3 {
                missed.push(q.source_word.clone());
                session.answer(wrong_choice(&q)).unwrap();
            } else {
                session.answer(q.answer_index).unwrap();
            }
        }

        let replay: Vec<String> = session
            .wrong_questions()
            .into_iter()
            .map(|q| q.source_word)
            .collect();
        assert_eq!(replay, missed);
        assert_eq!(session.verdicts()[2].position, 2);
    }

    #[test]
    fn test_no_review_before_finish() {
        assert!(started().review().is_none());
    }

    #[test]
    fn test_deck_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("n1-quiz-deck-{}.json", std::process::id()));
        let deck = questions();
        save_deck(&path, &deck).unwrap();
        let loaded = load_deck(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, deck);
    }

    #[test]
    fn test_load_deck_rejects_bad_answer_index() {
        let path = std::env::temp_dir().join(format!("n1-quiz-bad-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{"id":1,"prompt":"p","choices":["a","b"],"answerIndex":5,"word":"w","pos":"名詞"}]"#,
        )
        .unwrap();
        let result = load_deck(&path);
        let _ = fs::remove_file(&path);
        match result {
            Err(QuizError::Deck(msg)) => assert!(msg.contains("answerIndex 5")),
            other => panic!("Expected Deck error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_deck_missing_file() {
        let result = load_deck(Path::new("/nonexistent/n1-deck.json"));
        assert!(matches!(result, Err(QuizError::Deck(_))));
    }
}
