//! Mock vocabulary source for testing
//!
//! Deterministic, network-free adapter used by tests and by the `--mock`
//! flag of the command line tool.
//!
//! # Example
//!
//! ```ignore
//! use n1_quiz::sources::{MockMode, MockSource, VocabSource, sample_records};
//!
//! #[tokio::test]
//! async fn test_fetch() {
//!     let mock = MockSource::new("mock", MockMode::Records(sample_records()));
//!     assert!(!mock.fetch().await.is_empty());
//! }
//! ```

use crate::model::VocabRecord;
use crate::sources::VocabSource;
use crate::sources::error::{SourceError, SourceResult};
use async_trait::async_trait;
use std::time::Duration;

/// Behaviours a [`MockSource`] can simulate
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Return these records
    Records(Vec<VocabRecord>),
    /// Fail with a network error carrying this message
    Error(String),
    /// Never finish; exercises aggregator deadlines
    Hang,
}

#[derive(Debug, Clone)]
pub struct MockSource {
    name: String,
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
}

impl MockSource {
    pub fn new(name: impl Into<String>, mode: MockMode) -> Self {
        Self {
            name: name.into(),
            mode,
            delay_ms: 0,
        }
    }

    /// Create a MockSource that waits `delay_ms` before answering
    pub fn with_delay(name: impl Into<String>, mode: MockMode, delay_ms: u64) -> Self {
        Self {
            name: name.into(),
            mode,
            delay_ms,
        }
    }
}

#[async_trait]
impl VocabSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_fetch(&self) -> SourceResult<Vec<VocabRecord>> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match &self.mode {
            MockMode::Records(records) => Ok(records.clone()),
            MockMode::Error(msg) => Err(SourceError::Network(msg.clone())),
            MockMode::Hang => {
                std::future::pending::<()>().await;
                Ok(Vec::new())
            }
        }
    }
}

/// A small built-in N1 word list
pub fn sample_records() -> Vec<VocabRecord> {
    [
        ("綿密", "meticulous", ""),
        ("斡旋", "mediation", ""),
        ("曖昧", "vague", ""),
        ("顕著", "remarkable", ""),
        ("趣旨", "gist", ""),
        ("抹消", "erasure", ""),
        ("妥協", "compromise", ""),
        ("一概に", "unconditionally", ""),
        ("著しい", "striking", ""),
        ("促す", "to urge", "動詞"),
        ("察する", "to sense", ""),
        ("甚だしい", "extreme", ""),
        ("予め", "beforehand", "副詞"),
        ("頻繁", "frequent", ""),
        ("依然として", "still", "副詞"),
        ("賄う", "to finance", "動詞"),
    ]
    .into_iter()
    .map(|(w, m, p)| VocabRecord::new(w, m, p))
    .collect()
}
