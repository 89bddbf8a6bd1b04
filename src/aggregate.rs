//! Concurrent fetch of every source
//!
//! All sources are polled at once and the aggregator waits until each has
//! finished, failed or hit its deadline. Results are concatenated in the
//! order the sources were given, which later decides which duplicate wins.
//! Paginated sources see the deadline and stop paging at it, keeping the
//! pages they already have; others are cut off shortly after it.

use crate::model::VocabRecord;
use crate::sources::VocabSource;
use futures::future::join_all;
use std::time::Duration;
use tokio::time::Instant;

/// Time a multi-request source gets past the deadline to hand back its partial result
const DEADLINE_GRACE: Duration = Duration::from_millis(250);

/// How many records each source contributed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCount {
    pub name: String,
    pub records: usize,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateReport {
    pub per_source: Vec<SourceCount>,
    pub records: Vec<VocabRecord>,
}

impl AggregateReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    deadline: Duration,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl Aggregator {
    /// `deadline` bounds each source's whole fetch, pagination included
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    /// Fetch every source concurrently and concatenate in source order
    pub async fn run_all(&self, sources: &[Box<dyn VocabSource>]) -> Vec<VocabRecord> {
        self.run_all_with_report(sources).await.records
    }

    pub async fn run_all_with_report(&self, sources: &[Box<dyn VocabSource>]) -> AggregateReport {
        let deadline = Instant::now() + self.deadline;
        let fetches = sources.iter().map(|source| async move {
            match tokio::time::timeout_at(deadline + DEADLINE_GRACE, source.fetch_until(deadline)).await {
                Ok(records) => (records, false),
                Err(_) => {
                    tracing::warn!(
                        source = source.name(),
                        deadline_ms = self.deadline.as_millis() as u64,
                        "source exceeded deadline"
                    );
                    (Vec::new(), true)
                }
            }
        });

        let results = join_all(fetches).await;

        let mut report = AggregateReport::default();
        for (source, (records, timed_out)) in sources.iter().zip(results) {
            report.per_source.push(SourceCount {
                name: source.name().to_string(),
                records: records.len(),
                timed_out,
            });
            report.records.extend(records);
        }

        tracing::info!(
            sources = sources.len(),
            records = report.records.len(),
            "aggregation finished"
        );
        report
    }
}
