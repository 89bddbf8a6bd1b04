//! Vocabulary source adapters
//!
//! Each adapter wraps one public word list and maps its native format
//! (paginated JSON API, JSON array file, CSV file) onto [`VocabRecord`].
//! Field names differ between providers, so every adapter carries a
//! declarative mapping table ([`FieldMap`] for JSON, [`CsvColumns`] for CSV)
//! listing candidate fields in priority order; the first non-empty one wins.
//!
//! # Failure isolation
//!
//! Adapters report problems from [`VocabSource::try_fetch`]. Callers use
//! [`VocabSource::fetch`], which logs the error and yields an empty list,
//! so one broken provider never blocks the others.
//!
//! # Example
//!
//! ```ignore
//! use n1_quiz::sources::{HttpFetcher, VocabSource, default_sources};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http = HttpFetcher::new(std::time::Duration::from_secs(10))?;
//!     for source in default_sources(&http) {
//!         let records = source.fetch().await;
//!         println!("{}: {} words", source.name(), records.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod csv_source;
pub mod error;
pub mod http;
pub mod json_array;
pub mod mock;
pub mod paged;
pub mod providers;

#[cfg(test)]
pub(crate) mod test_server;

pub use csv_source::CsvSource;
pub use error::{SourceError, SourceResult};
pub use http::HttpFetcher;
pub use json_array::JsonArraySource;
pub use mock::{MockMode, MockSource, sample_records};
pub use paged::PagedJsonSource;
pub use providers::default_sources;

use crate::model::VocabRecord;
use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

/// A provider of vocabulary records
#[async_trait]
pub trait VocabSource: Send + Sync {
    /// Short provider name used in logs and reports
    fn name(&self) -> &str;

    /// Fetch and map every record, reporting failures
    async fn try_fetch(&self) -> SourceResult<Vec<VocabRecord>>;

    /// Like [`VocabSource::try_fetch`], but a source fetching in several
    /// requests stops at `deadline` and returns what it collected so far
    ///
    /// Single-request sources ignore the deadline; the aggregator bounds them.
    async fn try_fetch_until(&self, deadline: Instant) -> SourceResult<Vec<VocabRecord>> {
        let _ = deadline;
        self.try_fetch().await
    }

    /// Fetch every record; failures are logged and yield an empty list
    async fn fetch(&self) -> Vec<VocabRecord> {
        settle(self.name(), self.try_fetch().await)
    }

    /// [`VocabSource::fetch`] with a deadline for multi-request sources
    async fn fetch_until(&self, deadline: Instant) -> Vec<VocabRecord> {
        settle(self.name(), self.try_fetch_until(deadline).await)
    }
}

fn settle(name: &str, result: SourceResult<Vec<VocabRecord>>) -> Vec<VocabRecord> {
    match result {
        Ok(records) => {
            tracing::debug!(source = name, count = records.len(), "source fetched");
            records
        }
        Err(err) => {
            tracing::warn!(source = name, error = %err, "source fetch failed");
            Vec::new()
        }
    }
}

/// Candidate JSON keys for each record field, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    pub word: &'static [&'static str],
    pub meaning: &'static [&'static str],
    pub pos: &'static [&'static str],
}

impl FieldMap {
    /// Map one JSON object; non-objects map to `None`
    pub fn map_object(&self, value: &Value) -> Option<VocabRecord> {
        let object = value.as_object()?;
        let pick = |keys: &[&str]| {
            keys.iter()
                .map(|key| object.get(*key).map(json_to_text).unwrap_or_default())
                .find(|text| !text.trim().is_empty())
                .unwrap_or_default()
        };

        Some(VocabRecord {
            word: pick(self.word),
            meaning: pick(self.meaning),
            part_of_speech: pick(self.pos),
        })
    }

    /// Map every object of a JSON array, keeping records with a word and a meaning
    pub fn map_array(&self, items: &[Value]) -> Vec<VocabRecord> {
        items
            .iter()
            .filter_map(|item| self.map_object(item))
            .filter(has_content)
            .collect()
    }
}

/// Candidate column indices for each record field, plus a header marker
///
/// Rows whose word column equals `header_marker` are skipped, which drops
/// header lines wherever they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumns {
    pub word: &'static [usize],
    pub meaning: &'static [usize],
    pub pos: &'static [usize],
    pub header_marker: Option<&'static str>,
}

impl CsvColumns {
    pub fn map_row(&self, row: &csv::StringRecord) -> Option<VocabRecord> {
        let pick = |columns: &[usize]| {
            columns
                .iter()
                .filter_map(|&i| row.get(i))
                .map(str::trim)
                .find(|cell| !cell.is_empty())
                .unwrap_or_default()
                .to_string()
        };

        let record = VocabRecord {
            word: pick(self.word),
            meaning: pick(self.meaning),
            part_of_speech: pick(self.pos),
        };

        if self.header_marker == Some(record.word.as_str()) {
            return None;
        }
        has_content(&record).then_some(record)
    }
}

/// Render a JSON value as text: arrays are joined with commas,
/// objects and null become empty
pub fn json_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(json_to_text).collect::<Vec<_>>().join(","),
        Value::Null | Value::Object(_) => String::new(),
    }
}

fn has_content(record: &VocabRecord) -> bool {
    !record.word.trim().is_empty() && !record.meaning.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MAP: FieldMap = FieldMap {
        word: &["word", "expression", "kanji"],
        meaning: &["meaning", "meanings", "translation"],
        pos: &["pos", "partOfSpeech"],
    };

    #[test]
    fn test_first_candidate_wins() {
        let r = MAP
            .map_object(&json!({"word": "綿密", "expression": "別", "meaning": "meticulous"}))
            .unwrap();
        assert_eq!(r.word, "綿密");
        assert_eq!(r.meaning, "meticulous");
        assert_eq!(r.part_of_speech, "");
    }

    #[test]
    fn test_empty_candidate_falls_through() {
        let r = MAP
            .map_object(&json!({"word": "", "expression": "  ", "kanji": "斡旋", "translation": "mediation"}))
            .unwrap();
        assert_eq!(r.word, "斡旋");
        assert_eq!(r.meaning, "mediation");
    }

    #[test]
    fn test_array_meanings_are_joined() {
        let r = MAP
            .map_object(&json!({"word": "顕著", "meanings": ["remarkable", "striking"], "partOfSpeech": "na-adj"}))
            .unwrap();
        assert_eq!(r.meaning, "remarkable,striking");
        assert_eq!(r.part_of_speech, "na-adj");
    }

    #[test]
    fn test_non_object_is_skipped() {
        assert!(MAP.map_object(&json!("綿密")).is_none());
        assert!(MAP.map_object(&json!(null)).is_none());
    }

    #[test]
    fn test_map_array_drops_incomplete() {
        let items = vec![
            json!({"word": "綿密", "meaning": "meticulous"}),
            json!({"word": "曖昧"}),
            json!({"meaning": "orphan"}),
            json!(42),
        ];
        let out = MAP.map_array(&items);
        assert_eq!(out, vec![VocabRecord::new("綿密", "meticulous", "")]);
    }

    #[test]
    fn test_json_to_text() {
        assert_eq!(json_to_text(&json!("a")), "a");
        assert_eq!(json_to_text(&json!(3)), "3");
        assert_eq!(json_to_text(&json!(true)), "true");
        assert_eq!(json_to_text(&json!(["a", ["b", "c"], null])), "a,b,c,");
        assert_eq!(json_to_text(&json!({"k": "v"})), "");
        assert_eq!(json_to_text(&json!(null)), "");
    }

    #[test]
    fn test_csv_columns_fallback_and_header() {
        let cols = CsvColumns {
            word: &[0],
            meaning: &[2, 3],
            pos: &[3],
            header_marker: Some("expression"),
        };

        let header = csv::StringRecord::from(vec!["expression", "reading", "meaning", "tags"]);
        assert!(cols.map_row(&header).is_none());

        let row = csv::StringRecord::from(vec!["綿密", "めんみつ", "", "meticulous"]);
        let r = cols.map_row(&row).unwrap();
        assert_eq!(r.meaning, "meticulous");
        assert_eq!(r.part_of_speech, "meticulous");

        let short = csv::StringRecord::from(vec!["曖昧"]);
        assert!(cols.map_row(&short).is_none());
    }
}
