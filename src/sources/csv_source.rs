//! Adapter for word lists published as CSV

use crate::model::VocabRecord;
use crate::sources::error::SourceResult;
use crate::sources::http::HttpFetcher;
use crate::sources::{CsvColumns, VocabSource};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct CsvSource {
    name: String,
    url: String,
    columns: CsvColumns,
    http: HttpFetcher,
}

impl CsvSource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        columns: CsvColumns,
        http: HttpFetcher,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            columns,
            http,
        }
    }

    /// Map CSV text; unreadable rows are skipped
    pub fn parse(&self, text: &str) -> Vec<VocabRecord> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut out = Vec::new();
        let mut skipped = 0usize;
        for row in reader.records() {
            match row {
                Ok(row) => out.extend(self.columns.map_row(&row)),
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(source = %self.name, skipped, "skipped unreadable CSV rows");
        }
        out
    }
}

#[async_trait]
impl VocabSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_fetch(&self) -> SourceResult<Vec<VocabRecord>> {
        let text = self.http.get_text(&self.url).await?;
        Ok(self.parse(&text))
    }
}
