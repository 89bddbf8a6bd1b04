//! Adapter for word lists published as one JSON array

use crate::model::VocabRecord;
use crate::sources::error::{SourceError, SourceResult};
use crate::sources::http::HttpFetcher;
use crate::sources::{FieldMap, VocabSource};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct JsonArraySource {
    name: String,
    url: String,
    fields: FieldMap,
    http: HttpFetcher,
}

impl JsonArraySource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        fields: FieldMap,
        http: HttpFetcher,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            fields,
            http,
        }
    }
}

#[async_trait]
impl VocabSource for JsonArraySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_fetch(&self) -> SourceResult<Vec<VocabRecord>> {
        let json = self.http.get_json(&self.url).await?;
        let items = json.as_array().ok_or_else(|| {
            SourceError::Parse(format!("expected a JSON array from {}", self.url))
        })?;
        Ok(self.fields.map_array(items))
    }
}
