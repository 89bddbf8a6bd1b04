//! Adapter for paginated JSON APIs (`?offset=&limit=` with a nested item array)

use crate::model::VocabRecord;
use crate::sources::error::{SourceError, SourceResult};
use crate::sources::http::HttpFetcher;
use crate::sources::{FieldMap, VocabSource};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Fetches `base_url` page by page until a short or empty page, or `max_pages`
///
/// A failure after the first page keeps the records already collected.
#[derive(Debug, Clone)]
pub struct PagedJsonSource {
    name: String,
    base_url: String,
    items_key: String,
    fields: FieldMap,
    page_size: usize,
    max_pages: usize,
    page_delay: Duration,
    http: HttpFetcher,
}

impl PagedJsonSource {
    pub const DEFAULT_PAGE_SIZE: usize = 500;
    pub const DEFAULT_MAX_PAGES: usize = 8;
    pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(100);

    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        items_key: impl Into<String>,
        fields: FieldMap,
        http: HttpFetcher,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            items_key: items_key.into(),
            fields,
            page_size: Self::DEFAULT_PAGE_SIZE,
            max_pages: Self::DEFAULT_MAX_PAGES,
            page_delay: Self::DEFAULT_PAGE_DELAY,
            http,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    fn page_url(&self, offset: usize) -> String {
        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}offset={}&limit={}",
            self.base_url, sep, offset, self.page_size
        )
    }
}

#[async_trait]
impl VocabSource for PagedJsonSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_fetch(&self) -> SourceResult<Vec<VocabRecord>> {
        self.fetch_pages(None).await
    }

    async fn try_fetch_until(&self, deadline: Instant) -> SourceResult<Vec<VocabRecord>> {
        self.fetch_pages(Some(deadline)).await
    }
}

impl PagedJsonSource {
    /// Page through the API; hitting `deadline` counts as a page failure
    async fn fetch_pages(&self, deadline: Option<Instant>) -> SourceResult<Vec<VocabRecord>> {
        let mut out = Vec::new();

        for page in 0..self.max_pages {
            let url = self.page_url(page * self.page_size);

            let fetched = match deadline {
                Some(at) => tokio::time::timeout_at(at, self.http.get_json(&url))
                    .await
                    .unwrap_or_else(|_| {
                        Err(SourceError::Timeout(format!(
                            "deadline reached while fetching {}",
                            url
                        )))
                    }),
                None => self.http.get_json(&url).await,
            };

            let json = match fetched {
                Ok(json) => json,
                Err(err) if page == 0 => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        source = %self.name,
                        page,
                        kept = out.len(),
                        error = %err,
                        "page fetch failed, keeping earlier pages"
                    );
                    break;
                }
            };

            let Some(items) = json.get(&self.items_key).and_then(|v| v.as_array()) else {
                if page == 0 {
                    return Err(SourceError::Parse(format!(
                        "missing '{}' array in response from {}",
                        self.items_key, url
                    )));
                }
                break;
            };
            if items.is_empty() {
                break;
            }

            out.extend(self.fields.map_array(items));
            tracing::debug!(source = %self.name, page, items = items.len(), "page fetched");

            if items.len() < self.page_size {
                break;
            }
            if page + 1 < self.max_pages && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        Ok(out)
    }
}
