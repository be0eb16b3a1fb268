// src/ingest/types.rs
use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wire shape of a WordPress-style list item. Only the fields the directory
/// consumes; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    pub id: u64,
    pub date: Option<String>,
    pub title: Option<Rendered>,
    pub excerpt: Option<Rendered>,
    #[serde(default)]
    pub categories: Vec<u32>,
    #[serde(default)]
    pub tags: Vec<u32>,
    #[serde(default)]
    pub country: Vec<u32>,
    pub link: Option<String>,
}

/// WordPress wraps rich-text fields in `{ "rendered": "<html>" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Rendered {
    pub rendered: String,
}

/// A canonical article after normalization. Identity key is `id`; the list
/// owned by the store never contains two articles with the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: u64,
    pub published_at: NaiveDateTime,
    /// Plain-text title (entities decoded, tags stripped).
    pub title: String,
    /// Plain-text excerpt.
    pub excerpt: String,
    pub categories: Vec<u32>,
    pub tags: Vec<u32>,
    pub countries: Vec<u32>,
    pub link: String,
    /// Endpoint the article came from, e.g. "posts".
    pub source: String,
}

impl Article {
    pub fn from_raw(raw: RawPost, source: &str) -> Self {
        Article {
            id: raw.id,
            published_at: raw.date.as_deref().map(parse_wp_date).unwrap_or_default(),
            title: crate::ingest::plain_text(
                raw.title
                    .as_ref()
                    .map(|r| r.rendered.as_str())
                    .unwrap_or_default(),
            ),
            excerpt: crate::ingest::plain_text(
                raw.excerpt
                    .as_ref()
                    .map(|r| r.rendered.as_str())
                    .unwrap_or_default(),
            ),
            categories: raw.categories,
            tags: raw.tags,
            countries: raw.country,
            link: raw.link.unwrap_or_default(),
            source: source.to_string(),
        }
    }
}

/// WordPress `date` is a naive site-local datetime (`2024-01-15T10:30:00`);
/// some backends emit a full RFC 3339 offset instead. Unparseable dates fall
/// back to the Unix epoch so a broken item sorts last instead of poisoning
/// the merge.
pub fn parse_wp_date(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(s).map(|dt| dt.naive_utc()))
        .unwrap_or_default()
}

/// Outcome of fetching one page from one endpoint.
///
/// `End` (empty page) and `Failed` both stop a source's pagination, but the
/// distinction is kept at the type level: callers decide whether a failure is
/// fatal (bootstrap) or merely drains the source (background fan-out).
#[derive(Debug)]
pub enum PageFetch {
    Page(Vec<Article>),
    End,
    Failed(String),
}

/// A paged list endpoint. `fetch_page` is the only suspension point in the
/// pipeline; `page` is 1-indexed.
#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_page(&self, page: u32, per_page: u32) -> PageFetch;
    fn name(&self) -> &str;
}

/// Id → display-name maps for the three taxonomies, fetched once per load and
/// immutable for the session. Lookups for absent ids simply return `None`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Taxonomies {
    pub categories: HashMap<u32, String>,
    pub tags: HashMap<u32, String>,
    pub countries: HashMap<u32, String>,
}

impl Taxonomies {
    pub fn category_name(&self, id: u32) -> Option<&str> {
        self.categories.get(&id).map(String::as_str)
    }

    pub fn tag_name(&self, id: u32) -> Option<&str> {
        self.tags.get(&id).map(String::as_str)
    }

    pub fn country_name(&self, id: u32) -> Option<&str> {
        self.countries.get(&id).map(String::as_str)
    }
}
