// src/ingest/client.rs
use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::ingest::types::{Article, ArticleSource, PageFetch, RawPost};

/// One WordPress-style list endpoint, e.g. `<base>/posts`.
///
/// No retries, no backoff: a page either arrives or the source reports what
/// went wrong and the caller moves on.
pub struct WpListSource {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl WpListSource {
    pub fn new(client: reqwest::Client, name: &str, url: String) -> Self {
        Self {
            name: name.to_string(),
            url,
            client,
        }
    }
}

#[async_trait]
impl ArticleSource for WpListSource {
    async fn fetch_page(&self, page: u32, per_page: u32) -> PageFetch {
        let t0 = std::time::Instant::now();
        let url = format!("{}?per_page={}&page={}", self.url, per_page, page);

        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                counter!("fetch_errors_total").increment(1);
                return PageFetch::Failed(format!("request: {e}"));
            }
        };

        // WordPress answers a page past the end with 400 rest_post_invalid_page_number.
        if !resp.status().is_success() {
            counter!("fetch_errors_total").increment(1);
            return PageFetch::Failed(format!("status {}", resp.status()));
        }

        let raw: Vec<RawPost> = match resp.json().await {
            Ok(raw) => raw,
            Err(e) => {
                counter!("fetch_errors_total").increment(1);
                return PageFetch::Failed(format!("decode: {e}"));
            }
        };

        histogram!("fetch_page_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("fetch_pages_total").increment(1);

        if raw.is_empty() {
            return PageFetch::End;
        }
        PageFetch::Page(
            raw.into_iter()
                .map(|r| Article::from_raw(r, &self.name))
                .collect(),
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Deserialize)]
struct Term {
    id: u32,
    name: String,
}

/// Fetch one taxonomy snapshot (`[{id, name}, …]`) into an id → name map.
/// Unlike list pages this is a bootstrap requirement, so failures are errors.
pub async fn fetch_terms(client: &reqwest::Client, url: &str) -> Result<HashMap<u32, String>> {
    let resp = client
        .get(format!("{url}?per_page=100"))
        .send()
        .await
        .with_context(|| format!("requesting taxonomy {url}"))?;

    if !resp.status().is_success() {
        bail!("taxonomy {} returned {}", url, resp.status());
    }

    let terms: Vec<Term> = resp
        .json()
        .await
        .with_context(|| format!("decoding taxonomy {url}"))?;

    Ok(terms.into_iter().map(|t| (t.id, t.name)).collect())
}
