// src/ingest/mod.rs
pub mod aggregator;
pub mod client;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::ingest::aggregator::Aggregator;
use crate::ingest::client::WpListSource;
use crate::ingest::types::{Article, ArticleSource, Taxonomies};
use crate::store::ArticleStore;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fetch_pages_total", "List pages fetched from endpoints.");
        describe_counter!(
            "fetch_errors_total",
            "Page fetches that failed (transport, status, or decode)."
        );
        describe_histogram!("fetch_page_ms", "Page fetch+decode time in milliseconds.");
        describe_gauge!("store_articles", "Articles in the published canonical list.");
        describe_gauge!(
            "pipeline_last_publish_ts",
            "Unix ts of the most recent canonical list publish."
        );
    });
}

/// Rich-text → plain-text: decode HTML entities, strip tags, collapse
/// whitespace. This is the only place the crate touches HTML.
pub fn plain_text(html: &str) -> String {
    let mut out = html_escape::decode_html_entities(html).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Merge per-source batches into the canonical list: dedup by article id,
/// then a stable sort by publication timestamp descending.
///
/// When the same id appears more than once in fan-out order, the last-seen
/// article wins; it keeps the first occurrence's slot, so equal-timestamp
/// ties still resolve to the same published order on every re-merge.
pub fn merge_dedup_sort(batches: Vec<Vec<Article>>) -> Vec<Article> {
    let mut slot_by_id: HashMap<u64, usize> = HashMap::new();
    let mut merged: Vec<Article> = Vec::new();

    for article in batches.into_iter().flatten() {
        match slot_by_id.get(&article.id) {
            Some(&slot) => merged[slot] = article,
            None => {
                slot_by_id.insert(article.id, merged.len());
                merged.push(article);
            }
        }
    }

    merged.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    merged
}

/// Boot the whole load for one generation:
/// 1. fetch the three taxonomy maps (fatal on failure),
/// 2. fetch the provisional first page from the primary endpoint (fatal),
/// 3. hand the rest (page-1 fan-out + deep pagination) to a background task.
///
/// Returns the handle of the background task once the provisional list is
/// published, i.e. once there is content to serve.
pub async fn start(cfg: &AppConfig, store: Arc<ArticleStore>) -> Result<JoinHandle<()>> {
    ensure_metrics_described();

    let http = reqwest::Client::new();
    let generation = store.begin_generation();

    let categories_url = cfg.taxonomy_url("categories");
    let tags_url = cfg.taxonomy_url("tags");
    let country_url = cfg.taxonomy_url("country");
    let (categories, tags, countries) = tokio::try_join!(
        client::fetch_terms(&http, &categories_url),
        client::fetch_terms(&http, &tags_url),
        client::fetch_terms(&http, &country_url),
    )
    .context("fetching taxonomy maps")?;

    store.set_taxonomies(
        generation,
        Taxonomies {
            categories,
            tags,
            countries,
        },
    );

    let sources: Vec<Arc<dyn ArticleSource>> = cfg
        .endpoints
        .iter()
        .map(|slug| {
            Arc::new(WpListSource::new(http.clone(), slug, cfg.list_url(slug)))
                as Arc<dyn ArticleSource>
        })
        .collect();

    let aggregator = Aggregator::new(sources, store, cfg.fetch_plan());
    aggregator.bootstrap(generation).await?;

    Ok(tokio::spawn(async move {
        aggregator.run(generation).await;
    }))
}
