// src/ingest/aggregator.rs
//! Multi-endpoint fetch orchestration.
//!
//! Load order is tuned for time-to-first-paint: a small provisional page from
//! the primary endpoint first, then page 1 of every endpoint at full size,
//! then per-endpoint deep pagination. Each stage publishes a complete,
//! deduplicated, date-sorted replacement of the canonical list; stale
//! generations are rejected by the store, never merged.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::future::join_all;
use metrics::gauge;

use crate::ingest::merge_dedup_sort;
use crate::ingest::types::{Article, ArticleSource, PageFetch};
use crate::store::{ArticleStore, LoadPhase};

/// Page sizing and the deep-pagination ceiling.
#[derive(Clone, Copy, Debug)]
pub struct FetchPlan {
    /// Page size for the provisional first fetch (fast initial paint).
    pub first_paint_size: u32,
    /// Full page size for fan-out and deep pagination.
    pub page_size: u32,
    /// Highest page number fetched per endpoint, page 1 included.
    pub page_cap: u32,
}

pub struct Aggregator {
    sources: Vec<Arc<dyn ArticleSource>>,
    store: Arc<ArticleStore>,
    plan: FetchPlan,
}

impl Aggregator {
    pub fn new(
        sources: Vec<Arc<dyn ArticleSource>>,
        store: Arc<ArticleStore>,
        plan: FetchPlan,
    ) -> Self {
        Self {
            sources,
            store,
            plan,
        }
    }

    /// Stage 1: provisional page from the primary endpoint only. This is part
    /// of the bootstrap contract, so a failure here is fatal to the load.
    pub async fn bootstrap(&self, generation: u64) -> Result<()> {
        let primary = self.sources.first().context("no endpoints configured")?;

        match primary.fetch_page(1, self.plan.first_paint_size).await {
            PageFetch::Page(items) => {
                self.store
                    .publish(generation, LoadPhase::Provisional, merge_dedup_sort(vec![items]));
                Ok(())
            }
            PageFetch::End => {
                self.store
                    .publish(generation, LoadPhase::Provisional, Vec::new());
                Ok(())
            }
            PageFetch::Failed(reason) => {
                bail!("initial page from '{}' failed: {reason}", primary.name())
            }
        }
    }

    /// Stages 2 and 3: page-1 fan-out, then deep pagination. Best effort —
    /// a failing endpoint degrades to partial data, it never aborts the load.
    pub async fn run(&self, generation: u64) {
        // Stage 2: page 1 from every endpoint (primary included) at full size.
        let first_pages: Vec<Vec<Article>> = join_all(
            self.sources
                .iter()
                .map(|src| fetch_page_or_empty(src.as_ref(), 1, self.plan.page_size)),
        )
        .await;

        if !self.store.publish(
            generation,
            LoadPhase::FirstPages,
            merge_dedup_sort(first_pages.clone()),
        ) {
            tracing::info!(target: "ingest", generation, "superseded before fan-out publish");
            return;
        }

        // Stage 3: endpoints progress independently; within one endpoint,
        // pages are fetched strictly in order.
        let deep_pages: Vec<Vec<Article>> = join_all(
            self.sources
                .iter()
                .map(|src| self.drain_source(src.as_ref())),
        )
        .await;

        let mut batches = first_pages;
        batches.extend(deep_pages);
        let full = merge_dedup_sort(batches);
        let total = full.len();

        if self.store.publish(generation, LoadPhase::Complete, full) {
            gauge!("pipeline_last_publish_ts")
                .set(chrono::Utc::now().timestamp().max(0) as f64);
            tracing::info!(
                target: "ingest",
                generation,
                articles = total,
                endpoints = self.sources.len(),
                "canonical list complete"
            );
        } else {
            tracing::info!(target: "ingest", generation, "superseded before final publish");
        }
    }

    /// Fetch pages 2..=cap from one endpoint until it runs dry. A transport
    /// failure drains the source: logged and counted, but partial data from
    /// the pages that did arrive is kept.
    async fn drain_source(&self, src: &dyn ArticleSource) -> Vec<Article> {
        let mut out = Vec::new();
        for page in 2..=self.plan.page_cap {
            match src.fetch_page(page, self.plan.page_size).await {
                PageFetch::Page(mut items) => out.append(&mut items),
                PageFetch::End => break,
                PageFetch::Failed(reason) => {
                    tracing::warn!(
                        target: "ingest",
                        source = src.name(),
                        page,
                        %reason,
                        "deep page fetch failed; source treated as drained"
                    );
                    break;
                }
            }
        }
        out
    }
}

async fn fetch_page_or_empty(src: &dyn ArticleSource, page: u32, per_page: u32) -> Vec<Article> {
    match src.fetch_page(page, per_page).await {
        PageFetch::Page(items) => items,
        PageFetch::End => Vec::new(),
        PageFetch::Failed(reason) => {
            tracing::warn!(
                target: "ingest",
                source = src.name(),
                page,
                %reason,
                "page-1 fan-out fetch failed; endpoint contributes nothing"
            );
            Vec::new()
        }
    }
}
