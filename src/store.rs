//! In-memory canonical article store.
//!
//! The fetch pipeline is the only writer; everything downstream reads
//! snapshots. Each publish replaces the list wholesale — readers never see a
//! partially updated state. A generation counter fences out publishes from a
//! superseded load so a slow fetch can't clobber newer data.

use std::sync::RwLock;

use metrics::gauge;
use serde::Serialize;

use crate::ingest::types::{Article, Taxonomies};

/// How far the incremental load has progressed. Mirrors the UI's
/// skeleton / "loading more" / done states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    Empty,
    /// Small first page from the primary endpoint only.
    Provisional,
    /// Page 1 of every endpoint merged.
    FirstPages,
    /// All endpoints exhausted or capped; the list is frozen.
    Complete,
}

#[derive(Debug)]
struct Inner {
    articles: Vec<Article>,
    taxonomies: Taxonomies,
    phase: LoadPhase,
    generation: u64,
}

#[derive(Debug)]
pub struct ArticleStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub phase: LoadPhase,
    pub articles: usize,
    pub generation: u64,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                articles: Vec::new(),
                taxonomies: Taxonomies::default(),
                phase: LoadPhase::Empty,
                generation: 0,
            }),
        }
    }

    /// Start a new load. Any publisher still holding an older generation is
    /// fenced out from this point on.
    pub fn begin_generation(&self) -> u64 {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.generation += 1;
        inner.generation
    }

    /// Replace the canonical list. Returns false (and changes nothing) when
    /// the publisher's generation has been superseded.
    pub fn publish(&self, generation: u64, phase: LoadPhase, articles: Vec<Article>) -> bool {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if generation != inner.generation {
            return false;
        }
        gauge!("store_articles").set(articles.len() as f64);
        inner.articles = articles;
        inner.phase = phase;
        true
    }

    /// Install the session's taxonomy snapshot. Same generation fencing as
    /// `publish`.
    pub fn set_taxonomies(&self, generation: u64, taxonomies: Taxonomies) -> bool {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if generation != inner.generation {
            return false;
        }
        inner.taxonomies = taxonomies;
        true
    }

    pub fn articles(&self) -> Vec<Article> {
        self.inner.read().expect("store lock poisoned").articles.clone()
    }

    pub fn taxonomies(&self) -> Taxonomies {
        self.inner
            .read()
            .expect("store lock poisoned")
            .taxonomies
            .clone()
    }

    pub fn status(&self) -> StoreStatus {
        let inner = self.inner.read().expect("store lock poisoned");
        StoreStatus {
            phase: inner.phase,
            articles: inner.articles.len(),
            generation: inner.generation,
        }
    }
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_generation_publish_is_rejected() {
        let store = ArticleStore::new();
        let old = store.begin_generation();
        let new = store.begin_generation();

        assert!(!store.publish(old, LoadPhase::Complete, Vec::new()));
        assert!(store.publish(new, LoadPhase::Provisional, Vec::new()));
        assert_eq!(store.status().phase, LoadPhase::Provisional);
    }

    #[test]
    fn starts_empty() {
        let store = ArticleStore::new();
        assert_eq!(store.status().phase, LoadPhase::Empty);
        assert!(store.articles().is_empty());
    }
}
