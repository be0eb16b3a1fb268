use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::analytics::{compute_analytics, AnalyticsSnapshot};
use crate::filter::{apply_filters, DateFilter, DatePreset, FilterState, TermSelection};
use crate::ingest::types::{Article, Taxonomies};
use crate::paginate::{clamp_page, page_slice, total_pages};
use crate::store::{ArticleStore, StoreStatus};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArticleStore>,
    pub items_per_page: usize,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/articles", get(list_articles))
        .route("/analytics", get(analytics))
        .route("/taxonomies", get(taxonomies))
        .route("/status", get(status))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Filter + pagination query parameters. Absent term params mean "all";
/// explicit `start`/`end` dates beat `preset`.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    search: String,
    category: Option<u32>,
    tag: Option<u32>,
    country: Option<u32>,
    preset: Option<DatePreset>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    page: Option<u32>,
    per_page: Option<usize>,
}

impl FilterQuery {
    fn filter_state(&self) -> FilterState {
        FilterState {
            search: self.search.clone(),
            category: TermSelection::from_option(self.category),
            tag: TermSelection::from_option(self.tag),
            country: TermSelection::from_option(self.country),
            date: DateFilter {
                preset: self.preset.unwrap_or_default(),
                start: self.start,
                end: self.end,
            },
        }
    }
}

#[derive(serde::Serialize)]
struct ArticlePage {
    total: usize,
    total_pages: u32,
    page: u32,
    per_page: usize,
    articles: Vec<Article>,
}

async fn list_articles(
    State(state): State<AppState>,
    Query(q): Query<FilterQuery>,
) -> Json<ArticlePage> {
    let articles = state.store.articles();
    let filtered = apply_filters(&articles, &q.filter_state(), local_now().date());

    let per_page = q.per_page.unwrap_or(state.items_per_page).clamp(1, 100);
    let pages = total_pages(filtered.len(), per_page);
    let page = clamp_page(q.page.unwrap_or(1), pages);

    Json(ArticlePage {
        total: filtered.len(),
        total_pages: pages,
        page,
        per_page,
        articles: page_slice(&filtered, page, per_page).to_vec(),
    })
}

async fn analytics(
    State(state): State<AppState>,
    Query(q): Query<FilterQuery>,
) -> Json<AnalyticsSnapshot> {
    let now = local_now();
    let articles = state.store.articles();
    let filtered = apply_filters(&articles, &q.filter_state(), now.date());
    Json(compute_analytics(&filtered, &state.store.taxonomies(), now))
}

async fn taxonomies(State(state): State<AppState>) -> Json<Taxonomies> {
    Json(state.store.taxonomies())
}

async fn status(State(state): State<AppState>) -> Json<StoreStatus> {
    Json(state.store.status())
}

/// Evaluation-time "now" for date presets and analytics, in server-local
/// time to match the naive site-local article timestamps.
fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
