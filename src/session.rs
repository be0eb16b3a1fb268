// src/session.rs
//! A single browsing session: filter state plus the visible page index, with
//! reducer-style transitions. Every filter transition resets the page to 1,
//! so a shrunken result set can never leave the user stranded past the end.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::analytics::{compute_analytics, AnalyticsSnapshot};
use crate::filter::{apply_filters, DateFilter, DatePreset, FilterState, TermSelection};
use crate::ingest::types::{Article, Taxonomies};
use crate::paginate::{clamp_page, page_slice, total_pages};

#[derive(Debug, Clone)]
pub struct Session {
    filters: FilterState,
    page: u32,
    per_page: usize,
}

/// Everything the presentation layer needs for one render, derived in one
/// pass from the canonical list and the session state.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryView {
    pub page: u32,
    pub total_pages: u32,
    pub total_matches: usize,
    pub articles: Vec<Article>,
    pub analytics: AnalyticsSnapshot,
}

impl Session {
    pub fn new(per_page: usize) -> Self {
        Self {
            filters: FilterState::default(),
            page: 1,
            per_page,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.is_active()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, selection: TermSelection) {
        self.filters.category = selection;
        self.page = 1;
    }

    pub fn set_tag(&mut self, selection: TermSelection) {
        self.filters.tag = selection;
        self.page = 1;
    }

    pub fn set_country(&mut self, selection: TermSelection) {
        self.filters.country = selection;
        self.page = 1;
    }

    /// Choosing a preset discards any explicit bounds.
    pub fn set_date_preset(&mut self, preset: DatePreset) {
        self.filters.date = DateFilter {
            preset,
            start: None,
            end: None,
        };
        self.page = 1;
    }

    /// Explicit bounds always win: setting either edge clears the preset.
    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.filters.date = DateFilter {
            preset: DatePreset::All,
            start,
            end,
        };
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
        self.page = 1;
    }

    /// Page moves don't touch filters and aren't clamped here; `view` clamps
    /// against whatever the filtered set currently allows.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn view(
        &self,
        articles: &[Article],
        taxonomies: &Taxonomies,
        now: NaiveDateTime,
    ) -> DirectoryView {
        let filtered = apply_filters(articles, &self.filters, now.date());
        let pages = total_pages(filtered.len(), self.per_page);
        let page = clamp_page(self.page, pages);
        let slice = page_slice(&filtered, page, self.per_page).to_vec();

        DirectoryView {
            page,
            total_pages: pages,
            total_matches: filtered.len(),
            articles: slice,
            analytics: compute_analytics(&filtered, taxonomies, now),
        }
    }
}
