// src/filter.rs
//! Pure predicate filtering over the canonical article list.
//!
//! Every filter change re-evaluates the whole list; at a few thousand
//! articles there is nothing worth memoizing.

use chrono::{Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::ingest::types::Article;

/// Named date windows offered by the UI, all ending at today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DatePreset {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    Year,
}

/// Either a single taxonomy term or no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermSelection {
    #[default]
    All,
    Term(u32),
}

impl TermSelection {
    pub fn from_option(id: Option<u32>) -> Self {
        match id {
            Some(id) => TermSelection::Term(id),
            None => TermSelection::All,
        }
    }

    /// Membership test against an article's term-key list. A missing or
    /// empty list never matches a concrete term.
    pub fn matches(&self, keys: &[u32]) -> bool {
        match self {
            TermSelection::All => true,
            TermSelection::Term(id) => keys.contains(id),
        }
    }
}

/// Date constraint: a preset or explicit day bounds. Explicit bounds always
/// win; the transitions in [`crate::session::Session`] keep the two mutually
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateFilter {
    pub preset: DatePreset,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateFilter {
    /// Resolve to an inclusive datetime window, `None` meaning unbounded on
    /// that side. Explicit bounds cover whole local days (00:00:00.000 to
    /// 23:59:59.999); presets resolve to [today - span, end of today].
    pub fn window(&self, today: NaiveDate) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
        if self.start.is_some() || self.end.is_some() {
            return (self.start.map(day_start), self.end.map(day_end));
        }

        let from = match self.preset {
            DatePreset::All => return (None, None),
            DatePreset::Week => today.checked_sub_days(Days::new(7)),
            DatePreset::Month => today.checked_sub_days(Days::new(30)),
            DatePreset::ThreeMonths => today.checked_sub_months(Months::new(3)),
            DatePreset::SixMonths => today.checked_sub_months(Months::new(6)),
            DatePreset::Year => today.checked_sub_months(Months::new(12)),
        };
        (from.map(day_start), Some(day_end(today)))
    }
}

pub(crate) fn day_start(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

fn day_end(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_milli_opt(23, 59, 59, 999).expect("valid end of day")
}

/// The full filter state a browsing session carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Case-insensitive substring match against the plain-text title.
    pub search: String,
    pub category: TermSelection,
    pub tag: TermSelection,
    pub country: TermSelection,
    pub date: DateFilter,
}

impl FilterState {
    /// True when any filter deviates from the default ("all") state.
    pub fn is_active(&self) -> bool {
        *self != FilterState::default()
    }
}

/// Apply every active filter, ANDed. Pure: same `(items, filters, today)`
/// always yields the same output.
pub fn apply_filters(items: &[Article], filters: &FilterState, today: NaiveDate) -> Vec<Article> {
    let needle = filters.search.to_lowercase();
    let (lo, hi) = filters.date.window(today);

    items
        .iter()
        .filter(|a| {
            (needle.is_empty() || a.title.to_lowercase().contains(&needle))
                && filters.category.matches(&a.categories)
                && filters.tag.matches(&a.tags)
                && filters.country.matches(&a.countries)
                && lo.is_none_or(|lo| a.published_at >= lo)
                && hi.is_none_or(|hi| a.published_at <= hi)
        })
        .cloned()
        .collect()
}
