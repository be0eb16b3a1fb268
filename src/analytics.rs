// src/analytics.rs
//! Derived analytics over the currently filtered article set.
//!
//! Snapshots are recomputed wholesale on every change and never mutated in
//! place; same inputs, same snapshot.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::filter::day_start;
use crate::ingest::types::{Article, Taxonomies};

/// Rendered for the top-category / top-country KPI when the filtered set has
/// no such terms at all.
pub const NO_DATA: &str = "N/A";

/// Display-name fallback for term ids the taxonomy snapshot doesn't know.
const UNKNOWN: &str = "Unknown";

/// How many countries the horizontal bar chart shows.
const CHART_COUNTRIES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub id: u32,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// Month label, e.g. "Aug 2026".
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSnapshot {
    pub total_articles: usize,
    /// Articles published since the first day of the current calendar month.
    pub articles_this_month: usize,
    pub top_category: String,
    pub top_category_count: usize,
    pub top_tag: String,
    pub top_tag_count: usize,
    pub top_country: String,
    pub top_country_count: usize,
    /// Every category seen in the filtered set, count-descending.
    pub category_counts: Vec<TermCount>,
    /// Top countries by count, resolved to display names.
    pub countries_chart: Vec<TermCount>,
    /// Exactly 12 calendar-month buckets, ascending, current month last.
    pub timeline: Vec<MonthBucket>,
}

/// Multi-membership term counter. Iteration order is first-occurrence order,
/// which is what makes the top-entry tie-break deterministic: on equal
/// counts, the term first seen while scanning the filtered list wins.
#[derive(Default)]
struct TermCounter {
    order: Vec<u32>,
    counts: HashMap<u32, usize>,
}

impl TermCounter {
    fn add(&mut self, id: u32) {
        let slot = self.counts.entry(id).or_insert(0);
        if *slot == 0 {
            self.order.push(id);
        }
        *slot += 1;
    }

    fn top(&self) -> Option<(u32, usize)> {
        let mut best: Option<(u32, usize)> = None;
        for &id in &self.order {
            let count = self.counts[&id];
            if best.map_or(true, |(_, b)| count > b) {
                best = Some((id, count));
            }
        }
        best
    }

    /// All terms, count-descending; equal counts stay in first-seen order
    /// (stable sort).
    fn ranked(&self) -> Vec<(u32, usize)> {
        let mut all: Vec<(u32, usize)> = self.order.iter().map(|&id| (id, self.counts[&id])).collect();
        all.sort_by(|a, b| b.1.cmp(&a.1));
        all
    }
}

pub fn compute_analytics(
    items: &[Article],
    taxonomies: &Taxonomies,
    now: NaiveDateTime,
) -> AnalyticsSnapshot {
    let mut categories = TermCounter::default();
    let mut tags = TermCounter::default();
    let mut countries = TermCounter::default();

    for a in items {
        for &c in &a.categories {
            categories.add(c);
        }
        for &t in &a.tags {
            tags.add(t);
        }
        for &c in &a.countries {
            countries.add(c);
        }
    }

    let month_open = day_start(month_start(now.date()));
    let articles_this_month = items.iter().filter(|a| a.published_at >= month_open).count();

    let (top_category, top_category_count) =
        top_entry(&categories, |id| taxonomies.category_name(id));
    let (top_tag, top_tag_count) = top_entry(&tags, |id| taxonomies.tag_name(id));
    let (top_country, top_country_count) =
        top_entry(&countries, |id| taxonomies.country_name(id));

    let category_counts = categories
        .ranked()
        .into_iter()
        .map(|(id, count)| TermCount {
            id,
            name: display_name(taxonomies.category_name(id)),
            count,
        })
        .collect();

    let countries_chart = countries
        .ranked()
        .into_iter()
        .take(CHART_COUNTRIES)
        .map(|(id, count)| TermCount {
            id,
            name: display_name(taxonomies.country_name(id)),
            count,
        })
        .collect();

    AnalyticsSnapshot {
        total_articles: items.len(),
        articles_this_month,
        top_category,
        top_category_count,
        top_tag,
        top_tag_count,
        top_country,
        top_country_count,
        category_counts,
        countries_chart,
        timeline: timeline(items, now),
    }
}

fn top_entry<'a>(
    counter: &TermCounter,
    name_of: impl Fn(u32) -> Option<&'a str>,
) -> (String, usize) {
    match counter.top() {
        Some((id, count)) => (display_name(name_of(id)), count),
        None => (NO_DATA.to_string(), 0),
    }
}

fn display_name(name: Option<&str>) -> String {
    name.unwrap_or(UNKNOWN).to_string()
}

/// Twelve calendar-month buckets ascending from 11 months ago to the current
/// month. Empty months are emitted with count 0 so the series length is
/// fixed for charting.
fn timeline(items: &[Article], now: NaiveDateTime) -> Vec<MonthBucket> {
    let current = month_start(now.date());
    let mut buckets = Vec::with_capacity(12);

    for back in (0..12u32).rev() {
        let open = current
            .checked_sub_months(Months::new(back))
            .expect("month arithmetic");
        let close = open
            .checked_add_months(Months::new(1))
            .expect("month arithmetic");
        let count = items
            .iter()
            .filter(|a| a.published_at >= day_start(open) && a.published_at < day_start(close))
            .count();
        buckets.push(MonthBucket {
            month: open.format("%b %Y").to_string(),
            count,
        });
    }
    buckets
}

fn month_start(d: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(d.year(), d.month(), 1).expect("first of month")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tie_break_prefers_first_seen_term() {
        let mut c = TermCounter::default();
        c.add(9);
        c.add(4);
        c.add(4);
        c.add(9);
        assert_eq!(c.top(), Some((9, 2)));
    }

    #[test]
    fn ranked_is_count_descending() {
        let mut c = TermCounter::default();
        c.add(1);
        c.add(2);
        c.add(2);
        assert_eq!(c.ranked(), vec![(2, 2), (1, 1)]);
    }
}
