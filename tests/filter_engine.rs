// tests/filter_engine.rs
use article_directory::ingest::types::parse_wp_date;
use article_directory::{apply_filters, Article, DateFilter, DatePreset, FilterState, TermSelection};
use chrono::NaiveDate;

fn art(id: u64, date: &str, title: &str) -> Article {
    Article {
        id,
        published_at: parse_wp_date(date),
        title: title.into(),
        excerpt: "ignored by search".into(),
        categories: vec![1, 2],
        tags: vec![7],
        countries: vec![],
        link: String::new(),
        source: "posts".into(),
    }
}

fn today() -> NaiveDate {
    "2024-06-15".parse().unwrap()
}

#[test]
fn explicit_range_keeps_only_items_inside_both_boundaries() {
    let items = vec![
        art(1, "2023-12-31T23:59:59", "before"),
        art(2, "2024-01-15T12:00:00", "inside"),
        art(3, "2024-02-01T00:00:00", "after"),
    ];
    let filters = FilterState {
        date: DateFilter {
            preset: DatePreset::All,
            start: Some("2024-01-01".parse().unwrap()),
            end: Some("2024-01-31".parse().unwrap()),
        },
        ..Default::default()
    };

    let out = apply_filters(&items, &filters, today());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, 2);
}

#[test]
fn range_boundaries_are_inclusive_of_whole_days() {
    let items = vec![
        art(1, "2024-01-01T00:00:00", "first instant"),
        art(2, "2024-01-31T23:59:59", "last second"),
    ];
    let filters = FilterState {
        date: DateFilter {
            preset: DatePreset::All,
            start: Some("2024-01-01".parse().unwrap()),
            end: Some("2024-01-31".parse().unwrap()),
        },
        ..Default::default()
    };
    assert_eq!(apply_filters(&items, &filters, today()).len(), 2);
}

#[test]
fn explicit_dates_win_over_a_preset() {
    // preset alone would exclude the January item from a June evaluation
    let items = vec![art(1, "2024-01-15T12:00:00", "january")];
    let filters = FilterState {
        date: DateFilter {
            preset: DatePreset::Week,
            start: Some("2024-01-01".parse().unwrap()),
            end: Some("2024-01-31".parse().unwrap()),
        },
        ..Default::default()
    };
    assert_eq!(apply_filters(&items, &filters, today()).len(), 1);
}

#[test]
fn preset_excludes_items_older_than_span_and_future_items() {
    let items = vec![
        art(1, "2024-06-10T12:00:00", "recent"),
        art(2, "2024-06-01T12:00:00", "too old for 7d"),
        art(3, "2024-07-01T12:00:00", "future-dated"),
    ];
    let filters = FilterState {
        date: DateFilter {
            preset: DatePreset::Week,
            ..Default::default()
        },
        ..Default::default()
    };
    let out = apply_filters(&items, &filters, today());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, 1);
}

#[test]
fn search_is_case_insensitive_and_title_only() {
    let items = vec![
        art(1, "2024-06-01T00:00:00", "Press Freedom Report"),
        art(2, "2024-06-01T00:00:00", "Election coverage"),
    ];
    let filters = FilterState {
        search: "FREEDOM".into(),
        ..Default::default()
    };
    let out = apply_filters(&items, &filters, today());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, 1);

    // excerpt content never matches
    let filters = FilterState {
        search: "ignored by search".into(),
        ..Default::default()
    };
    assert!(apply_filters(&items, &filters, today()).is_empty());
}

#[test]
fn empty_search_matches_everything() {
    let items = vec![art(1, "2024-06-01T00:00:00", "anything")];
    assert_eq!(
        apply_filters(&items, &FilterState::default(), today()).len(),
        1
    );
}

#[test]
fn term_filters_require_membership() {
    let mut no_countries = art(1, "2024-06-01T00:00:00", "a");
    no_countries.countries = vec![];
    let mut ghana = art(2, "2024-06-01T00:00:00", "b");
    ghana.countries = vec![42];
    let items = vec![no_countries, ghana];

    let filters = FilterState {
        country: TermSelection::Term(42),
        ..Default::default()
    };
    let out = apply_filters(&items, &filters, today());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, 2);
}

#[test]
fn all_predicates_are_anded() {
    let items = vec![
        art(1, "2024-06-10T00:00:00", "press freedom"),
        art(2, "2024-06-10T00:00:00", "press conference"),
    ];
    let filters = FilterState {
        search: "press".into(),
        category: TermSelection::Term(1),
        tag: TermSelection::Term(7),
        date: DateFilter {
            preset: DatePreset::Month,
            ..Default::default()
        },
        ..Default::default()
    };
    // both satisfy every predicate...
    assert_eq!(apply_filters(&items, &filters, today()).len(), 2);

    // ...until one predicate stops matching
    let filters = FilterState {
        search: "freedom".into(),
        ..filters
    };
    assert_eq!(apply_filters(&items, &filters, today()).len(), 1);
}

#[test]
fn apply_filters_is_pure() {
    let items = vec![
        art(1, "2024-06-10T00:00:00", "one"),
        art(2, "2024-05-10T00:00:00", "two"),
    ];
    let filters = FilterState {
        search: "o".into(),
        date: DateFilter {
            preset: DatePreset::Year,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(
        apply_filters(&items, &filters, today()),
        apply_filters(&items, &filters, today())
    );
}
