// tests/session.rs
use article_directory::ingest::types::parse_wp_date;
use article_directory::{Article, DatePreset, Session, Taxonomies, TermSelection};
use chrono::NaiveDateTime;

fn articles(n: u64) -> Vec<Article> {
    (1..=n)
        .map(|id| Article {
            id,
            published_at: parse_wp_date(&format!("2024-06-{:02}T08:00:00", (id % 28) + 1)),
            title: format!("article {id}"),
            excerpt: String::new(),
            categories: vec![1],
            tags: vec![],
            countries: vec![],
            link: String::new(),
            source: "posts".into(),
        })
        .collect()
}

fn now() -> NaiveDateTime {
    parse_wp_date("2024-06-28T12:00:00")
}

#[test]
fn changing_the_search_term_resets_the_visible_page() {
    let items = articles(50);
    let mut session = Session::new(10);

    session.set_page(3);
    let view = session.view(&items, &Taxonomies::default(), now());
    assert_eq!(view.page, 3);
    assert_eq!(view.total_pages, 5);

    session.set_search("article");
    assert_eq!(session.page(), 1);
    let view = session.view(&items, &Taxonomies::default(), now());
    assert_eq!(view.page, 1);
}

#[test]
fn every_filter_transition_resets_the_page() {
    let mut session = Session::new(10);

    session.set_page(4);
    session.set_category(TermSelection::Term(1));
    assert_eq!(session.page(), 1);

    session.set_page(4);
    session.set_tag(TermSelection::All);
    assert_eq!(session.page(), 1);

    session.set_page(4);
    session.set_country(TermSelection::Term(9));
    assert_eq!(session.page(), 1);

    session.set_page(4);
    session.set_date_preset(DatePreset::Month);
    assert_eq!(session.page(), 1);
}

#[test]
fn explicit_dates_clear_the_preset_and_vice_versa() {
    let mut session = Session::new(10);

    session.set_date_preset(DatePreset::Week);
    session.set_date_range(Some("2024-01-01".parse().unwrap()), None);
    assert_eq!(session.filters().date.preset, DatePreset::All);
    assert!(session.filters().date.start.is_some());

    session.set_date_preset(DatePreset::Month);
    assert!(session.filters().date.start.is_none());
    assert!(session.filters().date.end.is_none());
    assert_eq!(session.filters().date.preset, DatePreset::Month);
}

#[test]
fn clear_filters_returns_to_the_default_state() {
    let mut session = Session::new(10);
    session.set_search("press");
    session.set_category(TermSelection::Term(3));
    session.set_page(2);
    assert!(session.has_active_filters());

    session.clear_filters();
    assert!(!session.has_active_filters());
    assert_eq!(session.page(), 1);
}

#[test]
fn view_clamps_a_stale_page_against_the_filtered_set() {
    let items = articles(12);
    let mut session = Session::new(10);
    session.set_page(99);

    let view = session.view(&items, &Taxonomies::default(), now());
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.page, 2);
    assert_eq!(view.articles.len(), 2);
    assert_eq!(view.total_matches, 12);
}

#[test]
fn view_carries_analytics_over_the_filtered_set() {
    let items = articles(5);
    let mut session = Session::new(10);
    session.set_search("no such title");

    let view = session.view(&items, &Taxonomies::default(), now());
    assert_eq!(view.total_matches, 0);
    assert_eq!(view.analytics.total_articles, 0);
    assert_eq!(view.analytics.timeline.len(), 12);
}
