// tests/pagination.rs
use article_directory::paginate::{clamp_page, page_slice, total_pages};

#[test]
fn round_trip_reproduces_the_list_in_order() {
    let items: Vec<u32> = (0..47).collect();
    let per_page = 10;
    let pages = total_pages(items.len(), per_page);
    assert_eq!(pages, 5);

    let mut rebuilt = Vec::new();
    for page in 1..=pages {
        rebuilt.extend_from_slice(page_slice(&items, page, per_page));
    }
    assert_eq!(rebuilt, items);
}

#[test]
fn empty_list_has_zero_pages() {
    let items: Vec<u32> = Vec::new();
    assert_eq!(total_pages(items.len(), 10), 0);
    assert!(page_slice(&items, 1, 10).is_empty());
    // with no pages, page 1 is the canonical position
    assert_eq!(clamp_page(3, 0), 1);
}

#[test]
fn out_of_range_pages_clamp_after_a_shrinking_filter() {
    let items: Vec<u32> = (0..12).collect();
    let pages = total_pages(items.len(), 10);
    assert_eq!(pages, 2);
    // a consumer still holding page 5 gets clamped into range
    let page = clamp_page(5, pages);
    assert_eq!(page, 2);
    assert_eq!(page_slice(&items, page, 10), &[10, 11]);
}
