//! Canned upstream data for integration tests.
//!
//! Subject "156" owns two containers:
//! - 10 "Obby": items 1 and 2, split across two pages
//! - 20 "Tycoon": item 3

#![allow(dead_code)]

use aggregator_core::common::RecordId;
use aggregator_core::domains::catalog::actions::paginate::with_cursor;
use aggregator_core::domains::catalog::PipelineSettings;
use aggregator_core::kernel::test_dependencies::MockPageFetcher;
use aggregator_core::kernel::Page;
use serde_json::json;

pub const SUBJECT: &str = "156";

/// Cursor with characters that must be escaped in the next URL.
pub const SECOND_PAGE_CURSOR: &str = "page+2/==";

pub fn settings() -> PipelineSettings {
    PipelineSettings::for_tests()
}

pub fn containers_url(subject: &str) -> String {
    settings().endpoints.container_url(subject)
}

pub fn items_url(container: i64) -> String {
    settings().endpoints.item_list_url(&RecordId::from(container))
}

pub fn detail_url(item: i64) -> String {
    settings().endpoints.item_detail_url(&RecordId::from(item))
}

/// Upstream with the full two-container catalog for `SUBJECT`.
pub fn catalog_upstream() -> MockPageFetcher {
    MockPageFetcher::new()
        .with_page(
            &containers_url(SUBJECT),
            Page::last(vec![
                json!({"id": 10, "name": "Obby"}),
                json!({"id": 20, "name": "Tycoon"}),
            ]),
        )
        .with_page(
            &items_url(10),
            Page::new(
                vec![json!({"id": 1, "name": "VIP"})],
                Some(SECOND_PAGE_CURSOR.to_string()),
            ),
        )
        .with_page(
            &with_cursor(&items_url(10), SECOND_PAGE_CURSOR),
            Page::last(vec![json!({"id": 2, "name": "Speed Coil"})]),
        )
        .with_page(
            &items_url(20),
            Page::last(vec![json!({"id": 3, "name": "Golden Pet"})]),
        )
}

/// Requests needed to aggregate `SUBJECT` once.
pub const CATALOG_REQUESTS: usize = 4;
