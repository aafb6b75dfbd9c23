//! Integration tests for the catalog HTTP surface.
//!
//! Tests the aggregation routes end to end against mock upstreams:
//! - GET /aggregates/:subject: aggregate on miss, serve from cache on hit
//! - POST /aggregates/:subject/enrichment: explicit-presence partial updates
//! - DELETE /aggregates/:subject: invalidation

mod common;

use crate::common::*;
use aggregator_core::domains::catalog::PipelineSettings;
use aggregator_core::kernel::test_dependencies::{MockDetailFetcher, MockPageFetcher};
use aggregator_core::kernel::TestDependencies;
use axum::http::StatusCode;
use serde_json::json;

fn harness() -> TestHarness {
    TestHarness::new(TestDependencies::new(catalog_upstream()))
}

fn aggregate_path() -> String {
    format!("/aggregates/{}", SUBJECT)
}

fn enrichment_path() -> String {
    format!("/aggregates/{}/enrichment", SUBJECT)
}

// =============================================================================
// Get Aggregated
// =============================================================================

#[tokio::test]
async fn aggregate_returns_flattened_tagged_items() {
    let ctx = harness();

    let (status, body) = ctx.get(&aggregate_path()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "subject": "156",
            "items": [
                {"id": 1, "name": "VIP", "containerId": 10, "containerName": "Obby", "description": null, "price": null},
                {"id": 2, "name": "Speed Coil", "containerId": 10, "containerName": "Obby", "description": null, "price": null},
                {"id": 3, "name": "Golden Pet", "containerId": 20, "containerName": "Tycoon", "description": null, "price": null}
            ]
        })
    );
    assert_eq!(ctx.test.page_fetcher.call_count(), CATALOG_REQUESTS);
}

#[tokio::test]
async fn second_request_is_served_from_cache() {
    let ctx = harness();

    let (_, first) = ctx.get(&aggregate_path()).await;
    let (status, second) = ctx.get(&aggregate_path()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(ctx.test.page_fetcher.call_count(), CATALOG_REQUESTS);
}

#[tokio::test]
async fn expired_cache_is_rebuilt() {
    let ctx = harness();

    ctx.get(&aggregate_path()).await;
    ctx.test.clock.advance(ctx.test.settings.cache_ttl);
    ctx.get(&aggregate_path()).await;

    assert_eq!(ctx.test.page_fetcher.call_count(), CATALOG_REQUESTS * 2);
}

#[tokio::test]
async fn subject_without_containers_is_empty_and_cached() {
    let upstream = MockPageFetcher::new().with_page(&containers_url("42"), Default::default());
    let ctx = TestHarness::new(TestDependencies::new(upstream));

    let (status, body) = ctx.get("/aggregates/42").await;
    ctx.get("/aggregates/42").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"subject": "42", "items": []}));
    assert_eq!(ctx.test.page_fetcher.call_count(), 1);
}

#[tokio::test]
async fn upstream_failure_degrades_to_partial_result() {
    let upstream = catalog_upstream().with_failure(&items_url(20));
    let ctx = TestHarness::new(TestDependencies::new(upstream));

    let (status, body) = ctx.get(&aggregate_path()).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn detail_pass_populates_description_and_price() {
    let details = MockDetailFetcher::new()
        .with_details(&detail_url(1), Some("Access VIP room"), Some(0))
        .with_details(&detail_url(2), None, Some(25));
    let test = TestDependencies::new(catalog_upstream())
        .with_detail_fetcher(details)
        .with_settings(PipelineSettings {
            fetch_item_details: true,
            ..settings()
        });
    let ctx = TestHarness::new(test);

    let (status, body) = ctx.get(&aggregate_path()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["description"], json!("Access VIP room"));
    assert_eq!(body["items"][0]["price"], json!(0));
    assert_eq!(body["items"][1]["description"], json!(null));
    assert_eq!(body["items"][1]["price"], json!(25));
    // Item 3 has no canned details: left unset
    assert_eq!(body["items"][2]["price"], json!(null));
    assert_eq!(ctx.test.detail_fetcher.call_count(), 3);
}

// =============================================================================
// Apply Enrichment
// =============================================================================

#[tokio::test]
async fn enrichment_applies_explicit_fields_only() {
    let ctx = harness();
    ctx.get(&aggregate_path()).await;

    let (status, body) = ctx
        .post_json(
            &enrichment_path(),
            json!({"updates": [
                {"id": 1, "price": 0, "description": ""},
                {"id": "2", "description": "Go fast"},
                {"id": 999, "price": 10}
            ]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "updated": 2, "total": 3}));

    let (_, aggregate) = ctx.get(&aggregate_path()).await;
    assert_eq!(aggregate["items"][0]["price"], json!(0));
    assert_eq!(aggregate["items"][0]["description"], json!(""));
    assert_eq!(aggregate["items"][1]["description"], json!("Go fast"));
    assert_eq!(aggregate["items"][1]["price"], json!(null));

    // No price key: price stays 0
    ctx.post_json(&enrichment_path(), json!({"updates": [{"id": 1}]}))
        .await;
    let (_, aggregate) = ctx.get(&aggregate_path()).await;
    assert_eq!(aggregate["items"][0]["price"], json!(0));

    assert_eq!(ctx.test.page_fetcher.call_count(), CATALOG_REQUESTS);
}

#[tokio::test]
async fn enrichment_accepts_fractional_price() {
    let ctx = harness();
    ctx.get(&aggregate_path()).await;

    let (status, body) = ctx
        .post_json(&enrichment_path(), json!({"updates": [{"id": 1, "price": 9.5}]}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], json!(1));
    let (_, aggregate) = ctx.get(&aggregate_path()).await;
    assert_eq!(aggregate["items"][0]["price"], json!(9.5));
}

#[tokio::test]
async fn enrichment_without_base_collection_is_not_found() {
    let ctx = harness();

    let (status, body) = ctx
        .post_json(&enrichment_path(), json!({"updates": [{"id": 1, "price": 5}]}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("156"));
    assert_eq!(ctx.deps.cache.live_count().await, 0);
    assert_eq!(ctx.test.page_fetcher.call_count(), 0);
}

#[tokio::test]
async fn enrichment_with_missing_id_is_bad_request() {
    let ctx = harness();
    ctx.get(&aggregate_path()).await;
    let saves = ctx.test.persistence.save_count();

    let (status, _) = ctx
        .post_json(
            &enrichment_path(),
            json!({"updates": [{"id": 1, "price": 5}, {"price": 7}]}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(ctx.test.persistence.save_count(), saves);
    let (_, aggregate) = ctx.get(&aggregate_path()).await;
    assert_eq!(aggregate["items"][0]["price"], json!(null));
}

#[tokio::test]
async fn enrichment_with_malformed_body_is_bad_request() {
    let ctx = harness();
    ctx.get(&aggregate_path()).await;

    let (status, body) = ctx.post_raw(&enrichment_path(), "{\"updates\": [").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = ctx.post_json(&enrichment_path(), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post_json(&enrichment_path(), json!({"updates": [{"id": 1, "price": "free"}]}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Invalidate / Health
// =============================================================================

#[tokio::test]
async fn invalidate_forces_fresh_aggregation() {
    let ctx = harness();
    ctx.get(&aggregate_path()).await;

    let (status, body) = ctx.delete(&aggregate_path()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "removed": true}));

    let (_, body) = ctx.delete(&aggregate_path()).await;
    assert_eq!(body["removed"], json!(false));

    ctx.get(&aggregate_path()).await;
    assert_eq!(ctx.test.page_fetcher.call_count(), CATALOG_REQUESTS * 2);
}

#[tokio::test]
async fn health_reports_cached_subjects() {
    let ctx = harness();

    let (_, before) = ctx.get("/health").await;
    ctx.get(&aggregate_path()).await;
    let (status, after) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(before, json!({"status": "healthy", "cached_subjects": 0}));
    assert_eq!(after["cached_subjects"], json!(1));
}

#[tokio::test]
async fn root_banner() {
    let ctx = harness();

    let (status, text) = ctx.get_text("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("/aggregates/"));
}
