//! Search controller lifecycle integration tests.
//!
//! These tests drive the controller the way a search surface does:
//! open -> type -> debounce -> lookup -> render -> submit/select/close
//!
//! Time is paused, so every debounce window and catalog delay is exact.

use std::sync::Arc;
use std::time::Duration;

use bordados_core::{
    testing::{fixtures, MockCatalog, MockNavigator},
    CatalogError, CatalogQuery, SearchController, SearchState,
};

/// Test helper wiring a controller to mocks.
struct TestHarness {
    controller: SearchController,
    catalog: Arc<MockCatalog>,
    navigator: Arc<MockNavigator>,
}

impl TestHarness {
    async fn new() -> Self {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_products(vec![
                fixtures::product("Red Shirt"),
                fixtures::product_in_collection("Blue Shirt", "Remeras"),
                fixtures::product("Shorts"),
                fixtures::product("Tote Bag"),
            ])
            .await;

        let navigator = Arc::new(MockNavigator::new());
        let controller = SearchController::new(
            catalog.clone(),
            navigator.clone(),
            fixtures::search_config(),
        );

        Self {
            controller,
            catalog,
            navigator,
        }
    }
}

/// Advance the paused clock and let woken tasks run to their next await.
async fn elapse(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

fn titles(state: &SearchState) -> Vec<String> {
    state.items().iter().map(|i| i.title.clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_lookup_issued_once_after_debounce_window() {
    let h = TestHarness::new().await;
    h.catalog.set_products(vec![fixtures::product("Red Shirt")]).await;

    h.controller.open();
    h.controller.set_query("shirt");
    assert_eq!(h.controller.query(), "shirt");

    elapse(499).await;
    assert_eq!(h.catalog.query_count().await, 0);

    elapse(1).await;
    assert_eq!(
        h.catalog.recorded_queries().await,
        vec![CatalogQuery::new("shirt", "us", 6)]
    );
    assert_eq!(
        h.controller.state(),
        SearchState::Populated(vec![fixtures::product("Red Shirt")])
    );

    elapse(5_000).await;
    assert_eq!(h.catalog.query_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_keystrokes_only_look_up_final_text() {
    let h = TestHarness::new().await;

    for text in ["s", "sh", "shi", "shir", "shirt"] {
        h.controller.set_query(text);
        elapse(100).await;
    }
    assert_eq!(h.catalog.query_count().await, 0);

    elapse(400).await;
    assert_eq!(h.catalog.recorded_texts().await, vec!["shirt".to_string()]);
    assert_eq!(
        titles(&h.controller.state()),
        vec!["Red Shirt".to_string(), "Blue Shirt".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_does_not_overwrite_newer_results() {
    let h = TestHarness::new().await;
    h.catalog.set_delay("sh", Duration::from_millis(1_000)).await;
    h.catalog.set_delay("shirt", Duration::from_millis(100)).await;

    // t=0: type "sh"; t=500: lookup #1 issued, resolves at t=1500
    h.controller.set_query("sh");
    elapse(500).await;
    assert_eq!(h.controller.state(), SearchState::Pending);

    // t=500: type "shirt"; t=1000: lookup #2 issued, resolves at t=1100
    h.controller.set_query("shirt");
    elapse(500).await;
    assert_eq!(h.catalog.recorded_texts().await, vec!["sh", "shirt"]);

    elapse(100).await;
    let newer = vec!["Red Shirt".to_string(), "Blue Shirt".to_string()];
    assert_eq!(titles(&h.controller.state()), newer);

    // t=1500: lookup #1 resolves late and must be ignored
    elapse(400).await;
    assert_eq!(titles(&h.controller.state()), newer);
    assert_eq!(h.controller.query(), "shirt");
}

#[tokio::test(start_paused = true)]
async fn test_pending_until_newest_lookup_completes() {
    let h = TestHarness::new().await;
    h.catalog.set_delay("sh", Duration::from_millis(200)).await;
    h.catalog.set_delay("shirt", Duration::from_millis(1_000)).await;

    h.controller.set_query("sh");
    elapse(500).await;
    h.controller.set_query("shirt");
    elapse(500).await;

    // "sh" has resolved; "shirt" is still in flight
    assert_eq!(h.controller.state(), SearchState::Pending);

    elapse(1_000).await;
    assert_eq!(titles(&h.controller.state()).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_query_clears_synchronously_without_lookup() {
    let h = TestHarness::new().await;

    h.controller.set_query("shirt");
    elapse(500).await;
    assert!(matches!(h.controller.state(), SearchState::Populated(_)));

    h.controller.set_query("");
    assert_eq!(h.controller.state(), SearchState::Idle);
    assert!(h.controller.snapshot().state.items().is_empty());

    elapse(2_000).await;
    assert_eq!(h.catalog.query_count().await, 1);
    assert_eq!(h.controller.state(), SearchState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_empty_query_discards_in_flight_lookup() {
    let h = TestHarness::new().await;
    h.catalog.set_delay("shirt", Duration::from_millis(1_000)).await;

    h.controller.set_query("shirt");
    elapse(500).await;
    assert_eq!(h.controller.state(), SearchState::Pending);

    h.controller.set_query("");
    elapse(1_000).await;
    assert_eq!(h.controller.state(), SearchState::Idle);

    // Typing again must not resurrect the discarded results
    h.controller.set_query("tote");
    assert_eq!(h.controller.state(), SearchState::Empty);
}

#[tokio::test(start_paused = true)]
async fn test_no_matches_is_empty_not_pending() {
    let h = TestHarness::new().await;
    h.catalog.set_delay("zzz", Duration::from_millis(300)).await;

    h.controller.set_query("zzz");
    elapse(500).await;
    assert_eq!(h.controller.state(), SearchState::Pending);

    elapse(300).await;
    assert_eq!(h.controller.state(), SearchState::Empty);
}

#[tokio::test(start_paused = true)]
async fn test_failed_lookup_shows_empty_without_retry() {
    let h = TestHarness::new().await;
    h.catalog
        .set_next_error(CatalogError::ApiError {
            status: 500,
            message: "boom".to_string(),
        })
        .await;

    h.controller.set_query("shirt");
    elapse(500).await;
    assert_eq!(h.controller.state(), SearchState::Empty);

    elapse(5_000).await;
    assert_eq!(h.catalog.query_count().await, 1);

    // The next keystroke searches normally again
    h.controller.set_query("shirts");
    elapse(500).await;
    assert_eq!(h.catalog.query_count().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_close_resets_and_ignores_late_response() {
    let h = TestHarness::new().await;
    h.catalog.set_delay("shirt", Duration::from_millis(1_000)).await;

    h.controller.open();
    h.controller.set_query("shirt");
    elapse(500).await;
    assert_eq!(h.controller.state(), SearchState::Pending);

    h.controller.close();
    let snapshot = h.controller.snapshot();
    assert!(!snapshot.open);
    assert_eq!(snapshot.query, "");
    assert_eq!(snapshot.state, SearchState::Idle);

    elapse(1_000).await;
    assert_eq!(h.controller.state(), SearchState::Idle);

    h.controller.open();
    assert_eq!(h.controller.state(), SearchState::Idle);
    assert!(h.controller.snapshot().state.items().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_pending_timer() {
    let h = TestHarness::new().await;

    h.controller.open();
    h.controller.set_query("shirt");
    elapse(200).await;
    h.controller.close();

    elapse(2_000).await;
    assert_eq!(h.catalog.query_count().await, 0);
    assert_eq!(h.controller.state(), SearchState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_submit_navigates_to_listing_with_query() {
    let h = TestHarness::new().await;

    h.controller.open();
    h.controller.set_query("red shirt");
    h.controller.submit();

    assert_eq!(h.navigator.urls(), vec!["/store?q=red%20shirt".to_string()]);
    assert!(!h.controller.is_open());
    assert_eq!(h.controller.query(), "");

    elapse(2_000).await;
    assert_eq!(h.catalog.query_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_submit_does_not_wait_for_pending_lookup() {
    let h = TestHarness::new().await;
    h.catalog.set_delay("shirt", Duration::from_millis(5_000)).await;

    h.controller.open();
    h.controller.set_query("shirt");
    elapse(500).await;
    h.controller.submit();

    assert_eq!(h.navigator.urls(), vec!["/store?q=shirt".to_string()]);

    elapse(5_000).await;
    assert_eq!(h.controller.state(), SearchState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_submit_empty_query_opens_unfiltered_listing() {
    let h = TestHarness::new().await;

    h.controller.open();
    h.controller.submit();

    assert_eq!(h.navigator.urls(), vec!["/store".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_select_navigates_to_localized_product_page() {
    let h = TestHarness::new().await;
    h.controller.set_country_code("AR");

    h.controller.open();
    h.controller.set_query("red");
    elapse(500).await;

    let item = h.controller.state().items()[0].clone();
    h.controller.select(&item);

    assert_eq!(h.navigator.urls(), vec!["/ar/products/red-shirt".to_string()]);
    assert!(!h.controller.is_open());
    assert_eq!(h.controller.state(), SearchState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_country_change_looks_up_again() {
    let h = TestHarness::new().await;

    h.controller.set_query("shirt");
    elapse(500).await;

    h.controller.set_country_code("ar");
    assert_eq!(h.controller.country_code(), "ar");
    elapse(500).await;

    let queries = h.catalog.recorded_queries().await;
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].country_code, "us");
    assert_eq!(queries[1].country_code, "ar");

    // Same country again is a no-op
    h.controller.set_country_code("AR");
    elapse(500).await;
    assert_eq!(h.catalog.query_count().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_fire_looks_up_immediately() {
    let h = TestHarness::new().await;

    h.controller.set_query("shirt");
    h.controller.on_debounce_fire("shirt", "mx");
    elapse(0).await;

    let queries = h.catalog.recorded_queries().await;
    assert_eq!(queries, vec![CatalogQuery::new("shirt", "mx", 6)]);
    assert!(matches!(h.controller.state(), SearchState::Populated(_)));

    // The keystroke's own timer was superseded
    elapse(1_000).await;
    assert_eq!(h.catalog.query_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_every_transition() {
    let h = TestHarness::new().await;
    h.catalog.set_delay("shirt", Duration::from_millis(100)).await;
    let mut rx = h.controller.subscribe();

    h.controller.open();
    assert!(rx.borrow_and_update().open);

    h.controller.set_query("shirt");
    assert_eq!(rx.borrow_and_update().query, "shirt");

    elapse(500).await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().state, SearchState::Pending);

    elapse(100).await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(titles(&rx.borrow_and_update().state).len(), 2);

    h.controller.close();
    assert_eq!(rx.borrow_and_update().state, SearchState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_controller_cancels_timer() {
    let h = TestHarness::new().await;
    let catalog = h.catalog.clone();

    h.controller.set_query("shirt");
    drop(h);

    elapse(2_000).await;
    assert_eq!(catalog.query_count().await, 0);
}
