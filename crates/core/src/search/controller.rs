//! Incremental search controller.
//!
//! Turns keystrokes into debounced catalog lookups and exposes a small
//! [`SearchSnapshot`] for rendering. All state sits behind one mutex that is
//! never held across an `.await`; timers and lookups run as spawned tasks
//! that re-enter through short locked sections and hold only a weak
//! reference, so dropping the controller silences them.
//!
//! Every issued lookup gets a sequence number. A response is applied only if
//! its number is still the latest issued, so results land in issue order no
//! matter when requests complete. Closing the surface or clearing the query
//! bumps the sequence, neutralising anything started before.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::debounce::Debouncer;
use super::navigation::{Destination, Navigator};
use super::state::{SearchSnapshot, SearchState};
use crate::catalog::{CatalogError, CatalogQuery, ProductCatalog, ResultItem};
use crate::config::SearchConfig;
use crate::metrics::{SEARCH_LOOKUPS_COMPLETED, SEARCH_LOOKUPS_ISSUED, SEARCH_LOOKUP_DURATION};

/// Query parameter carrying the search text on the listing view.
pub const QUERY_PARAM: &str = "q";

/// Debounced product search behind a transient search surface.
///
/// Cheaply cloneable; clones drive the same search. Methods that schedule
/// work must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct SearchController {
    shared: Arc<Shared>,
}

struct Shared {
    catalog: Arc<dyn ProductCatalog>,
    navigator: Arc<dyn Navigator>,
    config: SearchConfig,
    inner: Mutex<Inner>,
    snapshots: watch::Sender<SearchSnapshot>,
}

struct Inner {
    open: bool,
    query: String,
    country_code: String,
    /// Last applied result set.
    results: Vec<ResultItem>,
    /// Whether the latest issued lookup is still outstanding.
    in_flight: bool,
    /// Sequence number of the latest issued lookup.
    latest_request: u64,
    debouncer: Debouncer,
}

impl Inner {
    fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            open: self.open,
            query: self.query.clone(),
            state: SearchState::derive(&self.query, self.in_flight, &self.results),
        }
    }

    /// Drop results and make every outstanding timer and lookup stale.
    fn reset_results(&mut self) {
        self.debouncer.cancel();
        self.latest_request += 1;
        self.in_flight = false;
        self.results.clear();
    }

    fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.reset_results();
    }
}

impl SearchController {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        navigator: Arc<dyn Navigator>,
        config: SearchConfig,
    ) -> Self {
        let inner = Inner {
            open: false,
            query: String::new(),
            country_code: config.default_country_code.to_ascii_lowercase(),
            results: Vec::new(),
            in_flight: false,
            latest_request: 0,
            debouncer: Debouncer::new(config.debounce()),
        };
        let (snapshots, _) = watch::channel(inner.snapshot());

        Self {
            shared: Arc::new(Shared {
                catalog,
                navigator,
                config,
                inner: Mutex::new(inner),
                snapshots,
            }),
        }
    }

    /// Show the search surface.
    pub fn open(&self) {
        let mut inner = self.shared.lock();
        inner.open = true;
        self.shared.publish(&inner);
    }

    /// Hide the surface and reset to idle.
    ///
    /// The pending timer is aborted and in-flight lookups become stale, so
    /// nothing started before this call can change state afterwards.
    pub fn close(&self) {
        let mut inner = self.shared.lock();
        inner.close();
        debug!("Search closed, latest request now #{}", inner.latest_request);
        self.shared.publish(&inner);
    }

    pub fn is_open(&self) -> bool {
        self.shared.lock().open
    }

    pub fn query(&self) -> String {
        self.shared.lock().query.clone()
    }

    pub fn country_code(&self) -> String {
        self.shared.lock().country_code.clone()
    }

    pub fn state(&self) -> SearchState {
        self.snapshot().state
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.shared.lock().snapshot()
    }

    /// Receive a fresh snapshot on every change.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Update the query text and restart the debounce window.
    ///
    /// An empty query clears results right away and issues no lookup.
    pub fn set_query(&self, text: &str) {
        let mut inner = self.shared.lock();
        inner.query = text.to_string();

        if text.is_empty() {
            inner.reset_results();
        } else {
            self.shared.schedule_lookup(&mut inner);
        }

        self.shared.publish(&inner);
    }

    /// Change the country that scopes lookups.
    ///
    /// An active query is looked up again for the new country after the
    /// debounce window.
    pub fn set_country_code(&self, country_code: &str) {
        let country_code = country_code.to_ascii_lowercase();
        let mut inner = self.shared.lock();
        if inner.country_code == country_code {
            return;
        }

        inner.country_code = country_code;
        if !inner.query.is_empty() {
            self.shared.schedule_lookup(&mut inner);
        }
    }

    /// The debounce window elapsed: look up `text` in `country_code` now.
    ///
    /// Supersedes any pending timer and any lookup still in flight.
    pub fn on_debounce_fire(&self, text: &str, country_code: &str) {
        let mut inner = self.shared.lock();
        inner.debouncer.cancel();
        self.shared
            .issue_lookup(&mut inner, text.to_string(), country_code.to_string());
        self.shared.publish(&inner);
    }

    /// Close the surface and open the full listing filtered by the query.
    ///
    /// Does not wait for pending lookups.
    pub fn submit(&self) {
        let destination = {
            let mut inner = self.shared.lock();
            let query = std::mem::take(&mut inner.query);
            inner.close();
            self.shared.publish(&inner);

            let destination = Destination::new(self.shared.config.listing_path.as_str());
            if query.is_empty() {
                destination
            } else {
                destination.with_param(QUERY_PARAM, query)
            }
        };

        debug!("Search submitted, navigating to {}", destination.to_url());
        self.shared.navigator.navigate(&destination);
    }

    /// Close the surface and open the product page of a result.
    pub fn select(&self, item: &ResultItem) {
        let destination = {
            let mut inner = self.shared.lock();
            let destination = Destination::new(item.product_path(&inner.country_code));
            inner.close();
            self.shared.publish(&inner);
            destination
        };

        self.shared.navigator.navigate(&destination);
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.snapshots.send_replace(inner.snapshot());
    }

    /// Restart the debounce timer for the current query and country.
    fn schedule_lookup(self: &Arc<Self>, inner: &mut Inner) {
        let weak = Arc::downgrade(self);
        let text = inner.query.clone();
        let country_code = inner.country_code.clone();

        inner.debouncer.schedule(move |generation| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut inner = shared.lock();
            if !inner.debouncer.take_if_current(generation) {
                debug!("Ignoring superseded debounce timer for '{}'", text);
                return;
            }
            shared.issue_lookup(&mut inner, text, country_code);
            shared.publish(&inner);
        });
    }

    fn issue_lookup(self: &Arc<Self>, inner: &mut Inner, text: String, country_code: String) {
        if text.is_empty() {
            inner.reset_results();
            return;
        }

        inner.latest_request += 1;
        inner.in_flight = true;
        let request = inner.latest_request;
        SEARCH_LOOKUPS_ISSUED.inc();

        debug!(
            "Issuing lookup #{}: query='{}', country={}, limit={}",
            request, text, country_code, self.config.result_limit
        );

        let query = CatalogQuery::new(text, country_code, self.config.result_limit);
        let catalog = Arc::clone(&self.catalog);
        let weak: Weak<Shared> = Arc::downgrade(self);

        tokio::spawn(async move {
            let started = Instant::now();
            let result = catalog.search_products(&query).await;
            SEARCH_LOOKUP_DURATION.observe(started.elapsed().as_secs_f64());

            if let Some(shared) = weak.upgrade() {
                shared.complete_lookup(request, &query, result);
            }
        });
    }

    fn complete_lookup(
        &self,
        request: u64,
        query: &CatalogQuery,
        result: Result<Vec<ResultItem>, CatalogError>,
    ) {
        let mut inner = self.lock();
        if request != inner.latest_request {
            debug!(
                "Discarding stale lookup #{} for '{}' (latest is #{})",
                request, query.text, inner.latest_request
            );
            SEARCH_LOOKUPS_COMPLETED
                .with_label_values(&["stale"])
                .inc();
            return;
        }

        inner.in_flight = false;
        let outcome = match result {
            Ok(items) if items.is_empty() => {
                inner.results.clear();
                "empty"
            }
            Ok(items) => {
                inner.results = items;
                "populated"
            }
            Err(e) => {
                warn!("Product search for '{}' failed: {}", query.text, e);
                inner.results.clear();
                "error"
            }
        };
        SEARCH_LOOKUPS_COMPLETED
            .with_label_values(&[outcome])
            .inc();

        self.publish(&inner);
    }
}
