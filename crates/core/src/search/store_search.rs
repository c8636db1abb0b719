//! Search box of the product listing page.
//!
//! Unlike the transient search surface, this box filters the listing in
//! place: after the debounce window it navigates to the current page with the
//! `q` parameter updated, leaving the other parameters alone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::time::Duration;
use tracing::debug;

use super::controller::QUERY_PARAM;
use super::debounce::Debouncer;
use super::navigation::{Destination, Navigator};

/// Keeps the listing search text and the page URL in sync.
#[derive(Clone)]
pub struct StoreSearch {
    shared: Arc<StoreShared>,
}

struct StoreShared {
    navigator: Arc<dyn Navigator>,
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    query: String,
    location: Destination,
    debouncer: Debouncer,
}

impl StoreSearch {
    /// Start from the current page; the text is taken from its `q` parameter.
    pub fn new(navigator: Arc<dyn Navigator>, delay: Duration, location: Destination) -> Self {
        let query = location.param(QUERY_PARAM).unwrap_or_default().to_string();
        Self {
            shared: Arc::new(StoreShared {
                navigator,
                inner: Mutex::new(StoreInner {
                    query,
                    location,
                    debouncer: Debouncer::new(delay),
                }),
            }),
        }
    }

    pub fn query(&self) -> String {
        self.shared.lock().query.clone()
    }

    pub fn location(&self) -> Destination {
        self.shared.lock().location.clone()
    }

    /// Update the text now; navigate once typing pauses.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_query(&self, text: &str) {
        let mut inner = self.shared.lock();
        inner.query = text.to_string();

        let weak = Arc::downgrade(&self.shared);
        let text = text.to_string();
        inner.debouncer.schedule(move |generation| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let destination = {
                let mut inner = shared.lock();
                if !inner.debouncer.take_if_current(generation) {
                    return;
                }
                let mut destination = inner.location.clone();
                if text.is_empty() {
                    destination.remove_param(QUERY_PARAM);
                } else {
                    destination.set_param(QUERY_PARAM, &text);
                }
                inner.location = destination.clone();
                destination
            };

            debug!("Listing search navigating to {}", destination.to_url());
            shared.navigator.navigate(&destination);
        });
    }

    /// Empty the box; the `q` parameter is dropped after the debounce window.
    pub fn clear(&self) {
        self.set_query("");
    }

    /// Adopt the page the shell is now showing, e.g. after back/forward.
    pub fn sync_from_location(&self, location: Destination) {
        let mut inner = self.shared.lock();
        inner.query = location.param(QUERY_PARAM).unwrap_or_default().to_string();
        inner.location = location;
    }
}

impl StoreShared {
    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
