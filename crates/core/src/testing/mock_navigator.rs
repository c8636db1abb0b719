//! Mock navigator for testing.

use std::sync::{Mutex, PoisonError};

use crate::search::{Destination, Navigator};

/// Records every navigation instead of performing it.
#[derive(Debug, Default)]
pub struct MockNavigator {
    destinations: Mutex<Vec<Destination>>,
}

impl MockNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All destinations, in navigation order.
    pub fn destinations(&self) -> Vec<Destination> {
        self.destinations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rendered URLs of all destinations.
    pub fn urls(&self) -> Vec<String> {
        self.destinations().iter().map(Destination::to_url).collect()
    }
}

impl Navigator for MockNavigator {
    fn navigate(&self, destination: &Destination) {
        self.destinations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(destination.clone());
    }
}
