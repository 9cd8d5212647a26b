use std::sync::Arc;

use dashmap::DashMap;

/// The last banner served to each client.
///
/// Entries are created on a client's first serve and overwritten on every later
/// one. Nothing is ever evicted, so the map grows with the number of distinct
/// clients seen by the process.
#[derive(Debug, Default)]
pub struct ClientHistory {
    /// Client identifier → last served banner.
    last: DashMap<String, Arc<str>>,
}

impl ClientHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The banner most recently served to `client`, if any.
    pub fn last_served(&self, client: &str) -> Option<Arc<str>> {
        self.last.get(client).map(|entry| entry.value().clone())
    }

    /// Overwrites the banner most recently served to `client`.
    pub fn record_served(&self, client: &str, banner: Arc<str>) {
        match self.last.get_mut(client) {
            Some(mut entry) => *entry = banner,
            None => {
                self.last.insert(client.to_string(), banner);
            }
        }
    }

    /// Number of clients seen so far.
    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
