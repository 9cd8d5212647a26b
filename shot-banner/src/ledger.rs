use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::Inventory;

/// Remaining shows per banner.
///
/// The set of banners is fixed when the ledger is seeded, so the map itself is
/// never written again. Each counter is an atomic that only ever moves down, one
/// show at a time, through [`Ledger::decrement_if_positive`].
#[derive(Debug, Default)]
pub struct Ledger {
    remaining: HashMap<Arc<str>, AtomicU64>,
}

impl Ledger {
    /// Seeds one counter per banner with its configured budget.
    ///
    /// When an identifier appears more than once, the last record's budget wins.
    pub fn seeded(inventory: &Inventory) -> Self {
        let mut remaining = HashMap::with_capacity(inventory.len());
        for banner in inventory.banners() {
            remaining.insert(banner.id().clone(), AtomicU64::new(banner.budget()));
        }
        Self { remaining }
    }

    /// Current remaining shows. Unknown banners have none.
    pub fn remaining(&self, id: &str) -> u64 {
        self.remaining
            .get(id)
            .map_or(0, |count| count.load(Ordering::Acquire))
    }

    /// Spends one show of `id`.
    ///
    /// Returns `true` only if the count was strictly positive before the call. On
    /// `false` the count is left untouched.
    pub fn decrement_if_positive(&self, id: &str) -> bool {
        let Some(count) = self.remaining.get(id) else {
            return false;
        };

        count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |val| {
                if val > 0 { Some(val - 1) } else { None }
            })
            .is_ok()
    }

    /// Sum of all remaining shows.
    pub fn total_remaining(&self) -> u64 {
        self.remaining
            .values()
            .map(|count| count.load(Ordering::Acquire))
            .sum()
    }
}
