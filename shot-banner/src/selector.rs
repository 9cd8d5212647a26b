use std::collections::HashSet;
use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::debug;
use tracing::trace;

use crate::ClientHistory;
use crate::Inventory;
use crate::Ledger;
use crate::Picker;
use crate::Reason;
use crate::UniformPicker;

/// How many times a selection is re-run when its pick is spent by a competing
/// request before the decrement lands.
pub const DEFAULT_MAX_ATTEMPTS: usize = 4;

/// Chooses a banner for a request and commits the show.
///
/// A selection reads the immutable [`Inventory`], filters on the live [`Ledger`]
/// and the requesting client's entry in [`ClientHistory`], then spends one show of
/// the chosen banner. The read and the spend are not one atomic step: if another
/// request takes the last show in between, the selection is re-run against the
/// refreshed ledger, up to `max_attempts` times.
#[derive(Debug)]
pub struct BannerSelector<P = UniformPicker> {
    inventory: Arc<Inventory>,
    ledger: Arc<Ledger>,
    history: Arc<ClientHistory>,
    picker: P,
    max_attempts: usize,
}

impl BannerSelector {
    /// Creates a selector with a fresh ledger seeded from `inventory`.
    pub fn new(inventory: Arc<Inventory>) -> Self {
        Self::with_picker(inventory, UniformPicker)
    }
}

impl<P> BannerSelector<P>
where
    P: Picker,
{
    pub fn with_picker(inventory: Arc<Inventory>, picker: P) -> Self {
        let ledger = Arc::new(Ledger::seeded(&inventory));
        Self::from_parts(inventory, ledger, Arc::new(ClientHistory::new()), picker)
    }

    /// Assembles a selector from state owned elsewhere.
    ///
    /// The ledger should have been seeded from `inventory`. Banners missing from
    /// it are treated as having no shows left.
    pub fn from_parts(
        inventory: Arc<Inventory>,
        ledger: Arc<Ledger>,
        history: Arc<ClientHistory>,
        picker: P,
    ) -> Self {
        Self {
            inventory,
            ledger,
            history,
            picker,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set how many selection attempts a single request may make. At least one
    /// attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn history(&self) -> &ClientHistory {
        &self.history
    }

    /// Selects a banner for `client` among `categories` and commits the show.
    ///
    /// An empty `categories` slice means every banner in the inventory. On
    /// `Continue` the chosen banner has been charged one show and recorded as the
    /// client's last served banner. On `Break` nothing has changed.
    pub fn select<C>(&self, categories: &[C], client: &str) -> ControlFlow<Reason, Arc<str>>
    where
        C: AsRef<str>,
    {
        let candidates = self.candidates(categories);
        if candidates.is_empty() {
            debug!(client, "no banner registered for requested categories");
            return ControlFlow::Break(Reason::UnknownCategories);
        }

        let last = self.history.last_served(client);

        for attempt in 1..=self.max_attempts {
            let eligible = self.filter(&candidates, last.as_deref());
            if eligible.is_empty() {
                debug!(client, attempt, "all candidate banners exhausted");
                return ControlFlow::Break(Reason::Exhausted);
            }

            let index = self.picker.pick(eligible.len());
            let Some(&chosen) = eligible.get(index) else {
                trace!(client, index, attempt, "picker index out of range, retrying");
                continue;
            };
            if self.ledger.decrement_if_positive(chosen) {
                self.history.record_served(client, chosen.clone());
                debug!(client, banner = %chosen, attempt, "banner served");
                return ControlFlow::Continue(chosen.clone());
            }

            trace!(client, banner = %chosen, attempt, "banner spent concurrently, retrying");
        }

        debug!(client, attempts = self.max_attempts, "gave up under contention");
        ControlFlow::Break(Reason::Contended {
            attempts: self.max_attempts,
        })
    }

    /// The banners `client` could be served right now, without serving any.
    pub fn eligible<C>(&self, categories: &[C], client: &str) -> Vec<Arc<str>>
    where
        C: AsRef<str>,
    {
        let candidates = self.candidates(categories);
        let last = self.history.last_served(client);
        self.filter(&candidates, last.as_deref())
            .into_iter()
            .cloned()
            .collect()
    }

    /// The category candidate set: the union of the requested categories, or
    /// the whole inventory when none are requested. Deduplicated, first-seen
    /// order.
    fn candidates<C>(&self, categories: &[C]) -> Vec<&Arc<str>>
    where
        C: AsRef<str>,
    {
        if categories.is_empty() {
            return self.inventory.identifiers().iter().collect();
        }

        let mut candidates: Vec<&Arc<str>> = Vec::new();
        let mut seen: HashSet<&Arc<str>> = HashSet::new();
        for category in categories {
            for id in self.inventory.category(category.as_ref()) {
                if seen.insert(id) {
                    candidates.push(id);
                }
            }
        }
        candidates
    }

    /// Drops banners without remaining shows, then drops the client's last
    /// banner unless it is the only one left.
    fn filter<'a>(&self, candidates: &[&'a Arc<str>], last: Option<&str>) -> Vec<&'a Arc<str>> {
        let mut eligible: Vec<&'a Arc<str>> = candidates
            .iter()
            .copied()
            .filter(|id| self.ledger.remaining(id) > 0)
            .collect();

        if let Some(last) = last
            && eligible.len() > 1
        {
            eligible.retain(|id| ***id != *last);
        }

        eligible
    }
}
