//! # shot-banner
//!
//! `shot-banner` picks which advertising banner to show next.
//!
//! ## Core Philosophy
//!
//! Every banner carries a finite show budget. Budgets are spent from many request
//! handlers at once, so the [`Ledger`] holds one atomic counter per banner and spends
//! it with a Compare-And-Swap loop. A banner is never shown more often than its budget
//! allows, no matter how many threads race for the last show.
//!
//! ## Key Concepts
//!
//! * **Inventory**: Banners, their categories and their initial budgets. Loaded once,
//!   never mutated.
//! * **Ledger**: Remaining shows per banner. Lock-free.
//! * **Client History**: The last banner each client saw, so the same banner is not
//!   shown twice in a row when an alternative exists.
//! * **Selector**: Filters by category, budget and history, then picks uniformly at
//!   random and commits the show.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use shot_banner::BannerSelector;
//! use shot_banner::Inventory;
//!
//! let inventory: Inventory = "a.png;1;x\nb.png;1;x\nc.png;1\n".parse().unwrap();
//! let selector = BannerSelector::new(Arc::new(inventory));
//!
//! if let Some(banner) = selector.select(&["x"], "10.0.0.1").continue_value() {
//!     assert!(banner.as_ref() == "a.png" || banner.as_ref() == "b.png");
//! }
//! ```

use std::fmt::Debug;

mod history;
mod inventory;
mod ledger;
mod selector;

pub use history::ClientHistory;
pub use inventory::Banner;
pub use inventory::ConfigError;
pub use inventory::Inventory;
pub use ledger::Ledger;
pub use selector::BannerSelector;
pub use selector::DEFAULT_MAX_ATTEMPTS;

/// Reasons why no banner could be served.
///
/// All of them are a "not found" outcome for the caller. No state is mutated when a
/// selection ends with a `Reason`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    /// None of the requested categories has any banner registered.
    UnknownCategories,
    /// Every candidate banner has spent its show budget.
    Exhausted,
    /// Candidates kept running dry under concurrent requests until the retry cap.
    Contended { attempts: usize },
}

impl Reason {
    /// A short, stable label, suitable for logs and metric attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::UnknownCategories => "unknown_categories",
            Reason::Exhausted => "exhausted",
            Reason::Contended { .. } => "contended",
        }
    }
}

/// The random choice among eligible banners.
///
/// Pickers must be `Send` and `Sync` so a selector can be shared across threads
/// via `Arc`.
pub trait Picker: Debug {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Picks every index with equal probability, using the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformPicker;

impl Picker for UniformPicker {
    fn pick(&self, len: usize) -> usize {
        use rand::Rng;

        rand::rng().random_range(0..len)
    }
}
