//! Usage summary caching using Moka.
//!
//! Only undated budget usage and earmark usage are cached. Date-ranged
//! queries always recompute. The ledger write path invalidates every budget
//! and earmark it touches, inside the same critical section as the write.

use std::time::Duration;

use kassenwart_shared::{BudgetId, EarmarkId};
use moka::sync::Cache;

use super::types::{BudgetUsage, EarmarkUsage};

/// Default cache capacity (entries per cache).
const DEFAULT_CACHE_CAPACITY: u64 = 1_000;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Cache for budget and earmark usage summaries.
#[derive(Clone)]
pub struct UsageCache {
    budgets: Cache<BudgetId, BudgetUsage>,
    earmarks: Cache<EarmarkId, EarmarkUsage>,
}

impl UsageCache {
    /// Creates a cache with default settings.
    ///
    /// Default: 1000 entries per kind, 5 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and TTL.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let ttl = Duration::from_secs(ttl_secs);
        Self {
            budgets: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            earmarks: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Cached undated usage of a budget.
    #[must_use]
    pub fn budget(&self, budget_id: BudgetId) -> Option<BudgetUsage> {
        self.budgets.get(&budget_id)
    }

    /// Stores undated usage of a budget.
    pub fn put_budget(&self, usage: BudgetUsage) {
        self.budgets.insert(usage.budget_id, usage);
    }

    /// Cached usage of an earmark.
    #[must_use]
    pub fn earmark(&self, earmark_id: EarmarkId) -> Option<EarmarkUsage> {
        self.earmarks.get(&earmark_id)
    }

    /// Stores usage of an earmark.
    pub fn put_earmark(&self, usage: EarmarkUsage) {
        self.earmarks.insert(usage.earmark_id, usage);
    }

    /// Drops the cached entries of the given budgets and earmarks.
    pub fn invalidate<B, E>(&self, budgets: B, earmarks: E)
    where
        B: IntoIterator<Item = BudgetId>,
        E: IntoIterator<Item = EarmarkId>,
    {
        for id in budgets {
            self.budgets.invalidate(&id);
        }
        for id in earmarks {
            self.earmarks.invalidate(&id);
        }
    }

    /// Drops the cached entry of one budget.
    pub fn invalidate_budget(&self, budget_id: BudgetId) {
        self.budgets.invalidate(&budget_id);
    }

    /// Drops the cached entry of one earmark.
    pub fn invalidate_earmark(&self, earmark_id: EarmarkId) {
        self.earmarks.invalidate(&earmark_id);
    }

    /// Invalidates all cached entries.
    pub fn invalidate_all(&self) {
        self.budgets.invalidate_all();
        self.earmarks.invalidate_all();
    }

    /// Number of entries currently cached, both kinds combined.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.budgets.entry_count() + self.earmarks.entry_count()
    }

    /// Runs pending maintenance so counts and evictions are up to date.
    pub fn run_pending_tasks(&self) {
        self.budgets.run_pending_tasks();
        self.earmarks.run_pending_tasks();
    }
}

impl Default for UsageCache {
    fn default() -> Self {
        Self::new()
    }
}
