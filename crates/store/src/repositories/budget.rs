//! Budget repository with usage projections.

use kassenwart_core::budget::{
    Budget, BudgetError, BudgetService, CreateBudgetInput, UpdateBudgetInput,
};
use kassenwart_core::usage::{BudgetUsage, DateRange, UsageAggregator};
use kassenwart_core::voucher::Voucher;
use kassenwart_shared::BudgetId;
use tracing::{debug, info, warn};

use crate::store::Store;

/// Budget repository for CRUD operations and usage.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    store: Store,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    // ========================================================================
    // Budget CRUD Operations
    // ========================================================================

    /// Creates a new budget.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid year, amount or date range.
    pub async fn create(&self, input: CreateBudgetInput) -> Result<Budget, BudgetError> {
        let mut state = self.store.write().await;
        let budget = BudgetService::create(state.budget_ids.next_id(), input, self.store.now())?;
        state.budgets.insert(budget.id, budget.clone());

        info!(budget_id = %budget.id, year = budget.year, "Budget created");
        Ok(budget)
    }

    /// Gets a budget by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the budget does not exist.
    pub async fn get(&self, id: BudgetId) -> Result<Budget, BudgetError> {
        self.store
            .read()
            .await
            .budgets
            .get(&id)
            .cloned()
            .ok_or(BudgetError::NotFound(id))
    }

    /// Lists budgets ordered by year (newest first), then label.
    pub async fn list(&self, year: Option<i32>, include_archived: bool) -> Vec<Budget> {
        let state = self.store.read().await;
        let mut budgets: Vec<Budget> = state
            .budgets
            .values()
            .filter(|b| include_archived || !b.archived)
            .filter(|b| year.is_none_or(|y| b.year == y))
            .cloned()
            .collect();
        budgets.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| a.label().cmp(&b.label()))
                .then_with(|| a.id.cmp(&b.id))
        });
        budgets
    }

    /// Updates a budget. Archiving goes through here as well.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a validation error.
    pub async fn update(
        &self,
        id: BudgetId,
        input: UpdateBudgetInput,
    ) -> Result<Budget, BudgetError> {
        let mut state = self.store.write().await;
        let existing = state.budgets.get(&id).ok_or(BudgetError::NotFound(id))?;
        let budget = BudgetService::apply_update(existing, input, self.store.now())?;

        state.budgets.insert(id, budget.clone());
        self.store.cache().invalidate_budget(id);

        info!(budget_id = %id, archived = budget.archived, "Budget updated");
        Ok(budget)
    }

    /// Deletes a budget no voucher allocates to.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `InUse`.
    pub async fn delete(&self, id: BudgetId) -> Result<(), BudgetError> {
        let mut state = self.store.write().await;
        if !state.budgets.contains_key(&id) {
            return Err(BudgetError::NotFound(id));
        }
        let vouchers = state.budget_voucher_count(id);
        if vouchers > 0 {
            warn!(budget_id = %id, vouchers, "Budget delete rejected, still referenced");
            return Err(BudgetError::InUse {
                budget_id: id,
                vouchers,
            });
        }

        state.budgets.remove(&id);
        self.store.cache().invalidate_budget(id);
        info!(budget_id = %id, "Budget deleted");
        Ok(())
    }

    // ========================================================================
    // Usage
    // ========================================================================

    /// Usage of one budget, optionally restricted to a date window.
    ///
    /// Undated results are served from and written to the cache while the
    /// read lock is held.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the budget does not exist.
    pub async fn usage(&self, id: BudgetId, range: DateRange) -> Result<BudgetUsage, BudgetError> {
        let state = self.store.read().await;
        let budget = state.budgets.get(&id).ok_or(BudgetError::NotFound(id))?;

        if !range.is_unbounded() {
            return Ok(UsageAggregator::budget_usage(budget, state.vouchers.values(), range));
        }
        if let Some(usage) = self.store.cache().budget(id) {
            debug!(budget_id = %id, "Budget usage cache hit");
            return Ok(usage);
        }

        let usage = UsageAggregator::budget_usage(budget, state.vouchers.values(), range);
        self.store.cache().put_budget(usage);
        Ok(usage)
    }

    /// Usage of every non-archived budget, optionally of one year.
    pub async fn all_usage(&self, year: Option<i32>) -> Vec<BudgetUsage> {
        let state = self.store.read().await;
        let budgets: Vec<Budget> = state.budgets.values().cloned().collect();
        let vouchers: Vec<&Voucher> = state.vouchers.values().collect();

        let usage = UsageAggregator::all_budget_usage(&budgets, &vouchers, year);
        for u in &usage {
            self.store.cache().put_budget(*u);
        }
        debug!(budgets = usage.len(), year = ?year, "Computed usage for all budgets");
        usage
    }
}
