//! Cash advance repository.
//!
//! Resolution runs as one write-locked unit: precondition checks, the
//! counter voucher and the RESOLVED transition either all happen or none do.

use kassenwart_core::cash_advance::{
    AddPartialInput, CashAdvanceError, CashAdvanceFilter, CashAdvanceService, CashAdvanceView,
    CashAdvanceWarning, CreateCashAdvanceInput, PartialCashAdvance, ResolveInput,
    SettlePartialInput, UpdateCashAdvanceInput,
};
use kassenwart_core::voucher::{Classification, Voucher, VoucherReference, VoucherWarning};
use kassenwart_shared::{CashAdvanceId, CategoryId, ClassificationScheme, PartialId};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::state::LedgerState;
use crate::store::Store;

/// A new partial with the policy warnings it raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialWrite {
    /// Stored partial.
    pub partial: PartialCashAdvance,
    /// Non-blocking warnings.
    pub warnings: Vec<CashAdvanceWarning>,
}

/// Outcome of resolving an advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashAdvanceResolution {
    /// Resolved advance.
    pub advance: CashAdvanceView,
    /// `total - total_settled` at resolution.
    pub difference: Decimal,
    /// Compensating voucher, if one was created.
    pub counter_voucher: Option<Voucher>,
    /// Warnings raised by the counter voucher.
    pub warnings: Vec<VoucherWarning>,
}

/// Cash advance repository.
#[derive(Debug, Clone)]
pub struct CashAdvanceRepository {
    store: Store,
}

impl CashAdvanceRepository {
    /// Creates a new cash advance repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    // ========================================================================
    // Advances
    // ========================================================================

    /// Creates an open advance.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField`, `InvalidAmount` or `DuplicateOrderNo`.
    pub async fn create(
        &self,
        input: CreateCashAdvanceInput,
    ) -> Result<CashAdvanceView, CashAdvanceError> {
        let mut state = self.store.write().await;
        let id = state.cash_advance_ids.next_id();
        let advance = CashAdvanceService::create(id, input, self.store.now(), |order_no| {
            state.cash_advances.values().any(|a| a.order_no == order_no)
        })?;
        state.cash_advances.insert(id, advance.clone());

        info!(
            cash_advance_id = %id,
            order_no = %advance.order_no,
            total = %advance.total_amount,
            "Cash advance created"
        );
        Ok(CashAdvanceView::new(advance, self.store.today()))
    }

    /// Gets an advance with status and totals.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the advance does not exist.
    pub async fn get(&self, id: CashAdvanceId) -> Result<CashAdvanceView, CashAdvanceError> {
        let state = self.store.read().await;
        let advance = state
            .cash_advances
            .get(&id)
            .cloned()
            .ok_or(CashAdvanceError::NotFound(id))?;
        Ok(CashAdvanceView::new(advance, self.store.today()))
    }

    /// Lists advances, newest first.
    pub async fn list(&self, filter: &CashAdvanceFilter) -> Vec<CashAdvanceView> {
        let today = self.store.today();
        let state = self.store.read().await;
        state
            .cash_advances
            .values()
            .rev()
            .filter(|a| filter.matches(a, today))
            .cloned()
            .map(|a| CashAdvanceView::new(a, today))
            .collect()
    }

    /// Updates holder, purpose, due date or notes of an open advance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AlreadyResolved` or `EmptyField`.
    pub async fn update(
        &self,
        id: CashAdvanceId,
        input: UpdateCashAdvanceInput,
    ) -> Result<CashAdvanceView, CashAdvanceError> {
        let mut state = self.store.write().await;
        let existing = state
            .cash_advances
            .get(&id)
            .ok_or(CashAdvanceError::NotFound(id))?;
        let advance = CashAdvanceService::apply_update(existing, input, self.store.now())
            .inspect_err(|e| {
                warn!(cash_advance_id = %id, error = %e, "Cash advance update rejected");
            })?;
        state.cash_advances.insert(id, advance.clone());

        info!(cash_advance_id = %id, "Cash advance updated");
        Ok(CashAdvanceView::new(advance, self.store.today()))
    }

    /// Deletes an open advance without counter voucher.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AlreadyResolved` or `HasCounterVoucher`.
    pub async fn delete(&self, id: CashAdvanceId) -> Result<(), CashAdvanceError> {
        let mut state = self.store.write().await;
        let advance = state
            .cash_advances
            .get(&id)
            .ok_or(CashAdvanceError::NotFound(id))?;
        CashAdvanceService::check_delete(advance)
            .inspect_err(|e| {
                warn!(cash_advance_id = %id, error = %e, "Cash advance delete rejected");
            })?;
        state.cash_advances.remove(&id);

        info!(cash_advance_id = %id, "Cash advance deleted");
        Ok(())
    }

    // ========================================================================
    // Partials
    // ========================================================================

    /// Adds a partial to an open advance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AlreadyResolved`, `EmptyField`, `InvalidAmount`
    /// or, under the reject policy, `ExceedsPlannedRemaining`.
    pub async fn add_partial(
        &self,
        id: CashAdvanceId,
        input: AddPartialInput,
    ) -> Result<PartialWrite, CashAdvanceError> {
        let mut state = self.store.write().await;
        let partial_id = state.partial_ids.next_id();
        let advance = state
            .cash_advances
            .get(&id)
            .ok_or(CashAdvanceError::NotFound(id))?;
        let (partial, warnings) = CashAdvanceService::add_partial(
            advance,
            partial_id,
            input,
            self.store.today(),
            self.store.cash_advance_config(),
        )
        .inspect_err(|e| warn!(cash_advance_id = %id, error = %e, "Partial rejected"))?;

        if let Some(advance) = state.cash_advances.get_mut(&id) {
            advance.partials.push(partial.clone());
            advance.updated_at = self.store.now();
        }

        info!(
            cash_advance_id = %id,
            partial_id = %partial.id,
            amount = %partial.planned_amount,
            warnings = warnings.len(),
            "Partial added"
        );
        Ok(PartialWrite { partial, warnings })
    }

    /// Records the settlement of a partial.
    ///
    /// # Errors
    ///
    /// Returns `PartialNotFound`, `AlreadyResolved`, `PartialAlreadySettled`
    /// or `NegativeSettlement`.
    pub async fn settle_partial(
        &self,
        partial_id: PartialId,
        input: SettlePartialInput,
    ) -> Result<PartialCashAdvance, CashAdvanceError> {
        let mut state = self.store.write().await;
        let id = owner(&state, partial_id)?;
        let advance = state
            .cash_advances
            .get(&id)
            .ok_or(CashAdvanceError::NotFound(id))?;
        let settled =
            CashAdvanceService::settle_partial(advance, partial_id, input, self.store.today())
                .inspect_err(|e| {
                    warn!(partial_id = %partial_id, error = %e, "Settlement rejected");
                })?;

        if let Some(advance) = state.cash_advances.get_mut(&id) {
            if let Some(slot) = advance.partials.iter_mut().find(|p| p.id == partial_id) {
                *slot = settled.clone();
            }
            advance.updated_at = self.store.now();
        }

        info!(
            cash_advance_id = %id,
            partial_id = %partial_id,
            settled = %input.settled_amount,
            "Partial settled"
        );
        Ok(settled)
    }

    /// Removes a partial.
    ///
    /// # Errors
    ///
    /// Returns `PartialNotFound`, `AlreadyResolved` or, under the reject
    /// policy, `SettledPartialDeletionDenied`.
    pub async fn delete_partial(&self, partial_id: PartialId) -> Result<(), CashAdvanceError> {
        let mut state = self.store.write().await;
        let id = owner(&state, partial_id)?;
        let advance = state
            .cash_advances
            .get(&id)
            .ok_or(CashAdvanceError::NotFound(id))?;
        CashAdvanceService::check_delete_partial(
            advance,
            partial_id,
            self.store.cash_advance_config(),
        )
        .inspect_err(|e| warn!(partial_id = %partial_id, error = %e, "Partial delete rejected"))?;

        if let Some(advance) = state.cash_advances.get_mut(&id) {
            advance.partials.retain(|p| p.id != partial_id);
            advance.updated_at = self.store.now();
        }

        info!(cash_advance_id = %id, partial_id = %partial_id, "Partial deleted");
        Ok(())
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolves an advance, optionally booking the difference as a voucher.
    ///
    /// A second concurrent resolve waits for the first and then fails with
    /// `AlreadyResolved`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AlreadyResolved`, `UnsettledPartialsRemain`,
    /// `MissingCounterClassification` or `CounterVoucher` when the ledger
    /// rejects the compensating voucher.
    pub async fn resolve(
        &self,
        id: CashAdvanceId,
        input: ResolveInput,
    ) -> Result<CashAdvanceResolution, CashAdvanceError> {
        let mut state = self.store.write().await;
        self.resolve_locked(&mut state, id, input)
            .inspect_err(|e| warn!(cash_advance_id = %id, error = %e, "Resolution rejected"))
    }

    fn resolve_locked(
        &self,
        state: &mut LedgerState,
        id: CashAdvanceId,
        input: ResolveInput,
    ) -> Result<CashAdvanceResolution, CashAdvanceError> {
        let today = self.store.today();
        let now = self.store.now();
        let advance = state
            .cash_advances
            .get(&id)
            .ok_or(CashAdvanceError::NotFound(id))?;

        // 1. Preconditions and counter draft
        let classification = input
            .classification
            .or_else(|| self.default_classification());
        let plan = CashAdvanceService::plan_resolution(
            advance,
            input.create_counter_voucher,
            classification,
            today,
        )?;

        // 2. Counter voucher through the ledger
        let (counter_voucher, warnings) = match &plan.counter_voucher {
            Some(draft) => {
                let ctx = self.store.posting_context(state);
                let scheme = self.store.ledger_config().classification_scheme;
                let (voucher, warnings) =
                    state.insert_voucher(draft, scheme, &ctx, self.store.cache(), now)?;
                state
                    .references
                    .entry(voucher.id)
                    .or_default()
                    .insert(VoucherReference::CashAdvance(id));
                (Some(voucher), warnings)
            }
            None => (None, Vec::new()),
        };

        // 3. Terminal transition
        let advance = state
            .cash_advances
            .get(&id)
            .ok_or(CashAdvanceError::NotFound(id))?;
        let resolved =
            CashAdvanceService::resolve(advance, counter_voucher.as_ref().map(|v| v.id), now);
        state.cash_advances.insert(id, resolved.clone());

        info!(
            cash_advance_id = %id,
            difference = %plan.difference,
            counter_voucher_id = ?resolved.counter_voucher_id,
            "Cash advance resolved"
        );
        Ok(CashAdvanceResolution {
            advance: CashAdvanceView::new(resolved, today),
            difference: plan.difference,
            counter_voucher,
            warnings,
        })
    }

    /// Classification for counter vouchers when the caller supplies none.
    fn default_classification(&self) -> Option<Classification> {
        let ledger = self.store.ledger_config();
        match ledger.classification_scheme {
            ClassificationScheme::Spheres => {
                self.store.default_sphere().map(Classification::Sphere)
            }
            ClassificationScheme::Categories => ledger
                .counter_voucher_category
                .map(|raw| Classification::Category(CategoryId::new(raw))),
        }
    }
}

fn owner(state: &LedgerState, partial_id: PartialId) -> Result<CashAdvanceId, CashAdvanceError> {
    state
        .advance_of_partial(partial_id)
        .ok_or(CashAdvanceError::PartialNotFound(partial_id))
}
