//! Ledger state guarded by the store lock.
//!
//! Every method that mutates vouchers runs the full validation pipeline
//! first and only then touches the maps, so a failed call leaves the state
//! exactly as it was.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use kassenwart_core::budget::Budget;
use kassenwart_core::cash_advance::CashAdvance;
use kassenwart_core::earmark::Earmark;
use kassenwart_core::usage::{DateRange, UsageAggregator, UsageCache};
use kassenwart_core::voucher::{
    PostingContext, Voucher, VoucherDraft, VoucherError, VoucherPatch, VoucherReference,
    VoucherService, VoucherWarning,
};
use kassenwart_shared::{
    BudgetId, CashAdvanceId, ClassificationScheme, EarmarkId, IdSequence, PartialId, VoucherId,
};

/// All persisted records plus id and number sequences.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    pub(crate) vouchers: BTreeMap<VoucherId, Voucher>,
    pub(crate) budgets: BTreeMap<BudgetId, Budget>,
    pub(crate) earmarks: BTreeMap<EarmarkId, Earmark>,
    pub(crate) cash_advances: BTreeMap<CashAdvanceId, CashAdvance>,
    pub(crate) references: HashMap<VoucherId, HashSet<VoucherReference>>,
    pub(crate) locked_until: Option<NaiveDate>,
    pub(crate) budget_ids: IdSequence,
    pub(crate) earmark_ids: IdSequence,
    pub(crate) cash_advance_ids: IdSequence,
    pub(crate) partial_ids: IdSequence,
    voucher_ids: IdSequence,
    year_sequences: HashMap<i32, u32>,
}

impl LedgerState {
    pub(crate) fn new(locked_until: Option<NaiveDate>) -> Self {
        Self {
            locked_until,
            ..Self::default()
        }
    }

    /// Validates and inserts a voucher, assigning id and number.
    pub(crate) fn insert_voucher(
        &mut self,
        draft: &VoucherDraft,
        scheme: ClassificationScheme,
        ctx: &PostingContext,
        cache: &UsageCache,
        now: DateTime<Utc>,
    ) -> Result<(Voucher, Vec<VoucherWarning>), VoucherError> {
        let prepared = VoucherService::prepare(
            draft,
            scheme,
            ctx,
            |id| self.budgets.get(&id),
            |id| self.earmarks.get(&id),
        )?;

        let id = self.voucher_ids.next_id();
        let voucher_no = self.next_voucher_no(prepared.date.year());
        let (voucher, mut warnings) = prepared.into_new(id, voucher_no, now);

        self.vouchers.insert(id, voucher.clone());
        cache.invalidate(voucher.budget_ids(), voucher.earmark_ids());

        warnings.extend(self.remaining_warnings(&voucher));
        Ok((voucher, warnings))
    }

    /// Validates a patch and replaces the stored voucher.
    pub(crate) fn update_voucher(
        &mut self,
        id: VoucherId,
        patch: &VoucherPatch,
        scheme: ClassificationScheme,
        ctx: &PostingContext,
        cache: &UsageCache,
        now: DateTime<Utc>,
    ) -> Result<(Voucher, Vec<VoucherWarning>), VoucherError> {
        let existing = self.vouchers.get(&id).ok_or(VoucherError::NotFound(id))?;
        let prepared = VoucherService::prepare_update(
            existing,
            patch,
            scheme,
            ctx,
            |id| self.budgets.get(&id),
            |id| self.earmarks.get(&id),
        )?;

        let stale_budgets: Vec<BudgetId> = existing.budget_ids().collect();
        let stale_earmarks: Vec<EarmarkId> = existing.earmark_ids().collect();
        let (voucher, mut warnings) = prepared.into_update(existing, now);

        self.vouchers.insert(id, voucher.clone());
        cache.invalidate(
            stale_budgets.into_iter().chain(voucher.budget_ids()),
            stale_earmarks.into_iter().chain(voucher.earmark_ids()),
        );

        warnings.extend(self.remaining_warnings(&voucher));
        Ok((voucher, warnings))
    }

    /// Removes an unreferenced voucher outside the locked period.
    pub(crate) fn delete_voucher(
        &mut self,
        id: VoucherId,
        ctx: &PostingContext,
        cache: &UsageCache,
    ) -> Result<Voucher, VoucherError> {
        let voucher = self.vouchers.get(&id).ok_or(VoucherError::NotFound(id))?;
        VoucherService::check_delete(voucher, self.reference_count(id), ctx)?;

        let voucher = self.vouchers.remove(&id).ok_or(VoucherError::NotFound(id))?;
        self.references.remove(&id);
        cache.invalidate(voucher.budget_ids(), voucher.earmark_ids());
        Ok(voucher)
    }

    pub(crate) fn reference_count(&self, id: VoucherId) -> usize {
        self.references.get(&id).map_or(0, HashSet::len)
    }

    /// Number of vouchers allocating to a budget.
    pub(crate) fn budget_voucher_count(&self, budget_id: BudgetId) -> usize {
        self.vouchers
            .values()
            .filter(|v| v.budget_ids().any(|id| id == budget_id))
            .count()
    }

    /// Number of vouchers allocating to an earmark.
    pub(crate) fn earmark_voucher_count(&self, earmark_id: EarmarkId) -> usize {
        self.vouchers
            .values()
            .filter(|v| v.earmark_ids().any(|id| id == earmark_id))
            .count()
    }

    /// Advance owning a partial.
    pub(crate) fn advance_of_partial(&self, partial_id: PartialId) -> Option<CashAdvanceId> {
        self.cash_advances
            .values()
            .find(|a| a.partial(partial_id).is_some())
            .map(|a| a.id)
    }

    fn next_voucher_no(&mut self, year: i32) -> String {
        let seq = self.year_sequences.entry(year).or_insert(0);
        *seq += 1;
        VoucherService::format_voucher_no(year, *seq)
    }

    fn remaining_warnings(&self, voucher: &Voucher) -> Vec<VoucherWarning> {
        let budgets = voucher.budget_ids().filter_map(|id| self.budgets.get(&id)).map(|b| {
            let usage =
                UsageAggregator::budget_usage(b, self.vouchers.values(), DateRange::default());
            (b.id, usage.remaining)
        });
        let earmarks = voucher.earmark_ids().filter_map(|id| self.earmarks.get(&id)).map(|e| {
            let usage = UsageAggregator::earmark_usage(e, self.vouchers.values());
            (e.id, usage.remaining)
        });
        VoucherService::remaining_warnings(budgets, earmarks)
    }
}
