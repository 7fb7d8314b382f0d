//! Voucher ledger service: the validation pipeline behind create and update.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use kassenwart_shared::{BudgetId, ClassificationScheme, EarmarkId, VoucherId};
use rust_decimal::Decimal;

use super::draft::{AmountPatch, VoucherDraft, VoucherPatch};
use super::error::VoucherError;
use super::types::{
    Classification, Payment, PostingContext, TermAssignment, Voucher, VoucherType, VoucherWarning,
};
use crate::allocation::{AllocationValidator, BudgetAllocation, EarmarkAllocation};
use crate::amount::{AmountCalculator, AmountInput, Amounts, TaxMode};
use crate::budget::Budget;
use crate::earmark::Earmark;

/// A draft that passed every check and is ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedVoucher {
    /// Direction.
    pub voucher_type: VoucherType,
    /// Booking date.
    pub date: NaiveDate,
    /// Sphere or category.
    pub classification: Classification,
    /// Payment method or transfer direction.
    pub payment: Payment,
    /// Derived amounts.
    pub amounts: Amounts,
    /// Description.
    pub description: String,
    /// Budget allocations with non-positive entries removed.
    pub budgets: Vec<BudgetAllocation>,
    /// Earmark allocations with non-positive entries removed.
    pub earmarks: Vec<EarmarkAllocation>,
    /// Normalized tags.
    pub tags: BTreeSet<String>,
    /// Taxonomy terms.
    pub terms: Vec<TermAssignment>,
    /// Warnings found while validating.
    pub warnings: Vec<VoucherWarning>,
}

impl PreparedVoucher {
    /// Builds a new voucher record.
    #[must_use]
    pub fn into_new(
        self,
        id: VoucherId,
        voucher_no: String,
        now: DateTime<Utc>,
    ) -> (Voucher, Vec<VoucherWarning>) {
        let voucher = Voucher {
            id,
            voucher_no,
            voucher_type: self.voucher_type,
            date: self.date,
            classification: self.classification,
            payment: self.payment,
            amounts: self.amounts,
            description: self.description,
            budgets: self.budgets,
            earmarks: self.earmarks,
            tags: self.tags,
            terms: self.terms,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        (voucher, self.warnings)
    }

    /// Builds the next version of `existing`. Id, number and creation time are kept.
    #[must_use]
    pub fn into_update(
        self,
        existing: &Voucher,
        now: DateTime<Utc>,
    ) -> (Voucher, Vec<VoucherWarning>) {
        let voucher = Voucher {
            id: existing.id,
            voucher_no: existing.voucher_no.clone(),
            voucher_type: self.voucher_type,
            date: self.date,
            classification: self.classification,
            payment: self.payment,
            amounts: self.amounts,
            description: self.description,
            budgets: self.budgets,
            earmarks: self.earmarks,
            tags: self.tags,
            terms: self.terms,
            version: existing.version.saturating_add(1),
            created_at: existing.created_at,
            updated_at: now,
        };
        (voucher, self.warnings)
    }
}

/// Voucher ledger business logic.
pub struct VoucherService;

impl VoucherService {
    /// Formats a voucher number as `<year>-<seq:05>`.
    #[must_use]
    pub fn format_voucher_no(year: i32, seq: u32) -> String {
        format!("{year}-{seq:05}")
    }

    /// Validates a draft and derives everything that gets persisted.
    ///
    /// Pipeline:
    /// 1. Derives amounts from the tax mode
    /// 2. Checks the classification against the configured scheme
    /// 3. Checks the transfer direction
    /// 4. Checks taxonomy uniqueness
    /// 5. Validates both allocation lists against the gross amount
    /// 6. Resolves every referenced budget and earmark
    /// 7. Checks enforced budget time ranges
    /// 8. Checks the period lock
    ///
    /// # Errors
    ///
    /// Returns the first `VoucherError` encountered. Nothing is persisted here.
    pub fn prepare<'a, B, E>(
        draft: &VoucherDraft,
        scheme: ClassificationScheme,
        ctx: &PostingContext,
        budget_lookup: B,
        earmark_lookup: E,
    ) -> Result<PreparedVoucher, VoucherError>
    where
        B: Fn(BudgetId) -> Option<&'a Budget>,
        E: Fn(EarmarkId) -> Option<&'a Earmark>,
    {
        let voucher_type = draft.voucher_type();

        // 1. Amounts
        let amounts = match draft {
            VoucherDraft::Income(entry) | VoucherDraft::Expense(entry) => {
                AmountCalculator::calculate(&entry.amount)?
            }
            VoucherDraft::Transfer(transfer) => AmountCalculator::transfer(transfer.amount)?,
        };

        let (date, classification, description, tags, terms, budgets, earmarks) = match draft {
            VoucherDraft::Income(e) | VoucherDraft::Expense(e) => (
                e.date,
                e.classification,
                &e.description,
                &e.tags,
                &e.terms,
                e.budgets.as_slice(),
                e.earmarks.as_slice(),
            ),
            VoucherDraft::Transfer(t) => (
                t.date,
                t.classification,
                &t.description,
                &t.tags,
                &t.terms,
                [].as_slice(),
                [].as_slice(),
            ),
        };

        // 2. Classification scheme
        Self::check_classification(classification, scheme)?;

        // 3. Payment / transfer direction
        let payment = match draft {
            VoucherDraft::Income(e) | VoucherDraft::Expense(e) => Payment::Method(e.payment_method),
            VoucherDraft::Transfer(t) => match (t.transfer_from, t.transfer_to) {
                (Some(from), Some(to)) if from == to => {
                    return Err(VoucherError::SameTransferDirection);
                }
                (Some(from), Some(to)) => Payment::Transfer { from, to },
                _ => return Err(VoucherError::MissingTransferDirection),
            },
        };

        // 4. Taxonomy uniqueness
        let mut taxonomies = HashSet::with_capacity(terms.len());
        for term in terms {
            if !taxonomies.insert(term.taxonomy_id) {
                return Err(VoucherError::DuplicateTaxonomy(term.taxonomy_id));
            }
        }

        // 5. Allocation lists
        AllocationValidator::validate(budgets, amounts.gross_amount)
            .map_err(VoucherError::BudgetAllocation)?;
        AllocationValidator::validate(earmarks, amounts.gross_amount)
            .map_err(VoucherError::EarmarkAllocation)?;
        let budgets = AllocationValidator::normalize(budgets);
        let earmarks = AllocationValidator::normalize(earmarks);

        // 6. Referenced budgets and earmarks, 7. time ranges
        let mut warnings = Vec::new();
        for allocation in &budgets {
            let budget = budget_lookup(allocation.budget_id)
                .ok_or(VoucherError::UnknownBudget(allocation.budget_id))?;
            if !budget.accepts_date(date) {
                return Err(VoucherError::OutsideBudgetRange {
                    budget_id: budget.id,
                    date,
                    start: budget.start_date,
                    end: budget.end_date,
                });
            }
            if budget.archived {
                warnings.push(VoucherWarning::ArchivedBudget { budget_id: budget.id });
            }
        }
        for allocation in &earmarks {
            let earmark = earmark_lookup(allocation.earmark_id)
                .ok_or(VoucherError::UnknownEarmark(allocation.earmark_id))?;
            if earmark.archived {
                warnings.push(VoucherWarning::ArchivedEarmark { earmark_id: earmark.id });
            }
        }

        // 8. Period lock
        Self::check_unlocked(date, ctx)?;

        Ok(PreparedVoucher {
            voucher_type,
            date,
            classification,
            payment,
            amounts,
            description: description.trim().to_string(),
            budgets,
            earmarks,
            tags: Self::normalize_tags(tags),
            terms: terms.clone(),
            warnings,
        })
    }

    /// Validates an update of `existing` with `patch`.
    ///
    /// Checks the expected version and the lock on the current date before
    /// running the regular pipeline on the merged draft.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentModification`, `PeriodLocked` or any pipeline error.
    pub fn prepare_update<'a, B, E>(
        existing: &Voucher,
        patch: &VoucherPatch,
        scheme: ClassificationScheme,
        ctx: &PostingContext,
        budget_lookup: B,
        earmark_lookup: E,
    ) -> Result<PreparedVoucher, VoucherError>
    where
        B: Fn(BudgetId) -> Option<&'a Budget>,
        E: Fn(EarmarkId) -> Option<&'a Earmark>,
    {
        if let Some(expected) = patch.expected_version
            && expected != existing.version
        {
            return Err(VoucherError::ConcurrentModification {
                expected,
                actual: existing.version,
            });
        }

        Self::check_unlocked(existing.date, ctx)?;

        let draft = Self::merge_patch(existing, patch)?;
        Self::prepare(&draft, scheme, ctx, budget_lookup, earmark_lookup)
    }

    /// Applies a patch on top of the draft rebuilt from `existing`.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotApplicable` for fields the voucher type does not have
    /// and `InvalidTaxMode` for NET amounts on transfers.
    pub fn merge_patch(
        existing: &Voucher,
        patch: &VoucherPatch,
    ) -> Result<VoucherDraft, VoucherError> {
        let mut draft = VoucherDraft::from_voucher(existing);

        match &mut draft {
            VoucherDraft::Income(entry) | VoucherDraft::Expense(entry) => {
                if patch.transfer_from.is_some() {
                    return Err(VoucherError::FieldNotApplicable("transfer_from"));
                }
                if patch.transfer_to.is_some() {
                    return Err(VoucherError::FieldNotApplicable("transfer_to"));
                }
                if let Some(date) = patch.date {
                    entry.date = date;
                }
                if let Some(classification) = patch.classification {
                    entry.classification = classification;
                }
                if let Some(method) = patch.payment_method {
                    entry.payment_method = method;
                }
                match patch.amount {
                    Some(AmountPatch::Set { input }) => entry.amount = input,
                    Some(AmountPatch::SwitchMode { mode, vat_rate }) => {
                        entry.amount =
                            AmountCalculator::switch_mode(&existing.amounts, mode, vat_rate);
                    }
                    None => {}
                }
                if let Some(description) = &patch.description {
                    entry.description.clone_from(description);
                }
                if let Some(budgets) = &patch.budgets {
                    entry.budgets.clone_from(budgets);
                }
                if let Some(earmarks) = &patch.earmarks {
                    entry.earmarks.clone_from(earmarks);
                }
                if let Some(tags) = &patch.tags {
                    entry.tags.clone_from(tags);
                }
                if let Some(terms) = &patch.terms {
                    entry.terms.clone_from(terms);
                }
            }
            VoucherDraft::Transfer(transfer) => {
                if patch.payment_method.is_some() {
                    return Err(VoucherError::FieldNotApplicable("payment_method"));
                }
                if patch.budgets.as_ref().is_some_and(|b| !b.is_empty()) {
                    return Err(VoucherError::FieldNotApplicable("budgets"));
                }
                if patch.earmarks.as_ref().is_some_and(|e| !e.is_empty()) {
                    return Err(VoucherError::FieldNotApplicable("earmarks"));
                }
                if let Some(date) = patch.date {
                    transfer.date = date;
                }
                if let Some(classification) = patch.classification {
                    transfer.classification = classification;
                }
                if patch.transfer_from.is_some() {
                    transfer.transfer_from = patch.transfer_from;
                }
                if patch.transfer_to.is_some() {
                    transfer.transfer_to = patch.transfer_to;
                }
                match patch.amount {
                    Some(AmountPatch::Set {
                        input: AmountInput::Gross { gross },
                    }) => transfer.amount = gross,
                    Some(
                        AmountPatch::Set {
                            input: AmountInput::Net { .. },
                        }
                        | AmountPatch::SwitchMode {
                            mode: TaxMode::Net, ..
                        },
                    ) => return Err(VoucherError::InvalidTaxMode),
                    Some(AmountPatch::SwitchMode {
                        mode: TaxMode::Gross, ..
                    })
                    | None => {}
                }
                if let Some(description) = &patch.description {
                    transfer.description.clone_from(description);
                }
                if let Some(tags) = &patch.tags {
                    transfer.tags.clone_from(tags);
                }
                if let Some(terms) = &patch.terms {
                    transfer.terms.clone_from(terms);
                }
            }
        }

        Ok(draft)
    }

    /// Validates that a voucher can be deleted.
    ///
    /// # Errors
    ///
    /// Returns `ReferencedElsewhere` while references exist and
    /// `PeriodLocked` for a locked date.
    pub fn check_delete(
        voucher: &Voucher,
        references: usize,
        ctx: &PostingContext,
    ) -> Result<(), VoucherError> {
        if references > 0 {
            return Err(VoucherError::ReferencedElsewhere {
                voucher_id: voucher.id,
                references,
            });
        }
        Self::check_unlocked(voucher.date, ctx)
    }

    /// Rejects dates on or before the lock date.
    ///
    /// # Errors
    ///
    /// Returns `VoucherError::PeriodLocked`.
    pub fn check_unlocked(date: NaiveDate, ctx: &PostingContext) -> Result<(), VoucherError> {
        match ctx.locked_until {
            Some(locked_until) if date <= locked_until => {
                Err(VoucherError::PeriodLocked { date, locked_until })
            }
            _ => Ok(()),
        }
    }

    /// Warnings for budgets and earmarks whose remaining amount went negative.
    #[must_use]
    pub fn remaining_warnings<B, E>(
        budget_remaining: B,
        earmark_remaining: E,
    ) -> Vec<VoucherWarning>
    where
        B: IntoIterator<Item = (BudgetId, Decimal)>,
        E: IntoIterator<Item = (EarmarkId, Decimal)>,
    {
        let budgets = budget_remaining
            .into_iter()
            .filter(|(_, remaining)| *remaining < Decimal::ZERO)
            .map(|(budget_id, remaining)| VoucherWarning::BudgetOverrun { budget_id, remaining });
        let earmarks = earmark_remaining
            .into_iter()
            .filter(|(_, remaining)| *remaining < Decimal::ZERO)
            .map(|(earmark_id, remaining)| VoucherWarning::EarmarkOverdrawn {
                earmark_id,
                remaining,
            });
        budgets.chain(earmarks).collect()
    }

    fn check_classification(
        classification: Classification,
        scheme: ClassificationScheme,
    ) -> Result<(), VoucherError> {
        match (classification, scheme) {
            (Classification::Sphere(_), ClassificationScheme::Spheres)
            | (Classification::Category(_), ClassificationScheme::Categories) => Ok(()),
            _ => Err(VoucherError::ClassificationMismatch { expected: scheme }),
        }
    }

    fn normalize_tags(tags: &BTreeSet<String>) -> BTreeSet<String> {
        tags.iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::VatRate;
    use crate::voucher::draft::{EntryDraft, TransferDraft};
    use crate::voucher::types::{PaymentMethod, Sphere};
    use kassenwart_shared::{CategoryId, TaxonomyId, TermId};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx() -> PostingContext {
        PostingContext::new(date(2025, 6, 1), None)
    }

    fn budget(id: i64) -> Budget {
        let now = Utc::now();
        Budget {
            id: BudgetId::new(id),
            year: 2025,
            planned_amount: dec!(1000),
            name: None,
            category_name: None,
            project: None,
            start_date: None,
            end_date: None,
            enforce_time_range: false,
            color: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn earmark(id: i64) -> Earmark {
        let now = Utc::now();
        Earmark {
            id: EarmarkId::new(id),
            code: format!("ZB-{id}"),
            name: "Fonds".into(),
            budget_amount: dec!(500),
            color: None,
            description: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(amount: AmountInput) -> EntryDraft {
        EntryDraft {
            date: date(2025, 2, 1),
            classification: Classification::Sphere(Sphere::Ideell),
            payment_method: PaymentMethod::Bank,
            amount,
            description: "Material".into(),
            budgets: vec![],
            earmarks: vec![],
            tags: BTreeSet::new(),
            terms: vec![],
        }
    }

    fn gross(value: Decimal) -> AmountInput {
        AmountInput::Gross { gross: value }
    }

    fn transfer() -> TransferDraft {
        TransferDraft {
            date: date(2025, 2, 1),
            classification: Classification::Sphere(Sphere::Ideell),
            transfer_from: Some(PaymentMethod::Bar),
            transfer_to: Some(PaymentMethod::Bank),
            amount: dec!(300),
            description: "Einzahlung".into(),
            tags: BTreeSet::new(),
            terms: vec![],
        }
    }

    fn prepare_with(
        draft: &VoucherDraft,
        budgets: &[Budget],
        earmarks: &[Earmark],
        ctx: &PostingContext,
    ) -> Result<PreparedVoucher, VoucherError> {
        VoucherService::prepare(
            draft,
            ClassificationScheme::Spheres,
            ctx,
            |id| budgets.iter().find(|b| b.id == id),
            |id| earmarks.iter().find(|e| e.id == id),
        )
    }

    fn prepare(draft: &VoucherDraft) -> Result<PreparedVoucher, VoucherError> {
        prepare_with(draft, &[budget(1), budget(2)], &[earmark(1)], &ctx())
    }

    fn stored(prepared: PreparedVoucher) -> Voucher {
        prepared
            .into_new(VoucherId::new(1), VoucherService::format_voucher_no(2025, 1), Utc::now())
            .0
    }

    #[test]
    fn test_format_voucher_no() {
        assert_eq!(VoucherService::format_voucher_no(2025, 42), "2025-00042");
        assert_eq!(VoucherService::format_voucher_no(2024, 123_456), "2024-123456");
    }

    #[test]
    fn test_net_expense_scenario() {
        let draft = VoucherDraft::Expense(entry(AmountInput::Net {
            net: dec!(100),
            vat_rate: VatRate::Standard,
        }));
        let prepared = prepare(&draft).unwrap();
        assert_eq!(prepared.amounts.gross_amount, dec!(119.00));
        assert_eq!(prepared.amounts.vat_amount, dec!(19.00));
        assert_eq!(prepared.voucher_type, VoucherType::Out);
        assert_eq!(prepared.payment, Payment::Method(PaymentMethod::Bank));
    }

    #[test]
    fn test_duplicate_budget_allocation() {
        let mut e = entry(gross(dec!(100)));
        e.budgets = vec![
            BudgetAllocation {
                budget_id: BudgetId::new(1),
                amount: dec!(60),
            },
            BudgetAllocation {
                budget_id: BudgetId::new(1),
                amount: dec!(40),
            },
        ];
        assert_eq!(
            prepare(&VoucherDraft::Expense(e)),
            Err(VoucherError::BudgetAllocation(
                crate::allocation::AllocationError::DuplicateTarget(1)
            ))
        );
    }

    #[test]
    fn test_budget_sum_exceeds_total() {
        let mut e = entry(gross(dec!(100)));
        e.budgets = vec![
            BudgetAllocation {
                budget_id: BudgetId::new(1),
                amount: dec!(70),
            },
            BudgetAllocation {
                budget_id: BudgetId::new(2),
                amount: dec!(40),
            },
        ];
        assert_eq!(
            prepare(&VoucherDraft::Expense(e)),
            Err(VoucherError::BudgetAllocation(
                crate::allocation::AllocationError::SumExceedsTotal {
                    sum: dec!(110),
                    total: dec!(100)
                }
            ))
        );
    }

    #[test]
    fn test_zero_allocations_are_dropped() {
        let mut e = entry(gross(dec!(100)));
        e.budgets = vec![
            BudgetAllocation {
                budget_id: BudgetId::new(1),
                amount: dec!(100),
            },
            BudgetAllocation {
                budget_id: BudgetId::new(99),
                amount: dec!(0),
            },
        ];
        let prepared = prepare(&VoucherDraft::Expense(e)).unwrap();
        assert_eq!(prepared.budgets.len(), 1);
    }

    #[test]
    fn test_unknown_references() {
        let mut e = entry(gross(dec!(100)));
        e.budgets = vec![BudgetAllocation {
            budget_id: BudgetId::new(9),
            amount: dec!(10),
        }];
        assert_eq!(
            prepare(&VoucherDraft::Income(e)),
            Err(VoucherError::UnknownBudget(BudgetId::new(9)))
        );

        let mut e = entry(gross(dec!(100)));
        e.earmarks = vec![EarmarkAllocation {
            earmark_id: EarmarkId::new(9),
            amount: dec!(10),
        }];
        assert_eq!(
            prepare(&VoucherDraft::Income(e)),
            Err(VoucherError::UnknownEarmark(EarmarkId::new(9)))
        );
    }

    #[test]
    fn test_enforced_budget_range_rejects_date() {
        let mut enforced = budget(1);
        enforced.enforce_time_range = true;
        enforced.start_date = Some(date(2025, 1, 1));
        enforced.end_date = Some(date(2025, 3, 31));

        let mut e = entry(gross(dec!(50)));
        e.date = date(2025, 4, 1);
        e.budgets = vec![BudgetAllocation {
            budget_id: BudgetId::new(1),
            amount: dec!(50),
        }];

        let result = prepare_with(
            &VoucherDraft::Expense(e.clone()),
            &[enforced.clone()],
            &[],
            &ctx(),
        );
        assert!(matches!(result, Err(VoucherError::OutsideBudgetRange { .. })));

        e.date = date(2025, 3, 31);
        assert!(prepare_with(&VoucherDraft::Expense(e), &[enforced], &[], &ctx()).is_ok());
    }

    #[test]
    fn test_classification_scheme_mismatch() {
        let mut e = entry(gross(dec!(10)));
        e.classification = Classification::Category(CategoryId::new(4));
        assert_eq!(
            prepare(&VoucherDraft::Income(e.clone())),
            Err(VoucherError::ClassificationMismatch {
                expected: ClassificationScheme::Spheres
            })
        );

        let result = VoucherService::prepare(
            &VoucherDraft::Income(e),
            ClassificationScheme::Categories,
            &ctx(),
            |_| None,
            |_| None,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_transfer_direction_checks() {
        let mut t = transfer();
        t.transfer_to = Some(PaymentMethod::Bar);
        assert_eq!(
            prepare(&VoucherDraft::Transfer(t)),
            Err(VoucherError::SameTransferDirection)
        );

        let mut t = transfer();
        t.transfer_from = None;
        assert_eq!(
            prepare(&VoucherDraft::Transfer(t)),
            Err(VoucherError::MissingTransferDirection)
        );

        let prepared = prepare(&VoucherDraft::Transfer(transfer())).unwrap();
        assert_eq!(prepared.amounts.vat_amount, Decimal::ZERO);
        assert_eq!(prepared.amounts.gross_amount, dec!(300));
    }

    #[test]
    fn test_duplicate_taxonomy() {
        let mut e = entry(gross(dec!(10)));
        e.terms = vec![
            TermAssignment { taxonomy_id: TaxonomyId::new(1), term_id: TermId::new(1) },
            TermAssignment { taxonomy_id: TaxonomyId::new(1), term_id: TermId::new(2) },
        ];
        assert_eq!(
            prepare(&VoucherDraft::Income(e)),
            Err(VoucherError::DuplicateTaxonomy(TaxonomyId::new(1)))
        );
    }

    #[test]
    fn test_period_lock_on_create() {
        let locked = PostingContext::new(date(2025, 6, 1), Some(date(2025, 2, 1)));
        let result = prepare_with(&VoucherDraft::Income(entry(gross(dec!(10)))), &[], &[], &locked);
        assert_eq!(
            result,
            Err(VoucherError::PeriodLocked {
                date: date(2025, 2, 1),
                locked_until: date(2025, 2, 1)
            })
        );
    }

    #[test]
    fn test_archived_targets_warn() {
        let mut archived = budget(1);
        archived.archived = true;
        let mut archived_earmark = earmark(1);
        archived_earmark.archived = true;

        let mut e = entry(gross(dec!(10)));
        e.budgets = vec![BudgetAllocation {
            budget_id: BudgetId::new(1),
            amount: dec!(10),
        }];
        e.earmarks = vec![EarmarkAllocation {
            earmark_id: EarmarkId::new(1),
            amount: dec!(10),
        }];

        let prepared = prepare_with(
            &VoucherDraft::Expense(e),
            &[archived],
            &[archived_earmark],
            &ctx(),
        )
        .unwrap();
        assert_eq!(
            prepared.warnings,
            vec![
                VoucherWarning::ArchivedBudget { budget_id: BudgetId::new(1) },
                VoucherWarning::ArchivedEarmark { earmark_id: EarmarkId::new(1) },
            ]
        );
    }

    #[test]
    fn test_update_version_conflict() {
        let voucher = stored(prepare(&VoucherDraft::Income(entry(gross(dec!(10))))).unwrap());
        let patch = VoucherPatch {
            expected_version: Some(3),
            ..VoucherPatch::default()
        };
        let result = VoucherService::prepare_update(
            &voucher,
            &patch,
            ClassificationScheme::Spheres,
            &ctx(),
            |_| None,
            |_| None,
        );
        assert_eq!(
            result,
            Err(VoucherError::ConcurrentModification { expected: 3, actual: 1 })
        );
    }

    #[test]
    fn test_update_locked_by_old_date() {
        let voucher = stored(prepare(&VoucherDraft::Income(entry(gross(dec!(10))))).unwrap());
        let locked = PostingContext::new(date(2025, 6, 1), Some(date(2025, 3, 1)));
        let patch = VoucherPatch {
            date: Some(date(2025, 5, 1)),
            ..VoucherPatch::default()
        };
        let result = VoucherService::prepare_update(
            &voucher,
            &patch,
            ClassificationScheme::Spheres,
            &locked,
            |_| None,
            |_| None,
        );
        assert!(matches!(result, Err(VoucherError::PeriodLocked { .. })));
    }

    #[test]
    fn test_update_switches_tax_mode() {
        let voucher = stored(
            prepare(&VoucherDraft::Expense(entry(AmountInput::Net {
                net: dec!(100),
                vat_rate: VatRate::Standard,
            })))
            .unwrap(),
        );
        let patch = VoucherPatch {
            amount: Some(AmountPatch::SwitchMode { mode: TaxMode::Gross, vat_rate: None }),
            ..VoucherPatch::default()
        };
        let prepared = VoucherService::prepare_update(
            &voucher,
            &patch,
            ClassificationScheme::Spheres,
            &ctx(),
            |_| None,
            |_| None,
        )
        .unwrap();
        assert_eq!(prepared.amounts.tax_mode, TaxMode::Gross);
        assert_eq!(prepared.amounts.gross_amount, dec!(119.00));

        let (updated, _) = prepared.into_update(&voucher, Utc::now());
        assert_eq!(updated.version, 2);
        assert_eq!(updated.voucher_no, voucher.voucher_no);
    }

    #[test]
    fn test_transfer_patch_rejects_net_amount() {
        let voucher = stored(prepare(&VoucherDraft::Transfer(transfer())).unwrap());
        let patch = VoucherPatch {
            amount: Some(AmountPatch::Set {
                input: AmountInput::Net { net: dec!(1), vat_rate: VatRate::Zero },
            }),
            ..VoucherPatch::default()
        };
        assert_eq!(
            VoucherService::merge_patch(&voucher, &patch),
            Err(VoucherError::InvalidTaxMode)
        );

        let patch = VoucherPatch {
            payment_method: Some(PaymentMethod::Bar),
            ..VoucherPatch::default()
        };
        assert_eq!(
            VoucherService::merge_patch(&voucher, &patch),
            Err(VoucherError::FieldNotApplicable("payment_method"))
        );
    }

    #[test]
    fn test_delete_blocked_by_reference_and_lock() {
        let voucher = stored(prepare(&VoucherDraft::Income(entry(gross(dec!(10))))).unwrap());
        assert!(matches!(
            VoucherService::check_delete(&voucher, 1, &ctx()),
            Err(VoucherError::ReferencedElsewhere { references: 1, .. })
        ));

        let locked = PostingContext::new(date(2025, 6, 1), Some(date(2025, 12, 31)));
        assert!(matches!(
            VoucherService::check_delete(&voucher, 0, &locked),
            Err(VoucherError::PeriodLocked { .. })
        ));
        assert!(VoucherService::check_delete(&voucher, 0, &ctx()).is_ok());
    }

    #[test]
    fn test_remaining_warnings_only_for_negative() {
        let warnings = VoucherService::remaining_warnings(
            [(BudgetId::new(1), dec!(-5)), (BudgetId::new(2), dec!(0))],
            [(EarmarkId::new(1), dec!(-0.01))],
        );
        assert_eq!(
            warnings,
            vec![
                VoucherWarning::BudgetOverrun { budget_id: BudgetId::new(1), remaining: dec!(-5) },
                VoucherWarning::EarmarkOverdrawn {
                    earmark_id: EarmarkId::new(1),
                    remaining: dec!(-0.01)
                },
            ]
        );
    }

    #[test]
    fn test_tags_are_trimmed() {
        let mut e = entry(gross(dec!(10)));
        e.tags = ["  sommer ".to_string(), String::new()].into_iter().collect();
        let prepared = prepare(&VoucherDraft::Income(e)).unwrap();
        assert_eq!(prepared.tags.into_iter().collect::<Vec<_>>(), vec!["sommer".to_string()]);
    }
}
