//! Voucher ledger error types.

use chrono::NaiveDate;
use kassenwart_shared::{
    BudgetId, ClassificationScheme, EarmarkId, ErrorKind, TaxonomyId, VoucherId,
};
use thiserror::Error;

use crate::allocation::AllocationError;
use crate::amount::AmountError;
use crate::voucher::types::VoucherReference;

/// Errors that can occur during voucher operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoucherError {
    /// Amount could not be derived.
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    /// Budget allocation list is invalid.
    #[error("Budget allocations: {0}")]
    BudgetAllocation(AllocationError),

    /// Earmark allocation list is invalid.
    #[error("Earmark allocations: {0}")]
    EarmarkAllocation(AllocationError),

    /// Transfer lacks a source or destination.
    #[error("Transfer requires both source and destination")]
    MissingTransferDirection,

    /// Transfer source equals destination.
    #[error("Transfer source and destination must differ")]
    SameTransferDirection,

    /// Transfers carry a single gross amount.
    #[error("Transfers cannot use NET tax mode")]
    InvalidTaxMode,

    /// Classification does not match the configured scheme.
    #[error("Classification does not match the configured scheme {expected:?}")]
    ClassificationMismatch {
        /// The active scheme.
        expected: ClassificationScheme,
    },

    /// Two terms of the same taxonomy.
    #[error("More than one term assigned for taxonomy {0}")]
    DuplicateTaxonomy(TaxonomyId),

    /// Allocation to a budget that does not exist.
    #[error("Unknown budget: {0}")]
    UnknownBudget(BudgetId),

    /// Allocation to an earmark that does not exist.
    #[error("Unknown earmark: {0}")]
    UnknownEarmark(EarmarkId),

    /// Voucher date outside an enforced budget range.
    #[error("Voucher date {date} is outside the time range of budget {budget_id}")]
    OutsideBudgetRange {
        /// The budget.
        budget_id: BudgetId,
        /// Offending date.
        date: NaiveDate,
        /// Range start.
        start: Option<NaiveDate>,
        /// Range end.
        end: Option<NaiveDate>,
    },

    /// Date falls into the closed period.
    #[error("Date {date} is in the locked period (locked until {locked_until})")]
    PeriodLocked {
        /// Offending date.
        date: NaiveDate,
        /// End of the locked period.
        locked_until: NaiveDate,
    },

    /// Patch field does not fit the voucher type.
    #[error("Field {0} cannot be changed on this voucher type")]
    FieldNotApplicable(&'static str),

    /// A dependent record still points at the voucher.
    #[error("Voucher {voucher_id} is referenced by {references} dependent record(s)")]
    ReferencedElsewhere {
        /// The voucher.
        voucher_id: VoucherId,
        /// Number of references.
        references: usize,
    },

    /// Reference kind is maintained by the ledger itself.
    #[error("Reference {0:?} cannot be linked or unlinked directly")]
    ReservedReference(VoucherReference),

    /// Voucher not found.
    #[error("Voucher not found: {0}")]
    NotFound(VoucherId),

    /// Stored version differs from the caller's.
    #[error("Voucher was modified concurrently (expected version {expected}, found {actual})")]
    ConcurrentModification {
        /// Version the caller saw.
        expected: u32,
        /// Stored version.
        actual: u32,
    },
}

impl VoucherError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount(_)
            | Self::BudgetAllocation(_)
            | Self::EarmarkAllocation(_)
            | Self::MissingTransferDirection
            | Self::SameTransferDirection
            | Self::InvalidTaxMode
            | Self::ClassificationMismatch { .. }
            | Self::DuplicateTaxonomy(_)
            | Self::UnknownBudget(_)
            | Self::UnknownEarmark(_)
            | Self::OutsideBudgetRange { .. }
            | Self::FieldNotApplicable(_) => ErrorKind::Validation,

            Self::PeriodLocked { .. }
            | Self::ReferencedElsewhere { .. }
            | Self::ReservedReference(_) => ErrorKind::State,

            Self::NotFound(_) => ErrorKind::NotFound,

            Self::ConcurrentModification { .. } => ErrorKind::Conflict,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        self.kind().http_status_code()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(e) => e.error_code(),
            Self::BudgetAllocation(e) | Self::EarmarkAllocation(e) => e.error_code(),
            Self::MissingTransferDirection => "MISSING_TRANSFER_DIRECTION",
            Self::SameTransferDirection => "SAME_TRANSFER_DIRECTION",
            Self::InvalidTaxMode => "INVALID_TAX_MODE",
            Self::ClassificationMismatch { .. } => "CLASSIFICATION_MISMATCH",
            Self::DuplicateTaxonomy(_) => "DUPLICATE_TAXONOMY",
            Self::UnknownBudget(_) => "UNKNOWN_BUDGET",
            Self::UnknownEarmark(_) => "UNKNOWN_EARMARK",
            Self::OutsideBudgetRange { .. } => "OUTSIDE_BUDGET_RANGE",
            Self::PeriodLocked { .. } => "PERIOD_LOCKED",
            Self::FieldNotApplicable(_) => "FIELD_NOT_APPLICABLE",
            Self::ReferencedElsewhere { .. } => "REFERENCED_ELSEWHERE",
            Self::ReservedReference(_) => "RESERVED_REFERENCE",
            Self::NotFound(_) => "VOUCHER_NOT_FOUND",
            Self::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
        }
    }
}
