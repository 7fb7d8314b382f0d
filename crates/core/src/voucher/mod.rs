//! Voucher ledger: validation pipeline, patches and list queries.
//!
//! The ledger never persists anything itself. `VoucherService::prepare`
//! produces a fully validated `PreparedVoucher`; the store decides ids,
//! numbers and timestamps and performs the write atomically.

pub mod draft;
pub mod error;
pub mod query;
pub mod service;
pub mod types;

pub use draft::{AmountPatch, EntryDraft, TransferDraft, VoucherDraft, VoucherPatch};
pub use error::VoucherError;
pub use query::{SortDirection, SortField, VoucherFilter, VoucherQuery, VoucherSort};
pub use service::{PreparedVoucher, VoucherService};
pub use types::{
    Classification, Payment, PaymentMethod, PostingContext, Sphere, TermAssignment, Voucher,
    VoucherReference, VoucherType, VoucherWarning,
};
