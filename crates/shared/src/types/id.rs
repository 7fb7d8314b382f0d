//! Typed IDs for type-safe entity references.
//!
//! Records are keyed by store-assigned integers. Wrapping them prevents
//! accidentally passing a `BudgetId` where an `EarmarkId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an ID from a raw integer key.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the inner integer key.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(VoucherId, "Unique identifier for a voucher.");
typed_id!(BudgetId, "Unique identifier for a budget.");
typed_id!(EarmarkId, "Unique identifier for an earmark (Zweckbindung).");
typed_id!(CategoryId, "Unique identifier for a custom booking category.");
typed_id!(TaxonomyId, "Unique identifier for a taxonomy.");
typed_id!(TermId, "Unique identifier for a taxonomy term.");
typed_id!(CashAdvanceId, "Unique identifier for a cash advance.");
typed_id!(PartialId, "Unique identifier for a partial cash advance.");
typed_id!(InvoiceId, "Unique identifier for an invoice posting.");

/// Monotonic generator for integer keys.
///
/// Not thread-safe on its own; callers hold it behind the store lock.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: i64,
}

impl IdSequence {
    /// Creates a sequence starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next raw key and advances the sequence.
    pub fn next_raw(&mut self) -> i64 {
        let raw = self.next;
        self.next += 1;
        raw
    }

    /// Returns the next key as a typed ID.
    pub fn next_id<T: From<i64>>(&mut self) -> T {
        T::from(self.next_raw())
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
